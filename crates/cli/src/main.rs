mod config_commands;
mod device_commands;
mod invoke_commands;

use std::{path::PathBuf, sync::Arc};

use {
    clap::{Parser, Subcommand},
    findmy_config::SkillConfig,
    findmy_icloud::ICloudService,
    findmy_skill::{AccountService, SkillHandler},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "findmy", about = "Find-my-device voice skill backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery in ./ and ~/.config/findmy/).
    #[arg(long, global = true, env = "FINDMY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve skill turns over HTTP (default when no subcommand is provided).
    Serve,
    /// Run a single skill turn from a JSON request envelope.
    Invoke {
        /// Path to the request envelope, or `-` for stdin.
        #[arg(long, default_value = "-")]
        event: String,
    },
    /// List the devices on the configured account.
    Devices,
    /// Validate the effective configuration and report errors/warnings.
    CheckConfig,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so `invoke` output stays clean on stdout.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Wire the skill to the live account service.
pub(crate) fn build_skill(config: SkillConfig) -> anyhow::Result<SkillHandler> {
    let service = ICloudService::new(&config.account)?;
    Ok(SkillHandler::new(
        Arc::new(config),
        Arc::new(service) as Arc<dyn AccountService>,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "findmy starting");

    match cli.command {
        None | Some(Commands::Serve) => {
            let config = findmy_config::load(cli.config.as_deref())?;
            let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());
            let port = cli.port.unwrap_or(config.server.port);
            let skill = build_skill(config)?;
            findmy_gateway::server::start_gateway(&bind, port, skill).await
        },
        Some(Commands::Invoke { event }) => {
            let config = findmy_config::load(cli.config.as_deref())?;
            invoke_commands::handle_invoke(config, &event).await
        },
        Some(Commands::Devices) => {
            let config = findmy_config::load(cli.config.as_deref())?;
            device_commands::handle_devices(config).await
        },
        Some(Commands::CheckConfig) => config_commands::handle_check(cli.config.as_deref()),
    }
}
