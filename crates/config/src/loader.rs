use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::SkillConfig, validate::validate_config};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["findmy.toml", "findmy.yaml", "findmy.yml", "findmy.json"];

/// Environment variables understood as overrides, as set by the hosting
/// function's deployment.
pub const ENV_APPLICATION_ID: &str = "APPLICATION_ID";
pub const ENV_APPLE_ID: &str = "APPLE_ID";
pub const ENV_APPLE_PASSWORD: &str = "APPLE_PASSWORD";
pub const ENV_TARGET_DEVICE_NAME: &str = "TARGET_DEVICE_NAME";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<SkillConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./findmy.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/findmy/findmy.{toml,yaml,yml,json}` (user-global)
///
/// Returns `SkillConfig::default()` if no config file is found.
pub fn discover_and_load() -> SkillConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    SkillConfig::default()
}

/// Build the effective configuration once at process entry: file (explicit
/// or discovered), then environment overrides, then validation.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<SkillConfig> {
    let mut config = match explicit {
        Some(path) => load_config(path)?,
        None => discover_and_load(),
    };
    apply_env_overrides(&mut config);

    let diagnostics = validate_config(&config);
    if diagnostics.has_errors() {
        let summary = diagnostics
            .diagnostics
            .iter()
            .map(|d| format!("{}: {}", d.path, d.message))
            .collect::<Vec<_>>()
            .join("; ");
        anyhow::bail!("invalid configuration: {summary}");
    }
    for warning in &diagnostics.diagnostics {
        warn!(path = %warning.path, "{}", warning.message);
    }
    Ok(config)
}

/// Overlay `APPLICATION_ID`, `APPLE_ID`, `APPLE_PASSWORD` and
/// `TARGET_DEVICE_NAME` from the process environment.
pub fn apply_env_overrides(config: &mut SkillConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

/// Same as [`apply_env_overrides`] with an injectable lookup. Empty values
/// count as unset.
pub fn apply_env_overrides_with(config: &mut SkillConfig, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(id) = lookup(ENV_APPLICATION_ID) {
        config.application_id = id;
    }
    if let Some(apple_id) = lookup(ENV_APPLE_ID) {
        config.account.apple_id = apple_id;
    }
    if let Some(password) = lookup(ENV_APPLE_PASSWORD) {
        config.account.password = Secret::new(password);
    }
    if let Some(target) = lookup(ENV_TARGET_DEVICE_NAME) {
        config.default_target_device = Some(target);
    }
}

/// Find the first config file in standard locations.
pub(crate) fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dir) = config_dir() {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/findmy/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "findmy").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<SkillConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {secrecy::ExposeSecret, std::collections::HashMap};

    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "findmy.toml",
            r#"
application_id = "amzn1.ask.skill.abc"
default_target_device = "Watch"

[account]
apple_id = "me@example.com"
password = "pw"

[server]
port = 9000
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.application_id, "amzn1.ask.skill.abc");
        assert_eq!(config.default_target(), Some("Watch"));
        assert_eq!(config.account.apple_id, "me@example.com");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn loads_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = write(
            &dir,
            "findmy.yaml",
            "application_id: yaml-app\naccount:\n  apple_id: y@example.com\n",
        );
        assert_eq!(load_config(&yaml).unwrap().application_id, "yaml-app");

        let json = write(
            &dir,
            "findmy.json",
            r#"{"application_id": "json-app", "account": {"apple_id": "j@example.com"}}"#,
        );
        assert_eq!(load_config(&json).unwrap().account.apple_id, "j@example.com");
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "findmy.ini", "application_id=x");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = SkillConfig {
            application_id: "from-file".into(),
            ..Default::default()
        };
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_APPLICATION_ID, "from-env"),
            (ENV_APPLE_ID, "me@example.com"),
            (ENV_APPLE_PASSWORD, "pw"),
            (ENV_TARGET_DEVICE_NAME, "iPhone"),
        ]);
        apply_env_overrides_with(&mut config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.application_id, "from-env");
        assert_eq!(config.account.apple_id, "me@example.com");
        assert_eq!(config.account.password.expose_secret(), "pw");
        assert_eq!(config.default_target(), Some("iPhone"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = SkillConfig {
            application_id: "from-file".into(),
            ..Default::default()
        };
        apply_env_overrides_with(&mut config, |_| Some(String::new()));
        assert_eq!(config.application_id, "from-file");
        assert_eq!(config.default_target_device, None);
    }

    #[test]
    fn load_reports_missing_required_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "findmy.toml", "[server]\nport = 1\n");
        let config = load_config(&path).unwrap();
        assert!(validate_config(&config).has_errors());
    }
}
