use std::{io::Read, path::Path};

use {anyhow::Context, findmy_config::SkillConfig, tracing::debug};

/// Run one turn against the live account and print the response envelope.
pub async fn handle_invoke(config: SkillConfig, event: &str) -> anyhow::Result<()> {
    let payload = read_event(event)?;
    let skill = crate::build_skill(config)?;
    let envelope = skill.handle_value(payload).await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn read_event(source: &str) -> anyhow::Result<serde_json::Value> {
    let raw = if source == "-" {
        debug!("reading request envelope from stdin");
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading request envelope from stdin")?;
        buf
    } else {
        let path = Path::new(source);
        std::fs::read_to_string(path)
            .with_context(|| format!("reading request envelope from {}", path.display()))?
    };
    serde_json::from_str(&raw).context("request envelope is not valid JSON")
}
