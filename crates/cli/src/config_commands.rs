use std::path::Path;

use {
    anyhow::Result,
    findmy_config::{Severity, SkillConfig, ValidationResult, validate_config},
};

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Validate the effective configuration without starting anything.
pub fn handle_check(explicit: Option<&Path>) -> Result<()> {
    let config = effective_config(explicit)?;
    let result = validate_config(&config);

    // Debug output redacts the password.
    println!("{config:#?}");

    for d in &result.diagnostics {
        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        };
        eprintln!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message);
    }
    eprintln!("{}", summary(&result));

    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn effective_config(explicit: Option<&Path>) -> Result<SkillConfig> {
    let mut config = match explicit {
        Some(path) => {
            eprintln!("Checking {}\n", path.display());
            findmy_config::load_config(path)?
        },
        None => findmy_config::discover_and_load(),
    };
    findmy_config::apply_env_overrides(&mut config);
    Ok(config)
}

fn summary(result: &ValidationResult) -> String {
    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        "No issues found.".into()
    } else {
        format!("{errors} error(s), {warnings} warning(s)")
    }
}
