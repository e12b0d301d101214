//! Configuration validation.
//!
//! Checks the effective configuration (after env overrides) for missing
//! credentials and malformed endpoints, collecting every problem instead of
//! stopping at the first.

use secrecy::ExposeSecret;

use crate::schema::SkillConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "missing", "invalid", "security"
    pub category: &'static str,
    /// Dotted path, e.g. "account.apple_id"
    pub path: String,
    pub message: String,
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, category: &'static str, path: &str, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            category,
            path: path.into(),
            message,
        });
    }
}

#[must_use]
pub fn validate_config(config: &SkillConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.application_id.trim().is_empty() {
        result.push(
            Severity::Error,
            "missing",
            "application_id",
            "application id is required (set APPLICATION_ID)".into(),
        );
    }
    if config.account.apple_id.trim().is_empty() {
        result.push(
            Severity::Error,
            "missing",
            "account.apple_id",
            "account login is required (set APPLE_ID)".into(),
        );
    }
    if config.account.password.expose_secret().is_empty() {
        result.push(
            Severity::Error,
            "missing",
            "account.password",
            "account password is required (set APPLE_PASSWORD)".into(),
        );
    }

    if let Some(target) = config.default_target_device.as_deref()
        && !target.is_empty()
        && target.trim().is_empty()
    {
        result.push(
            Severity::Error,
            "invalid",
            "default_target_device",
            "default target device name is blank".into(),
        );
    }

    for (path, url) in [
        ("account.setup_url", &config.account.setup_url),
        ("account.home_url", &config.account.home_url),
    ] {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            result.push(
                Severity::Error,
                "invalid",
                path,
                format!("expected an http(s) URL, got {url:?}"),
            );
        } else if url.starts_with("http://") {
            result.push(
                Severity::Warning,
                "security",
                path,
                format!("{url} is not https; credentials travel in clear text"),
            );
        }
    }

    if config.account.request_timeout_secs == 0 {
        result.push(
            Severity::Error,
            "invalid",
            "account.request_timeout_secs",
            "request timeout must be at least one second".into(),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;

    use {super::*, crate::schema::AccountConfig};

    fn valid() -> SkillConfig {
        SkillConfig {
            application_id: "amzn1.ask.skill.test".into(),
            account: AccountConfig {
                apple_id: "me@example.com".into(),
                password: Secret::new("pw".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn complete_config_has_no_diagnostics() {
        assert!(validate_config(&valid()).diagnostics.is_empty());
    }

    #[test]
    fn empty_config_reports_every_missing_credential() {
        let result = validate_config(&SkillConfig::default());
        assert!(result.has_errors());
        assert_eq!(result.count(Severity::Error), 3);
        let paths: Vec<_> = result.diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, [
            "application_id",
            "account.apple_id",
            "account.password"
        ]);
    }

    #[test]
    fn whitespace_target_is_rejected() {
        let mut config = valid();
        config.default_target_device = Some("  ".into());
        let result = validate_config(&config);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].path, "default_target_device");
    }

    #[test]
    fn plain_http_endpoint_warns() {
        let mut config = valid();
        config.account.setup_url = "http://localhost:9000".into();
        let result = validate_config(&config);
        assert!(!result.has_errors());
        assert_eq!(result.count(Severity::Warning), 1);
        assert_eq!(result.diagnostics[0].category, "security");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = valid();
        config.account.request_timeout_secs = 0;
        assert!(validate_config(&config).has_errors());
    }
}
