/// Config schema types (skill identity, account credentials, server).
use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Application identifier every inbound request must declare.
    pub application_id: String,
    /// Device display name to ring straight away on launch, skipping the
    /// selection prompt when it matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_target_device: Option<String>,
    pub account: AccountConfig,
    pub server: ServerConfig,
}

impl SkillConfig {
    /// Default target with blank values treated as unset.
    #[must_use]
    pub fn default_target(&self) -> Option<&str> {
        self.default_target_device
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// Remote account (iCloud) credentials and endpoints.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Account login (Apple ID).
    pub apple_id: String,

    /// Account password.
    #[serde(serialize_with = "serialize_secret")]
    pub password: Secret<String>,

    /// Base URL of the account setup service that issues sessions.
    pub setup_url: String,

    /// Origin presented to the account service.
    pub home_url: String,

    /// Per-request timeout for account service calls, in seconds.
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("apple_id", &self.apple_id)
            .field("password", &"[REDACTED]")
            .field("setup_url", &self.setup_url)
            .field("home_url", &self.home_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            apple_id: String::new(),
            password: Secret::new(String::new()),
            setup_url: "https://setup.icloud.com/setup/ws/1".into(),
            home_url: "https://www.icloud.com".into(),
            request_timeout_secs: 30,
        }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8787,
        }
    }
}
