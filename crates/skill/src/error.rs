use std::error::Error as StdError;

/// Crate-wide result type for skill turns.
pub type Result<T> = std::result::Result<T, Error>;

/// Turn-fatal skill errors. Recoverable situations (bad selection, empty
/// account) never surface here; they become spoken outcomes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request declared an application id other than the configured one.
    #[error("invalid application id: {application_id}")]
    InvalidApplication { application_id: String },

    /// Intent name outside the skill's interaction model.
    #[error("invalid intent: {name}")]
    UnrecognizedIntent { name: String },

    /// Request envelope is malformed.
    #[error("invalid skill request: {message}")]
    InvalidInput { message: String },

    /// The account service answered with a failure.
    #[error("account service error: {message}")]
    AccountService { message: String },

    /// Wrapped source error from the account service transport.
    #[error("account service call failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// JSON (de)serialization failed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_input(message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn account_service(message: impl std::fmt::Display) -> Self {
        Self::AccountService {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Whether the failure came from the remote account service rather than
    /// from the inbound request.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::AccountService { .. } | Self::External { .. })
    }
}
