//! Error type for logger setup

use thiserror::Error;

/// Result alias for logging operations
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while installing the global subscriber
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LogError {
    /// The level directive could not be parsed
    #[error("invalid filter `{filter}`: {reason}")]
    Filter {
        /// The offending directive string
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("logger initialization failed: {0}")]
    Init(String),
}

impl LogError {
    /// Stable error code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Filter { .. } => "LOG_FILTER",
            Self::Init(_) => "LOG_INIT",
        }
    }
}
