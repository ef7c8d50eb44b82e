//! Logger setup errors

/// Result alias for logger operations
pub type LogResult<T> = Result<T, LogError>;

/// Failure to install the logger
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LogError {
    /// The filter directive does not parse
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// Directive as configured
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber could not be installed
    #[error("logger initialization failed: {0}")]
    Init(String),
}

impl LogError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Filter { .. } => "LOG_FILTER",
            Self::Init(_) => "LOG_INIT",
        }
    }
}
