use crate::envelope::Status;
use crate::value::ValueKind;

/// Failure raised by a strict [`ActionSession`](crate::ActionSession) accessor.
///
/// Parameter errors are deterministic: the same bag and the same key always
/// produce the same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParamError {
    /// No value is stored under the key.
    #[error("parameter `{key}` is missing")]
    Missing {
        /// The requested key.
        key: String,
    },

    /// A value is stored but has a different shape than requested.
    #[error("parameter `{key}` has wrong type: expected {expected}, got {actual}")]
    WrongType {
        /// The requested key.
        key: String,
        /// Shape the accessor requires.
        expected: ValueKind,
        /// Shape actually stored.
        actual: ValueKind,
    },

    /// A number is stored but does not fit the requested integer type.
    #[error("parameter `{key}` is out of range for {expected}")]
    OutOfRange {
        /// The requested key.
        key: String,
        /// Name of the target integer type.
        expected: &'static str,
    },

    /// A nested value could not be deserialized into the requested type.
    #[error("parameter `{key}` could not be decoded: {reason}")]
    Deserialize {
        /// The requested key.
        key: String,
        /// Decoder message.
        reason: String,
    },
}

impl ParamError {
    /// Key the failing accessor was called with.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Missing { key }
            | Self::WrongType { key, .. }
            | Self::OutOfRange { key, .. }
            | Self::Deserialize { key, .. } => key,
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "PARAM_MISSING",
            Self::WrongType { .. } => "PARAM_WRONG_TYPE",
            Self::OutOfRange { .. } => "PARAM_OUT_OF_RANGE",
            Self::Deserialize { .. } => "PARAM_DESER",
        }
    }

    /// Report this error as `bad-parameter` instead of the default
    /// `internal-handler-error`.
    #[must_use]
    pub fn into_bad_param(self) -> ActionError {
        ActionError::BadParam(self.to_string())
    }
}

/// Failure building an [`ActionSession`](crate::ActionSession) from raw input.
///
/// Seeing one of these means the caller handed the core a value it has no
/// representation for; it is a caller bug rather than a request failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SessionError {
    /// A raw value has no parameter representation.
    #[error("unsupported value for `{key}`: {kind}")]
    UnsupportedValue {
        /// Key of the offending entry.
        key: String,
        /// Description of the rejected value.
        kind: &'static str,
    },

    /// A structured bag was expected to be an object.
    #[error("parameters must be an object, got {actual}")]
    NotAnObject {
        /// Shape actually supplied.
        actual: ValueKind,
    },
}

/// Failure produced by handler business logic.
///
/// Each variant maps onto one failure [`Status`]; the dispatch core turns it
/// into a response envelope carrying the caller's echo token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ActionError {
    /// The request carried an unusable parameter.
    #[error("bad parameter: {0}")]
    BadParam(String),

    /// A business-level precondition does not hold.
    #[error("logic error: {0}")]
    Logic(String),

    /// Something unexpected went wrong while processing.
    #[error("internal error: {0}")]
    Internal(String),

    /// Domain-specific failure code.
    #[error("{message} (status {status})")]
    Custom {
        /// Status reported in the envelope.
        status: Status,
        /// Human-readable message.
        message: String,
    },
}

impl ActionError {
    /// Create a bad-parameter error.
    pub fn bad_param(msg: impl Into<String>) -> Self {
        Self::BadParam(msg.into())
    }

    /// Create a logic error.
    pub fn logic(msg: impl Into<String>) -> Self {
        Self::Logic(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an error with a domain-specific status.
    pub fn custom(status: Status, msg: impl Into<String>) -> Self {
        Self::Custom {
            status: status.canonical(),
            message: msg.into(),
        }
    }

    /// Status this error is reported under.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::BadParam(_) => Status::BadParam,
            Self::Logic(_) => Status::LogicError,
            Self::Internal(_) => Status::InternalHandlerError,
            Self::Custom { status, .. } => *status,
        }
    }

    /// Message placed in the envelope, without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BadParam(msg) | Self::Logic(msg) | Self::Internal(msg) => msg,
            Self::Custom { message, .. } => message,
        }
    }
}

impl From<ParamError> for ActionError {
    fn from(err: ParamError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Failure parsing a serialized envelope.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EnvelopeError {
    /// The text is not a well-formed envelope object.
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The `status` field is neither `ok` nor `failed`.
    #[error("unknown outcome `{0}`")]
    UnknownOutcome(String),

    /// The success flag and the status code disagree.
    #[error("outcome `{outcome}` contradicts retcode {code}")]
    Inconsistent {
        /// Serialized outcome string.
        outcome: String,
        /// Serialized status code.
        code: u32,
    },
}
