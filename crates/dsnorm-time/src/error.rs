use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TimeError {
    #[error("time rule '{rule}' has an invalid pattern: {message}")]
    InvalidPattern { rule: String, message: String },

    #[error("time rule '{rule}' needs capture group '{group}'")]
    MissingGroup { rule: String, group: &'static str },

    /// Captured values do not form a valid instant.
    #[error("invalid time anchor: {reason}")]
    InvalidAnchor { reason: String },

    #[error("unrecognized timestamp '{value}'")]
    Unparseable { value: String },
}

impl TimeError {
    pub fn invalid_anchor(reason: impl Into<String>) -> Self {
        Self::InvalidAnchor {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimeError>;
