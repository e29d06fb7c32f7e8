use dsnorm_model::{ExtractError, VocabularyCategory};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum VocabularyError {
    /// The backing service cannot answer queries.
    #[error("vocabulary service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("failed to parse vocabulary CSV {source_name}: {message}")]
    Csv {
        source_name: String,
        message: String,
    },

    #[error("vocabulary CSV {source_name} lacks column '{column}' required for {category} terms")]
    MissingColumn {
        source_name: String,
        category: VocabularyCategory,
        column: &'static str,
    },
}

impl VocabularyError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub(crate) fn csv(source_name: &str, error: &csv::Error) -> Self {
        Self::Csv {
            source_name: source_name.to_string(),
            message: error.to_string(),
        }
    }
}

impl From<VocabularyError> for ExtractError {
    fn from(error: VocabularyError) -> Self {
        match error {
            VocabularyError::Unavailable { reason } => ExtractError::Unavailable { reason },
            other => ExtractError::Unavailable {
                reason: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, VocabularyError>;
