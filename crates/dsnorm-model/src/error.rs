//! Error taxonomy for metadata normalization.
//!
//! Two layers are distinguished:
//!
//! - [`ExtractError`] is what a single field getter returns when it cannot
//!   read the sub-structure it expected. It carries no unit or field context.
//! - [`NormalizationError`] is what the engine surfaces. The engine converts
//!   every `ExtractError` uniformly, attaching the unit name, the field and,
//!   where the whole record is affected, a bounded excerpt of the raw input.
//!
//! | Error | Raised by | Engine behavior |
//! |-------|-----------|-----------------|
//! | [`FieldUnsupported`](NormalizationError::FieldUnsupported) | unit without getter | treated as absent, debug log |
//! | [`MalformedInput`](NormalizationError::MalformedInput) | getter | field falls through (policy dependent) |
//! | [`NormalizationFailure`](NormalizationError::NormalizationFailure) | default unit | fatal for mandatory fields |
//! | [`NoApplicableNormalizer`](NormalizationError::NoApplicableNormalizer) | classifier | fatal |
//! | [`InvalidChain`](NormalizationError::InvalidChain) | engine construction | fatal |
//! | [`Vocabulary`](NormalizationError::Vocabulary) | vocabulary service | fatal |

use thiserror::Error;

use crate::field::FieldName;

/// Failure of a single field getter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A key path the getter relies on does not exist.
    #[error("missing key path '{path}'")]
    Missing { path: String },

    /// A key path exists but holds a value of the wrong shape.
    #[error("unexpected value at '{path}': expected {expected}")]
    Unexpected {
        path: String,
        expected: &'static str,
    },

    /// The value exists but cannot be interpreted.
    #[error("{reason}")]
    Invalid { reason: String },

    /// The vocabulary service could not be queried.
    #[error("vocabulary service unavailable: {reason}")]
    Unavailable { reason: String },
}

impl ExtractError {
    pub fn missing(path: &[&str]) -> Self {
        Self::Missing {
            path: path.join("."),
        }
    }

    pub fn unexpected(path: &[&str], expected: &'static str) -> Self {
        Self::Unexpected {
            path: path.join("."),
            expected,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the normalization engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NormalizationError {
    /// The unit declares no getter for the requested field.
    #[error("unit '{unit}' does not support field '{field}'")]
    FieldUnsupported { unit: String, field: FieldName },

    /// The unit recognized the input but could not extract the field.
    #[error("unit '{unit}' could not extract '{field}': {reason}")]
    MalformedInput {
        unit: String,
        field: FieldName,
        reason: String,
    },

    /// No value could be produced for the field at all.
    #[error("could not determine '{field}': {reason} (raw: {raw})")]
    NormalizationFailure {
        field: FieldName,
        reason: String,
        raw: String,
    },

    /// No unit of a classification engine accepted the input.
    #[error("no normalizer found for raw metadata: {raw}")]
    NoApplicableNormalizer { raw: String },

    /// The configured unit ordering violates a construction invariant.
    #[error("invalid normalizer chain: {reason}")]
    InvalidChain { reason: String },

    /// The vocabulary service failed (not an unresolvable keyword).
    #[error("vocabulary service failure while resolving '{field}': {reason}")]
    Vocabulary { field: FieldName, reason: String },
}

impl NormalizationError {
    pub fn invalid_chain(reason: impl Into<String>) -> Self {
        Self::InvalidChain {
            reason: reason.into(),
        }
    }

    /// Returns the field the error refers to, when there is one.
    pub fn field(&self) -> Option<FieldName> {
        match self {
            Self::FieldUnsupported { field, .. }
            | Self::MalformedInput { field, .. }
            | Self::NormalizationFailure { field, .. }
            | Self::Vocabulary { field, .. } => Some(*field),
            Self::NoApplicableNormalizer { .. } | Self::InvalidChain { .. } => None,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, NormalizationError>;
