//! Common error infrastructure for humanoid-core.
//!
//! Domain errors live next to the code that raises them ([`AttributeError`](crate::attribute::AttributeError) in
//! the attribute store, [`SkinError`] with skin validation). This module holds
//! the shared severity classification and the aggregate errors surfaced by
//! [`HumanoidState`](crate::HumanoidState) entry points.
//!
//! A vetoed mutation is not an error: it is reported as a `false`/`0.0`
//! result and leaves state untouched.

use crate::record::RecordError;
use crate::skin::SkinError;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller may retry with different input.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: attribute write outside its declared range
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the entity cannot be constructed or shown.
    ///
    /// Examples: missing or malformed skin payload
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error aborts the entity.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all humanoid-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait SubsystemError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while constructing a humanoid from a persisted record.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Skin(#[from] SkinError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

impl SubsystemError for LoadError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Skin(e) => e.severity(),
            Self::Record(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Skin(e) => e.error_code(),
            Self::Record(e) => e.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeError, AttributeKind};

    #[test]
    fn load_error_inherits_skin_severity() {
        let err = LoadError::from(SkinError::InvalidLength { len: 12 });
        assert!(err.severity().is_fatal());
        assert_eq!(err.error_code(), "SKIN_INVALID_LENGTH");
    }

    #[test]
    fn attribute_error_is_validation() {
        let err = AttributeError::OutOfRange {
            kind: AttributeKind::Hunger,
            value: 21.0,
            min: 0.0,
            max: 20.0,
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_recoverable());
        assert_eq!(err.error_code(), "ATTRIBUTE_OUT_OF_RANGE");
    }
}
