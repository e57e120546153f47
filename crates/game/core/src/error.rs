//! Common error infrastructure for unicreon-core.
//!
//! Domain-specific errors (e.g. [`crate::engine::ActionError`],
//! [`crate::dice::FormulaError`]) live next to the operations they guard and
//! implement [`RulesError`] so callers can classify them uniformly.
//!
//! The engine distinguishes two families of problems:
//!
//! - **Untrusted input** (sheet edits, host documents) is normalized in place:
//!   pools are clamped, die codes fall back to d6, unknown keys are ignored.
//! - **Rejected requests** (no target, missing attack, not enough actions)
//!   surface as errors and leave every actor untouched.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can succeed later without changing the request (e.g. wait for the next turn).
    Recoverable,

    /// Invalid input, the user must change the request.
    ///
    /// Examples: no target selected, item without attack configuration
    Validation,

    /// Unexpected state inconsistency. These indicate bugs.
    Internal,

    /// State is corrupted and the session cannot continue.
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

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all unicreon-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait RulesError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }
}
