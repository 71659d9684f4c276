//! Error types for svmath operations.
//!
//! The vector and dispatch layers are total and never fail. Errors only arise
//! at the seams where callers hand in slices or optional scalar functions, and
//! are reported here instead of panicking.

use thiserror::Error;

/// Errors that can occur during svmath operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvError {
    /// Slices that must describe the same lanes have different lengths.
    #[error("Length mismatch: input has {input} elements, fallback has {fallback}, mask has {mask}")]
    LengthMismatch {
        /// Length of the input slice.
        input: usize,
        /// Length of the fallback slice.
        fallback: usize,
        /// Length of the selection mask.
        mask: usize,
    },
    /// Lanes were selected for scalar fallback but no scalar function was supplied.
    #[error("Missing scalar function: {active} lane(s) selected for fallback")]
    MissingScalarFn {
        /// Number of active lanes in the selection predicate.
        active: usize,
    },
    /// Input validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },
}

/// Result type alias for svmath operations.
pub type Result<T> = std::result::Result<T, SvError>;

/// Creates a length mismatch error.
pub fn length_mismatch(input: usize, fallback: usize, mask: usize) -> SvError {
    SvError::LengthMismatch {
        input,
        fallback,
        mask,
    }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> SvError {
    SvError::Validation {
        message: message.into(),
    }
}
