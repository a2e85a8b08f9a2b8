//! Error Types - Gradix Error Handling
//!
//! Provides the error type shared by every crate in the Gradix workspace:
//! shape mismatches surfaced by the tensor facade, plus the gradient-state
//! errors raised by the autodiff engine.
//!
//! # Key Features
//! - Unified error type for all Gradix operations
//! - Structured context for debugging
//! - Integration with `std::error::Error`
//!
//! @version 0.1.0
//! @author Gradix Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for Gradix operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape mismatch between tensors.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },

    /// Gradient requested from a node the backward pass has not reached.
    #[error("Missing gradient: {message}")]
    MissingGradient {
        /// Description of the offending access.
        message: String,
    },

    /// Differentiation attempted through a non-differentiable argument.
    #[error("Unsupported derivative: {message}")]
    UnsupportedDerivative {
        /// Description of the unsupported derivative.
        message: String,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for Gradix operations.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Helper Functions
// =============================================================================

impl Error {
    /// Creates a new shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates a new missing gradient error.
    #[must_use]
    pub fn missing_gradient(message: impl Into<String>) -> Self {
        Self::MissingGradient {
            message: message.into(),
        }
    }

    /// Creates a new unsupported derivative error.
    #[must_use]
    pub fn unsupported_derivative(message: impl Into<String>) -> Self {
        Self::UnsupportedDerivative {
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::shape_mismatch(&[3], &[7]);
        assert!(err.to_string().contains("Shape mismatch"));

        let err = Error::missing_gradient("grad() called before backward()");
        assert!(err.to_string().contains("Missing gradient"));
    }

    #[test]
    fn test_error_equality() {
        let err1 = Error::missing_gradient("x");
        let err2 = Error::missing_gradient("x");
        assert_eq!(err1, err2);
    }
}
