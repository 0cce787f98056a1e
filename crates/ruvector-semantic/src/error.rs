//! Error types for semantic pointer operations.
//!
//! Every fallible operation in the crate returns [`Result`]. Numerical
//! degeneracy (near-zero norms) and non-convergence of cleanup settling are
//! reported through return values, never through this enum.

/// Errors raised by the semantic pointer system.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    /// Vector or matrix length disagrees with the expected dimensionality.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality required by the receiver.
        expected: usize,
        /// Dimensionality that was supplied.
        actual: usize,
    },

    /// A pointer or pool name was looked up that is not registered.
    #[error("'{0}' not found")]
    NotFound(String),

    /// A name was registered twice.
    #[error("'{0}' already exists")]
    AlreadyExists(String),

    /// A constructor or parameter violated its preconditions.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The linear-algebra backend could not produce a solution.
    #[error("Numerical backend error: {0}")]
    Numerical(String),
}

impl SemanticError {
    pub(crate) fn check_dim(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(SemanticError::DimensionMismatch { expected, actual })
        }
    }
}

/// Result alias for semantic pointer operations.
pub type Result<T> = std::result::Result<T, SemanticError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dim() {
        assert!(SemanticError::check_dim(50, 50).is_ok());
        assert_eq!(
            SemanticError::check_dim(50, 40),
            Err(SemanticError::DimensionMismatch {
                expected: 50,
                actual: 40
            })
        );
    }

    #[test]
    fn test_display() {
        let err = SemanticError::NotFound("RED".to_string());
        assert_eq!(err.to_string(), "'RED' not found");

        let err = SemanticError::DimensionMismatch {
            expected: 50,
            actual: 40,
        };
        assert!(err.to_string().contains("expected 50, got 40"));
    }
}
