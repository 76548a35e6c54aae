//! Error types for kernel operations

use std::fmt;

/// Error type for dense kernel operations
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Dimension mismatch between operands
    DimensionMismatch {
        operation: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Factor matrices disagree on the latent rank
    RankMismatch {
        operation: String,
        expected_rank: usize,
        actual_rank: usize,
        factor_index: usize,
    },

    /// A matrix that must be symmetric positive-definite failed the
    /// Cholesky factorization
    NotPositiveDefinite { context: String },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::DimensionMismatch {
                operation,
                expected,
                actual,
            } => write!(
                f,
                "{}: dimension mismatch - expected {:?}, got {:?}",
                operation, expected, actual
            ),

            KernelError::RankMismatch {
                operation,
                expected_rank,
                actual_rank,
                factor_index,
            } => write!(
                f,
                "{}: rank mismatch at factor {}: expected rank {}, got {}",
                operation, factor_index, expected_rank, actual_rank
            ),

            KernelError::NotPositiveDefinite { context } => write!(
                f,
                "matrix is not positive-definite ({}): Cholesky factorization failed",
                context
            ),
        }
    }
}

impl std::error::Error for KernelError {}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

impl KernelError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(
        operation: impl Into<String>,
        expected: Vec<usize>,
        actual: Vec<usize>,
    ) -> Self {
        KernelError::DimensionMismatch {
            operation: operation.into(),
            expected,
            actual,
        }
    }

    /// Create a rank mismatch error
    pub fn rank_mismatch(
        operation: impl Into<String>,
        expected_rank: usize,
        actual_rank: usize,
        factor_index: usize,
    ) -> Self {
        KernelError::RankMismatch {
            operation: operation.into(),
            expected_rank,
            actual_rank,
            factor_index,
        }
    }

    /// Create a positive-definiteness violation error
    pub fn not_positive_definite(context: impl Into<String>) -> Self {
        KernelError::NotPositiveDefinite {
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = KernelError::dimension_mismatch("khatri_rao", vec![10, 5], vec![10, 3]);
        let msg = format!("{}", err);
        assert!(msg.contains("khatri_rao"));
        assert!(msg.contains("[10, 5]"));
        assert!(msg.contains("[10, 3]"));
    }

    #[test]
    fn test_not_positive_definite_display() {
        let err = KernelError::not_positive_definite("row posterior precision");
        let msg = format!("{}", err);
        assert!(msg.contains("not positive-definite"));
        assert!(msg.contains("row posterior precision"));
    }
}
