//! Error types for the Gibbs sampling engine

use bptf_kernels::KernelError;
use thiserror::Error;

/// Error type for chain construction and sampling
///
/// A [`KernelError::NotPositiveDefinite`] surfacing through the `Kernel`
/// variant means a conditional-posterior precision matrix failed its
/// Cholesky factorization. That is a numerical breakdown of the chain
/// (degenerate rank, rank larger than an entity count, or NaNs fed in
/// through the data) and aborts the run; it is never retried.
#[derive(Error, Debug)]
pub enum GibbsError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("invalid latent rank: {0}")]
    InvalidRank(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("degenerate distribution parameters: {0}")]
    InvalidDistribution(String),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// Result type for sampling operations
pub type GibbsResult<T> = Result<T, GibbsError>;
