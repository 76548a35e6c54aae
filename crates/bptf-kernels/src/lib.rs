//! # bptf-kernels
//!
//! Dense kernel operations for Bayesian probabilistic tensor factorization.
//!
//! The Gibbs sampling engine reduces to a small set of dense primitives,
//! collected here:
//!
//! - **Khatri-Rao product** (column-wise Kronecker product), the design
//!   matrix of every per-mode conditional update
//! - **Cholesky helpers**: the lower factorization (via `scirs2-linalg`),
//!   triangular substitution, SPD solves, and a substitution-based SPD
//!   inverse (no general dense inverse anywhere in the stack)
//! - **CP reconstruction**: the rank-R outer-product contraction from three
//!   factor matrices back to a dense tensor
//!
//! ## Convention
//!
//! Factor matrices are (mode extent × R). For mode k of an order-3 tensor
//! the design matrix is the Khatri-Rao product of the other two factors in
//! increasing mode order, which makes design rows line up with the columns
//! of [`bptf_core::Tensor3::unfold`] for that mode.
//!
//! ## Features
//!
//! - `parallel` - rayon-backed Khatri-Rao via `scirs2_core::parallel_ops`

pub mod chol;
pub mod error;
pub mod khatri_rao;
pub mod reconstruct;


pub use chol::{chol_inverse, chol_solve, cholesky_lower, solve_lower, solve_lower_transposed};
pub use error::{KernelError, KernelResult};
pub use khatri_rao::khatri_rao;
#[cfg(feature = "parallel")]
pub use khatri_rao::khatri_rao_parallel;
pub use reconstruct::cp_reconstruct;
