//! # bptf-core
//!
//! Core tensor types for Bayesian probabilistic tensor factorization.
//!
//! This crate provides the foundational data model for the BPTF stack:
//!
//! - **Dense 3-way tensor** ([`Tensor3`]) backed by `scirs2_core`'s arrays,
//!   with mode-k matricization (unfold/fold) for factorization algorithms
//! - **Observation masks** distinguishing observed from missing entries,
//!   supporting both the NaN and the zero-sentinel missing-value conventions
//! - **Held-out sets**: the coordinates hidden from fitting but known in a
//!   reference tensor, used to score imputation accuracy
//!
//! ## SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext`. The crate does not
//! depend on `ndarray` directly.
//!
//! ## Quick Start
//!
//! ```
//! use bptf_core::Tensor3;
//!
//! let tensor = Tensor3::<f64>::zeros([2, 3, 4]);
//! assert_eq!(tensor.shape(), [2, 3, 4]);
//!
//! // Mode-1 matricization: 3 rows, 2*4 columns
//! let unfolded = tensor.unfold(1).unwrap();
//! assert_eq!(unfolded.shape(), &[3, 8]);
//! ```
//!
//! ## Missing-value conventions
//!
//! A partially observed tensor marks missing entries either as `NaN` or as
//! an exact-zero sentinel. [`Tensor3::observation_mask`] detects which
//! convention is in play (any NaN present means the NaN convention) and
//! produces a 0/1 mask; [`Tensor3::zero_filled`] rewrites the tensor into
//! the zero-filled form the fitting code operates on.

pub mod mask;
pub mod tensor3;


pub use mask::held_out_positions;
pub use tensor3::Tensor3;
