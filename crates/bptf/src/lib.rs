//! # BPTF - Bayesian Probabilistic Tensor Factorization
//!
//! Missing-entry imputation for partially observed 3-way tensors
//! (origin × destination × time, location × location × month, and the
//! like) via a collapsed Gibbs sampler with Gaussian-Wishart conjugate
//! priors and a first-order autoregressive prior on the temporal factor.
//!
//! This is the **meta crate** re-exporting the stack's components:
//!
//! - [`core`]: the [`Tensor3`](core::Tensor3) type, observation masks,
//!   held-out sets
//! - [`kernels`]: Khatri-Rao products, Cholesky helpers, CP reconstruction
//! - [`gibbs`]: the sampling engine, driver, and metrics
//!
//! ## Quick Start
//!
//! ```
//! use bptf::prelude::*;
//! use scirs2_core::random::{SeedableRng, StdRng};
//!
//! // Reference tensor and an observed copy with an entry hidden.
//! let dense = Tensor3::from_elem([4, 4, 6], 2.0);
//! let mut sparse = dense.clone();
//! sparse[[1, 2, 3]] = f64::NAN;
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let init = FactorInit::random_normal([4, 4, 6], 2, &mut rng);
//! let config = GibbsConfig {
//!     burn_iter: 30,
//!     gibbs_iter: 20,
//!     seed: Some(1),
//!     ..Default::default()
//! };
//!
//! let summary = bptf(&dense, &sparse, init, &config).unwrap();
//! println!("held-out RMSE: {:.4}", summary.rmse);
//! ```

/// Core tensor types, masks, and held-out sets.
pub use bptf_core as core;

/// Dense kernels: Khatri-Rao, Cholesky helpers, CP reconstruction.
pub use bptf_kernels as kernels;

/// The Gibbs sampling engine, driver, and metrics.
pub use bptf_gibbs as gibbs;

/// Common imports for typical use.
pub mod prelude {
    pub use bptf_core::{held_out_positions, Tensor3};
    pub use bptf_gibbs::{
        bptf, mape, rmse, ChainState, FactorInit, GibbsConfig, GibbsError, GibbsSummary,
    };
    pub use bptf_kernels::{cp_reconstruct, khatri_rao};
}
