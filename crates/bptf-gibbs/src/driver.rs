//! The outer Gibbs loop: burn-in, sampling, and the posterior-mean estimate
//!
//! One sweep updates the full chain state in a fixed order: U from the
//! sweep-initial V and X, V from the fresh U and initial X, X from the
//! fresh U and V, then the noise precision τ from the residuals of the new
//! reconstruction. Sweeps are atomic; no partially updated state is ever
//! visible outside the loop.

use crate::error::{GibbsError, GibbsResult};
use crate::factors::{sample_entity_factor, sample_temporal_factor};
use crate::metrics::{mape, rmse};
use crate::sampling::sample_precision_tau;
use bptf_core::{held_out_positions, Tensor3};
use bptf_kernels::cp_reconstruct;
use rand_distr::{Distribution, StandardNormal};
use scirs2_core::ndarray_ext::Array2;
use scirs2_core::random::{Rng, SeedableRng, StdRng};

/// Configuration for a sampling run
///
/// The latent rank is carried by the initial factor matrices, not the
/// config; see [`FactorInit`].
#[derive(Debug, Clone)]
pub struct GibbsConfig {
    /// Prior pseudo-count β0 for the Normal-Wishart and chain priors.
    pub beta0: f64,
    /// Burn-in sweeps, discarded from the estimate.
    pub burn_iter: usize,
    /// Sampling sweeps accumulated into the posterior mean.
    pub gibbs_iter: usize,
    /// Burn-in checkpoint interval for interim diagnostics.
    pub show_iter: usize,
    /// RNG seed; a fixed seed makes the run reproducible draw for draw.
    pub seed: Option<u64>,
}

impl Default for GibbsConfig {
    fn default() -> Self {
        Self {
            beta0: 1.0,
            burn_iter: 1000,
            gibbs_iter: 200,
            show_iter: 200,
            seed: None,
        }
    }
}

/// Initial factor matrices (d1 × R, d2 × R, d3 × R)
#[derive(Debug, Clone)]
pub struct FactorInit {
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    pub x: Array2<f64>,
}

impl FactorInit {
    /// Small-magnitude random initialization (0.1 · N(0, 1) entries).
    pub fn random_normal<R: Rng>(shape: [usize; 3], rank: usize, rng: &mut R) -> Self {
        let mut draw = |rows: usize| -> Array2<f64> {
            Array2::from_shape_fn((rows, rank), |_| {
                let z: f64 = StandardNormal.sample(rng);
                0.1 * z
            })
        };
        let u = draw(shape[0]);
        let v = draw(shape[1]);
        let x = draw(shape[2]);
        Self { u, v, x }
    }
}

/// The mutable chain state threaded through the sweeps.
#[derive(Debug, Clone)]
pub struct ChainState {
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    pub x: Array2<f64>,
    pub tau: f64,
}

/// Result of a sampling run
#[derive(Debug, Clone)]
pub struct GibbsSummary {
    /// Posterior-mean reconstruction of the full tensor.
    pub tensor_hat: Tensor3<f64>,
    /// Final chain state after the last sweep.
    pub state: ChainState,
    /// Held-out mean absolute percentage error (NaN if no held-out set).
    pub mape: f64,
    /// Held-out root-mean-square error (NaN if no held-out set).
    pub rmse: f64,
}

fn validate(
    dense: &Tensor3<f64>,
    sparse: &Tensor3<f64>,
    init: &FactorInit,
    config: &GibbsConfig,
) -> GibbsResult<usize> {
    if dense.shape() != sparse.shape() {
        return Err(GibbsError::ShapeMismatch(format!(
            "reference tensor is {:?} but observed tensor is {:?}",
            dense.shape(),
            sparse.shape()
        )));
    }

    let [d1, d2, d3] = sparse.shape();
    let rank = init.u.ncols();
    if rank == 0 {
        return Err(GibbsError::InvalidRank(0));
    }
    if init.v.ncols() != rank {
        return Err(GibbsError::InvalidRank(init.v.ncols()));
    }
    if init.x.ncols() != rank {
        return Err(GibbsError::InvalidRank(init.x.ncols()));
    }

    for (name, rows, dim) in [
        ("first", init.u.nrows(), d1),
        ("second", init.v.nrows(), d2),
        ("temporal", init.x.nrows(), d3),
    ] {
        if rows != dim {
            return Err(GibbsError::ShapeMismatch(format!(
                "{} factor has {} rows but the tensor extent is {}",
                name, rows, dim
            )));
        }
    }

    if d3 < 2 {
        return Err(GibbsError::InvalidConfig(
            "temporal mode needs at least two steps for the random-walk prior".into(),
        ));
    }
    if config.gibbs_iter == 0 {
        return Err(GibbsError::InvalidConfig(
            "gibbs_iter must be at least 1".into(),
        ));
    }
    if config.show_iter == 0 {
        return Err(GibbsError::InvalidConfig(
            "show_iter must be at least 1".into(),
        ));
    }
    if !(config.beta0 > 0.0) {
        return Err(GibbsError::InvalidConfig(format!(
            "beta0 must be positive, got {}",
            config.beta0
        )));
    }

    Ok(rank)
}

/// Run the collapsed Gibbs sampler and return the posterior-mean estimate
///
/// `dense` is the fully observed reference used only to score held-out
/// positions; the sampler never reads it. `sparse` is the observed tensor
/// with missing entries marked as NaN or exact zeros (see
/// [`bptf_core::Tensor3::observation_mask`]). `init` supplies the starting
/// factor matrices and fixes the latent rank for the run.
///
/// # Errors
///
/// Shape or configuration problems are detected before the first sweep.
/// A conditional-posterior precision losing positive-definiteness mid-run
/// aborts with the offending context; the chain is never restarted.
///
/// # Examples
///
/// ```
/// use bptf_core::Tensor3;
/// use bptf_gibbs::{bptf, FactorInit, GibbsConfig};
/// use scirs2_core::random::{SeedableRng, StdRng};
///
/// let dense = Tensor3::from_elem([3, 3, 4], 1.0);
/// let mut sparse = dense.clone();
/// sparse[[0, 1, 2]] = f64::NAN;
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let init = FactorInit::random_normal([3, 3, 4], 2, &mut rng);
/// let config = GibbsConfig {
///     burn_iter: 20,
///     gibbs_iter: 10,
///     seed: Some(42),
///     ..Default::default()
/// };
/// let summary = bptf(&dense, &sparse, init, &config).unwrap();
/// assert_eq!(summary.tensor_hat.shape(), [3, 3, 4]);
/// ```
pub fn bptf(
    dense: &Tensor3<f64>,
    sparse: &Tensor3<f64>,
    init: FactorInit,
    config: &GibbsConfig,
) -> GibbsResult<GibbsSummary> {
    validate(dense, sparse, &init, config)?;

    let mask = sparse.observation_mask();
    let data = sparse.zero_filled();
    let positions = held_out_positions(dense, sparse)
        .map_err(|e| GibbsError::ShapeMismatch(e.to_string()))?;
    if positions.is_empty() {
        log::warn!("held-out set is empty; MAPE and RMSE will be NaN");
    }
    let actual: Vec<f64> = positions.iter().map(|&p| dense[p]).collect();

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(scirs2_core::random::thread_rng().random::<u64>()),
    };

    let mut state = ChainState {
        u: init.u,
        v: init.v,
        x: init.x,
        tau: 1.0,
    };

    let shape = sparse.shape();
    let mut posterior_acc = Tensor3::<f64>::zeros(shape);
    let mut interim_sum = vec![0.0; positions.len()];
    let mut interim_count = 0usize;

    let total = config.burn_iter + config.gibbs_iter;
    for sweep in 0..total {
        let tau_mask = &mask * state.tau;
        let tau_data = &data * state.tau;

        sample_entity_factor(
            &mut rng,
            0,
            &tau_data,
            &tau_mask,
            &mut state.u,
            &state.v.view(),
            &state.x.view(),
            config.beta0,
        )?;
        sample_entity_factor(
            &mut rng,
            1,
            &tau_data,
            &tau_mask,
            &mut state.v,
            &state.u.view(),
            &state.x.view(),
            config.beta0,
        )?;
        sample_temporal_factor(
            &mut rng,
            &tau_data,
            &tau_mask,
            &state.u.view(),
            &state.v.view(),
            &mut state.x,
            config.beta0,
        )?;

        let tensor_hat = cp_reconstruct(&state.u.view(), &state.v.view(), &state.x.view())?;

        for (sum, &p) in interim_sum.iter_mut().zip(&positions) {
            *sum += tensor_hat[p];
        }
        interim_count += 1;

        state.tau = sample_precision_tau(&mut rng, &data, &tensor_hat, &mask)?;

        if sweep >= config.burn_iter {
            posterior_acc += &tensor_hat;
        } else if (sweep + 1) % config.show_iter == 0 {
            let predicted: Vec<f64> = interim_sum
                .iter()
                .map(|s| s / interim_count as f64)
                .collect();
            log::info!(
                "sweep {}: held-out MAPE {:.6}, RMSE {:.6}",
                sweep + 1,
                mape(&actual, &predicted),
                rmse(&actual, &predicted)
            );
            interim_sum.iter_mut().for_each(|s| *s = 0.0);
            interim_count = 0;
        }
    }

    let tensor_hat = &posterior_acc / config.gibbs_iter as f64;
    let predicted: Vec<f64> = positions.iter().map(|&p| tensor_hat[p]).collect();
    let final_mape = mape(&actual, &predicted);
    let final_rmse = rmse(&actual, &predicted);
    log::info!(
        "final estimate after {} sampling sweeps: held-out MAPE {:.6}, RMSE {:.6}",
        config.gibbs_iter,
        final_mape,
        final_rmse
    );

    Ok(GibbsSummary {
        tensor_hat,
        state,
        mape: final_mape,
        rmse: final_rmse,
    })
}
