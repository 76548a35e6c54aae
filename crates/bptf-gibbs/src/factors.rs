//! Conditional-posterior samplers for the three factor matrices
//!
//! Under the CP model `ten[i,j,t] = Σ_r U[i,r] V[j,r] X[t,r]` with Gaussian
//! observation noise, each row of a factor matrix has an exact Gaussian
//! conditional given the other two factors, the noise precision, and its
//! hyperparameters. The per-row normal equations are accumulated from the
//! mode-k unfolding of the noise-weighted data against the Khatri-Rao
//! design built from the other two factors.
//!
//! The two entity factors are exchangeable across rows; the temporal
//! factor is a random-walk chain and is updated strictly in time order
//! (see [`sample_temporal_factor`]).

use crate::error::{GibbsError, GibbsResult};
use crate::hyper::{sample_entity_hyper, sample_temporal_hyper, FactorHyper};
use bptf_core::Tensor3;
// Both variants produce the same design matrix; enabling `parallel` does
// not change the chain's draw sequence.
#[cfg(not(feature = "parallel"))]
use bptf_kernels::khatri_rao;
#[cfg(feature = "parallel")]
use bptf_kernels::khatri_rao_parallel as khatri_rao;
use bptf_kernels::{chol_solve, cholesky_lower, solve_lower_transposed};
use rand_distr::{Distribution, StandardNormal};
use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView2};
use scirs2_core::random::Rng;

/// Accumulate one row's normal-equation contributions
///
/// Over the unfold columns `c` with weight `w[c]` and target `y[c]`:
/// precision += Σ w[c]·d_c d_cᵀ and linear += Σ y[c]·d_c, where `d_c` is
/// row `c` of the design matrix. Zero-weight columns are skipped; the
/// zero-filled data is zero there as well.
fn accumulate_row(
    design: &Array2<f64>,
    weights: &Array2<f64>,
    targets: &Array2<f64>,
    row: usize,
    precision: &mut Array2<f64>,
    linear: &mut Array1<f64>,
) {
    let rank = design.ncols();
    for c in 0..design.nrows() {
        let w = weights[[row, c]];
        if w == 0.0 {
            continue;
        }
        let y = targets[[row, c]];
        let d = design.row(c);
        for a in 0..rank {
            let da = d[a];
            linear[a] += y * da;
            for b in 0..rank {
                precision[[a, b]] += w * da * d[b];
            }
        }
    }
}

/// Draw from N(mean, precision⁻¹) given the precision's lower factor.
fn draw_row<R: Rng>(rng: &mut R, l: &Array2<f64>, mean: &Array1<f64>) -> Array1<f64> {
    let z: Array1<f64> = Array1::from_shape_fn(mean.len(), |_| StandardNormal.sample(rng));
    let mut row = solve_lower_transposed(&l.view(), &z.view());
    row += mean;
    row
}

/// Resample an entity factor matrix (mode 0 or 1) row by row
///
/// Every row is drawn from its exact Gaussian conditional. All rows of a
/// sweep share the hyperparameters drawn here and read the other two
/// factors in their pre-update state for this sweep; rows are
/// conditionally independent given those, and the loop keeps a single RNG
/// stream so a fixed seed reproduces the chain draw for draw.
///
/// # Arguments
///
/// * `mode` - 0 for the first entity factor, 1 for the second
/// * `tau_sparse` - noise-weighted zero-filled data (τ · data)
/// * `tau_mask` - noise-weighted observation mask (τ · mask)
/// * `factor` - the factor being resampled, mutated in place
/// * `other_low`, `other_high` - the remaining factors in increasing mode
///   order (for mode 0: V then X; for mode 1: U then X)
pub fn sample_entity_factor<R: Rng>(
    rng: &mut R,
    mode: usize,
    tau_sparse: &Tensor3<f64>,
    tau_mask: &Tensor3<f64>,
    factor: &mut Array2<f64>,
    other_low: &ArrayView2<f64>,
    other_high: &ArrayView2<f64>,
    beta0: f64,
) -> GibbsResult<()> {
    let hyper = sample_entity_hyper(rng, &factor.view(), beta0)?;
    let design = khatri_rao(other_low, other_high)?;
    let weights = tau_mask
        .unfold(mode)
        .map_err(|e| GibbsError::ShapeMismatch(e.to_string()))?;
    let targets = tau_sparse
        .unfold(mode)
        .map_err(|e| GibbsError::ShapeMismatch(e.to_string()))?;

    if weights.ncols() != design.nrows() {
        return Err(GibbsError::ShapeMismatch(format!(
            "mode-{} unfolding has {} columns but the design matrix has {} rows",
            mode,
            weights.ncols(),
            design.nrows()
        )));
    }

    let rank = factor.ncols();
    let lambda_mu = hyper.lambda.dot(&hyper.mu);

    for i in 0..factor.nrows() {
        let mut precision = hyper.lambda.clone();
        let mut linear = lambda_mu.clone();
        accumulate_row(&design, &weights, &targets, i, &mut precision, &mut linear);

        let l = cholesky_lower(&precision.view(), "entity row posterior precision")?;
        let mean = chol_solve(&l.view(), &linear.view());
        let row = draw_row(rng, &l, &mean);
        for r in 0..rank {
            factor[[i, r]] = row[r];
        }
    }
    Ok(())
}

/// Resample the temporal factor matrix along its random-walk chain
///
/// The chain prior couples adjacent time steps, so the slab updates are
/// state-dependent:
///
/// - `t = 0`: precision = contribution + 2Λ, drawn directly around
///   `(X[1] + μ)/2` (chain-edge shortcut, no solve)
/// - interior `t`: precision = contribution + 2Λ, mean solves
///   `contribution-vector + Λ(X[t-1] + X[t+1])`
/// - `t = last`: precision = contribution + Λ, mean solves
///   `contribution-vector + Λ·X[t-1]`
///
/// Time steps are processed in strictly increasing order, so each update
/// sees an already-resampled left neighbor and a not-yet-resampled right
/// neighbor. That sequential coupling is part of the sampler's contract;
/// reordering or parallelizing this loop changes the chain.
pub fn sample_temporal_factor<R: Rng>(
    rng: &mut R,
    tau_sparse: &Tensor3<f64>,
    tau_mask: &Tensor3<f64>,
    u: &ArrayView2<f64>,
    v: &ArrayView2<f64>,
    x: &mut Array2<f64>,
    beta0: f64,
) -> GibbsResult<()> {
    let hyper = sample_temporal_hyper(rng, &x.view(), beta0)?;
    let design = khatri_rao(u, v)?;
    let weights = tau_mask
        .unfold(2)
        .map_err(|e| GibbsError::ShapeMismatch(e.to_string()))?;
    let targets = tau_sparse
        .unfold(2)
        .map_err(|e| GibbsError::ShapeMismatch(e.to_string()))?;

    if weights.ncols() != design.nrows() {
        return Err(GibbsError::ShapeMismatch(format!(
            "mode-2 unfolding has {} columns but the design matrix has {} rows",
            weights.ncols(),
            design.nrows()
        )));
    }

    let (d3, rank) = x.dim();
    if d3 < 2 {
        return Err(GibbsError::InvalidConfig(
            "temporal mode needs at least two steps for the random-walk prior".into(),
        ));
    }
    let FactorHyper { mu, lambda } = hyper;

    for t in 0..d3 {
        let mut contrib_prec = Array2::<f64>::zeros((rank, rank));
        let mut contrib_lin = Array1::<f64>::zeros(rank);
        accumulate_row(
            &design,
            &weights,
            &targets,
            t,
            &mut contrib_prec,
            &mut contrib_lin,
        );

        let row = if t == 0 {
            let precision = &contrib_prec + &(&lambda * 2.0);
            let mut mean = Array1::<f64>::zeros(rank);
            for r in 0..rank {
                mean[r] = 0.5 * (x[[1, r]] + mu[r]);
            }
            let l = cholesky_lower(&precision.view(), "temporal initial-step precision")?;
            draw_row(rng, &l, &mean)
        } else if t == d3 - 1 {
            let precision = &contrib_prec + &lambda;
            let mut target = contrib_lin;
            for a in 0..rank {
                for b in 0..rank {
                    target[a] += lambda[[a, b]] * x[[t - 1, b]];
                }
            }
            let l = cholesky_lower(&precision.view(), "temporal final-step precision")?;
            let mean = chol_solve(&l.view(), &target.view());
            draw_row(rng, &l, &mean)
        } else {
            let precision = &contrib_prec + &(&lambda * 2.0);
            let mut target = contrib_lin;
            for a in 0..rank {
                for b in 0..rank {
                    target[a] += lambda[[a, b]] * (x[[t - 1, b]] + x[[t + 1, b]]);
                }
            }
            let l = cholesky_lower(&precision.view(), "temporal interior-step precision")?;
            let mean = chol_solve(&l.view(), &target.view());
            draw_row(rng, &l, &mean)
        };

        for r in 0..rank {
            x[[t, r]] = row[r];
        }
    }
    Ok(())
}
