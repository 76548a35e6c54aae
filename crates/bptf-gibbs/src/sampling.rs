//! Elementary posterior draws: precision-form normals, Wishart matrices,
//! and the observation-noise precision
//!
//! Everything here is parameterized by precision rather than covariance.
//! Sampling from N(μ, Λ⁻¹) goes through the Cholesky factor of Λ itself:
//! with Λ = L Lᵀ and z standard normal, the solution of Lᵀ y = z has
//! covariance (L Lᵀ)⁻¹ = Λ⁻¹. No covariance matrix is ever formed.

use crate::error::{GibbsError, GibbsResult};
use bptf_core::Tensor3;
use bptf_kernels::{cholesky_lower, solve_lower_transposed};
use rand_distr::{ChiSquared, Distribution, Gamma, StandardNormal};
use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView1, ArrayView2};
use scirs2_core::random::Rng;

/// Draw from N(μ, Λ⁻¹) given the precision matrix Λ
///
/// # Errors
///
/// A Λ that is not symmetric positive-definite is a fatal precondition
/// violation and surfaces as a Cholesky failure tagged with `context`.
pub fn mvn_precision_sample<R: Rng>(
    rng: &mut R,
    mu: &ArrayView1<f64>,
    lambda: &ArrayView2<f64>,
    context: &str,
) -> GibbsResult<Array1<f64>> {
    let l = cholesky_lower(lambda, context)?;
    let z: Array1<f64> = Array1::from_shape_fn(mu.len(), |_| StandardNormal.sample(rng));
    let mut y = solve_lower_transposed(&l.view(), &z.view());
    y += mu;
    Ok(y)
}

/// Draw a precision matrix from the Wishart distribution W(df, scale)
///
/// Bartlett decomposition: with scale = L Lᵀ and A lower-triangular where
/// `A[i,i]² ~ ChiSquared(df - i)` and `A[i,j] ~ N(0,1)` for `i > j`, the
/// product (L A)(L A)ᵀ is Wishart-distributed and positive-definite by
/// construction.
///
/// # Errors
///
/// Fails when `df < dim` (the draw would be singular) or the scale matrix
/// is not positive-definite.
pub fn wishart_sample<R: Rng>(
    rng: &mut R,
    df: f64,
    scale: &ArrayView2<f64>,
    context: &str,
) -> GibbsResult<Array2<f64>> {
    let dim = scale.nrows();
    if df < dim as f64 {
        return Err(GibbsError::InvalidDistribution(format!(
            "Wishart degrees of freedom {} below dimension {}",
            df, dim
        )));
    }

    let l = cholesky_lower(scale, context)?;
    let mut a = Array2::<f64>::zeros((dim, dim));
    for i in 0..dim {
        let chi = ChiSquared::new(df - i as f64).map_err(|e| {
            GibbsError::InvalidDistribution(format!("chi-squared(df = {}): {}", df - i as f64, e))
        })?;
        a[[i, i]] = chi.sample(rng).sqrt();
        for j in 0..i {
            a[[i, j]] = StandardNormal.sample(rng);
        }
    }

    let la = l.dot(&a);
    Ok(la.dot(&la.t()))
}

/// Resample the shared observation-noise precision τ
///
/// Gamma conditional over the residuals at observed entries:
/// shape `1e-6 + n_obs/2`, rate `1e-6 + Σ residual²/2`, drawn as
/// `Gamma(shape, scale = 1/rate)`.
pub fn sample_precision_tau<R: Rng>(
    rng: &mut R,
    sparse: &Tensor3<f64>,
    tensor_hat: &Tensor3<f64>,
    mask: &Tensor3<f64>,
) -> GibbsResult<f64> {
    const PRIOR: f64 = 1e-6;

    let mut count = 0.0;
    let mut sum_sq = 0.0;
    for ((s, h), m) in sparse.iter().zip(tensor_hat.iter()).zip(mask.iter()) {
        if *m != 0.0 {
            let r = s - h;
            sum_sq += r * r;
            count += 1.0;
        }
    }

    let shape = PRIOR + 0.5 * count;
    let rate = PRIOR + 0.5 * sum_sq;
    let gamma = Gamma::new(shape, 1.0 / rate).map_err(|e| {
        GibbsError::InvalidDistribution(format!(
            "Gamma(shape = {}, scale = {}): {}",
            shape,
            1.0 / rate,
            e
        ))
    })?;
    Ok(gamma.sample(rng))
}
