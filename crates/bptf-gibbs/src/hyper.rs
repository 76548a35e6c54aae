//! Per-sweep hyperparameter draws
//!
//! Each factor matrix carries a (mean, precision) pair refreshed from its
//! conjugate posterior at the start of every sweep. The two entity factors
//! use an exchangeable Normal-Wishart prior over rows; the temporal factor
//! uses a Gaussian random-walk prior, so its hyperparameters come from the
//! first differences of the chain and its initial row instead of the row
//! scatter.

use crate::error::GibbsResult;
use crate::sampling::{mvn_precision_sample, wishart_sample};
use bptf_kernels::chol_inverse;
use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView2};
use scirs2_core::random::Rng;

/// One sweep's (mean, precision) prior for a factor's conditional sampler.
#[derive(Debug, Clone)]
pub struct FactorHyper {
    pub mu: Array1<f64>,
    pub lambda: Array2<f64>,
}

/// Normal-Wishart posterior draw for an exchangeable entity factor
///
/// With n factor rows, row mean f̄ and scatter S:
///
/// ```text
/// W⁻¹ = I + S + (n·β0/(n+β0)) · f̄ f̄ᵀ
/// Λ ~ Wishart(n + R, W)
/// μ ~ N( (n/(n+β0)) · f̄ , ((n+β0) Λ)⁻¹ )
/// ```
pub fn sample_entity_hyper<R: Rng>(
    rng: &mut R,
    factor: &ArrayView2<f64>,
    beta0: f64,
) -> GibbsResult<FactorHyper> {
    let (n, rank) = factor.dim();
    let nf = n as f64;

    let mut mean = Array1::<f64>::zeros(rank);
    for row in factor.outer_iter() {
        mean += &row;
    }
    mean /= nf;

    let mut inv_scale = Array2::<f64>::zeros((rank, rank));
    for row in factor.outer_iter() {
        for a in 0..rank {
            let da = row[a] - mean[a];
            for b in 0..rank {
                inv_scale[[a, b]] += da * (row[b] - mean[b]);
            }
        }
    }

    let shrink = nf * beta0 / (nf + beta0);
    for a in 0..rank {
        for b in 0..rank {
            inv_scale[[a, b]] += shrink * mean[a] * mean[b];
        }
        inv_scale[[a, a]] += 1.0;
    }

    let scale = chol_inverse(&inv_scale.view(), "entity hyperprior scale")?;
    let lambda = wishart_sample(rng, nf + rank as f64, &scale.view(), "entity hyperprior scale")?;

    let mu_mean = &mean * (nf / (nf + beta0));
    let mu_precision = &lambda * (nf + beta0);
    let mu = mvn_precision_sample(
        rng,
        &mu_mean.view(),
        &mu_precision.view(),
        "entity hyperprior mean",
    )?;

    Ok(FactorHyper { mu, lambda })
}

/// Random-walk (AR(1)) hyperparameter draw for the temporal factor
///
/// The chain prior is not exchangeable: the scale comes from the first
/// differences `dx[t] = X[t+1] - X[t]` and the initial row,
///
/// ```text
/// W⁻¹ = I + dxᵀdx + β0 · X[0] X[0]ᵀ / (β0+1)
/// Λ ~ Wishart(d3 + R, W)
/// μ ~ N( X[0]/(β0+1) , ((β0+1) Λ)⁻¹ )
/// ```
pub fn sample_temporal_hyper<R: Rng>(
    rng: &mut R,
    x: &ArrayView2<f64>,
    beta0: f64,
) -> GibbsResult<FactorHyper> {
    let (d3, rank) = x.dim();

    let mut inv_scale = Array2::<f64>::zeros((rank, rank));
    for t in 1..d3 {
        for a in 0..rank {
            let da = x[[t, a]] - x[[t - 1, a]];
            for b in 0..rank {
                inv_scale[[a, b]] += da * (x[[t, b]] - x[[t - 1, b]]);
            }
        }
    }

    let x0 = x.row(0);
    let shrink = beta0 / (beta0 + 1.0);
    for a in 0..rank {
        for b in 0..rank {
            inv_scale[[a, b]] += shrink * x0[a] * x0[b];
        }
        inv_scale[[a, a]] += 1.0;
    }

    let scale = chol_inverse(&inv_scale.view(), "temporal hyperprior scale")?;
    let lambda = wishart_sample(
        rng,
        (d3 + rank) as f64,
        &scale.view(),
        "temporal hyperprior scale",
    )?;

    let mu_mean = &x0.to_owned() / (beta0 + 1.0);
    let mu_precision = &lambda * (beta0 + 1.0);
    let mu = mvn_precision_sample(
        rng,
        &mu_mean.view(),
        &mu_precision.view(),
        "temporal hyperprior mean",
    )?;

    Ok(FactorHyper { mu, lambda })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bptf_kernels::cholesky_lower;
    use scirs2_core::ndarray_ext::array;
    use scirs2_core::random::{SeedableRng, StdRng};

    #[test]
    fn test_entity_hyper_shapes_and_pd() {
        let factor = array![
            [0.3, -0.1, 0.5],
            [0.2, 0.4, -0.3],
            [-0.6, 0.1, 0.2],
            [0.0, -0.2, 0.1],
            [0.5, 0.3, -0.4],
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let hyper = sample_entity_hyper(&mut rng, &factor.view(), 1.0).unwrap();
        assert_eq!(hyper.mu.len(), 3);
        assert_eq!(hyper.lambda.dim(), (3, 3));
        assert!(cholesky_lower(&hyper.lambda.view(), "lambda").is_ok());
    }

    #[test]
    fn test_entity_hyper_mean_tracks_rows() {
        // Rows clustered tightly around a point: posterior mean draws
        // should land near shrink * center = (n/(n+1)) * center.
        let n = 50;
        let factor = Array2::from_shape_fn((n, 2), |(i, r)| {
            let center = [2.0, -1.0][r];
            center + 0.01 * ((i * 7 + r * 3) % 11) as f64 / 11.0
        });
        let mut rng = StdRng::seed_from_u64(2);
        let mut mu_mean = [0.0; 2];
        let draws = 200;
        for _ in 0..draws {
            let hyper = sample_entity_hyper(&mut rng, &factor.view(), 1.0).unwrap();
            mu_mean[0] += hyper.mu[0];
            mu_mean[1] += hyper.mu[1];
        }
        let shrink = n as f64 / (n as f64 + 1.0);
        assert!((mu_mean[0] / draws as f64 - shrink * 2.0).abs() < 0.1);
        assert!((mu_mean[1] / draws as f64 + shrink * 1.0).abs() < 0.1);
    }

    #[test]
    fn test_temporal_hyper_shapes_and_pd() {
        let x = array![
            [0.1, 0.2],
            [0.15, 0.1],
            [0.2, 0.05],
            [0.3, -0.1],
            [0.25, -0.2],
        ];
        let mut rng = StdRng::seed_from_u64(4);
        let hyper = sample_temporal_hyper(&mut rng, &x.view(), 1.0).unwrap();
        assert_eq!(hyper.mu.len(), 2);
        assert_eq!(hyper.lambda.dim(), (2, 2));
        assert!(cholesky_lower(&hyper.lambda.view(), "lambda").is_ok());
    }

    #[test]
    fn test_temporal_hyper_smooth_chain_high_precision() {
        // A nearly constant chain has tiny first differences, so the
        // Wishart scale is large and drawn precisions should be much
        // bigger than for a wild chain.
        let smooth = Array2::from_shape_fn((40, 2), |(t, r)| 0.5 + 1e-4 * (t + r) as f64);
        let rough = Array2::from_shape_fn((40, 2), |(t, r)| {
            if (t + r) % 2 == 0 {
                2.0
            } else {
                -2.0
            }
        });

        let mut rng = StdRng::seed_from_u64(6);
        let mut smooth_trace = 0.0;
        let mut rough_trace = 0.0;
        for _ in 0..50 {
            let hs = sample_temporal_hyper(&mut rng, &smooth.view(), 1.0).unwrap();
            let hr = sample_temporal_hyper(&mut rng, &rough.view(), 1.0).unwrap();
            smooth_trace += hs.lambda[[0, 0]] + hs.lambda[[1, 1]];
            rough_trace += hr.lambda[[0, 0]] + hr.lambda[[1, 1]];
        }
        assert!(
            smooth_trace > 10.0 * rough_trace,
            "smooth {} vs rough {}",
            smooth_trace,
            rough_trace
        );
    }
}
