//! Integration tests for the full sampling pipeline
//!
//! These exercise the whole chain on small synthetic tensors: low-rank
//! recovery through missing data, reproducibility under a fixed seed, and
//! both missing-value conventions end to end.

use bptf_core::Tensor3;
use bptf_gibbs::{bptf, FactorInit, GibbsConfig};
use bptf_kernels::cp_reconstruct;
use scirs2_core::ndarray_ext::Array2;
use scirs2_core::random::{SeedableRng, StdRng};

/// Rank-2 ground truth with strictly positive entries, shape (4, 4, 10).
fn ground_truth() -> Tensor3<f64> {
    let u = Array2::from_shape_fn((4, 2), |(i, r)| 0.6 + 0.15 * i as f64 + 0.1 * r as f64);
    let v = Array2::from_shape_fn((4, 2), |(j, r)| 0.5 + 0.12 * j as f64 + 0.08 * r as f64);
    let x = Array2::from_shape_fn((10, 2), |(t, r)| 0.5 + 0.05 * t as f64 + 0.1 * r as f64);
    cp_reconstruct(&u.view(), &v.view(), &x.view()).unwrap()
}

/// Hide roughly 20% of the entries (zero-sentinel convention), skipping
/// the first time slab so the held-out score is not dominated by the
/// chain-edge approximation of the temporal sampler.
fn hide_entries(dense: &Tensor3<f64>) -> Tensor3<f64> {
    let mut sparse = dense.clone();
    for i in 0..4 {
        for j in 0..4 {
            for t in 1..10 {
                if (i * 40 + j * 10 + t) % 5 == 3 {
                    sparse[[i, j, t]] = 0.0;
                }
            }
        }
    }
    sparse
}

#[test]
fn test_low_rank_recovery() {
    let dense = ground_truth();
    let sparse = hide_entries(&dense);

    let mut rng = StdRng::seed_from_u64(2024);
    let init = FactorInit::random_normal([4, 4, 10], 2, &mut rng);
    let config = GibbsConfig {
        burn_iter: 200,
        gibbs_iter: 100,
        seed: Some(31),
        ..Default::default()
    };

    let summary = bptf(&dense, &sparse, init, &config).unwrap();

    // Data scale is around 1-3; recovered held-out error should be far
    // below a tenth of that.
    assert!(
        summary.rmse < 0.2,
        "held-out RMSE too large: {}",
        summary.rmse
    );
    assert!(
        summary.mape < 0.15,
        "held-out MAPE too large: {}",
        summary.mape
    );
}

#[test]
fn test_seeded_runs_are_identical() {
    let dense = ground_truth();
    let sparse = hide_entries(&dense);
    let config = GibbsConfig {
        burn_iter: 30,
        gibbs_iter: 20,
        seed: Some(123),
        ..Default::default()
    };

    let mut rng = StdRng::seed_from_u64(555);
    let init = FactorInit::random_normal([4, 4, 10], 2, &mut rng);

    let first = bptf(&dense, &sparse, init.clone(), &config).unwrap();
    let second = bptf(&dense, &sparse, init, &config).unwrap();

    for (a, b) in first.tensor_hat.iter().zip(second.tensor_hat.iter()) {
        assert_eq!(a, b);
    }
    assert_eq!(first.state.u, second.state.u);
    assert_eq!(first.state.v, second.state.v);
    assert_eq!(first.state.x, second.state.x);
    assert_eq!(first.state.tau, second.state.tau);
    assert_eq!(first.rmse, second.rmse);
}

#[test]
fn test_different_seeds_diverge() {
    let dense = ground_truth();
    let sparse = hide_entries(&dense);
    let mut rng = StdRng::seed_from_u64(555);
    let init = FactorInit::random_normal([4, 4, 10], 2, &mut rng);

    let run = |seed: u64, init: FactorInit| {
        let config = GibbsConfig {
            burn_iter: 10,
            gibbs_iter: 5,
            seed: Some(seed),
            ..Default::default()
        };
        bptf(&dense, &sparse, init, &config).unwrap()
    };

    let a = run(1, init.clone());
    let b = run(2, init);
    assert_ne!(a.state.tau, b.state.tau);
}

#[test]
fn test_nan_convention_end_to_end() {
    let dense = ground_truth();
    let mut sparse = dense.clone();
    for i in 0..4 {
        for j in 0..4 {
            for t in 1..10 {
                if (i * 40 + j * 10 + t) % 7 == 2 {
                    sparse[[i, j, t]] = f64::NAN;
                }
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(99);
    let init = FactorInit::random_normal([4, 4, 10], 2, &mut rng);
    let config = GibbsConfig {
        burn_iter: 200,
        gibbs_iter: 100,
        seed: Some(77),
        ..Default::default()
    };

    let summary = bptf(&dense, &sparse, init, &config).unwrap();
    assert!(summary.rmse.is_finite());
    assert!(
        summary.rmse < 0.2,
        "held-out RMSE too large: {}",
        summary.rmse
    );
    // Every imputed entry is finite.
    for &v in summary.tensor_hat.iter() {
        assert!(v.is_finite());
    }
}
