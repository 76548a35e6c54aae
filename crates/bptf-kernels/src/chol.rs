//! Cholesky factorization helpers for precision-form Gaussian algebra
//!
//! The conditional updates of the Gibbs sampler are parameterized by
//! precision matrices, not covariances. Everything downstream of a
//! factorization is triangular substitution against the lower factor:
//! solving for posterior means, drawing correlated normals, and inverting
//! the (small, R×R) Wishart scale. The factorization itself comes from
//! `scirs2-linalg`; a failure there signals a precision matrix that lost
//! positive-definiteness and is treated as fatal by callers.

use crate::error::{KernelError, KernelResult};
use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView1, ArrayView2};

/// Lower Cholesky factor L with `a = L Lᵀ`
///
/// # Errors
///
/// Returns [`KernelError::DimensionMismatch`] when `a` is not square, and
/// [`KernelError::NotPositiveDefinite`] when the factorization breaks
/// down. The `context` string names the matrix for the diagnostic.
pub fn cholesky_lower(a: &ArrayView2<f64>, context: &str) -> KernelResult<Array2<f64>> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(KernelError::dimension_mismatch(
            "cholesky_lower",
            vec![rows, rows],
            vec![rows, cols],
        ));
    }

    scirs2_linalg::cholesky(a, None).map_err(|_| KernelError::not_positive_definite(context))
}

/// Forward substitution: solve `L y = b` for lower-triangular L.
pub fn solve_lower(l: &ArrayView2<f64>, b: &ArrayView1<f64>) -> Array1<f64> {
    let n = b.len();
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut acc = b[i];
        for k in 0..i {
            acc -= l[[i, k]] * y[k];
        }
        y[i] = acc / l[[i, i]];
    }
    y
}

/// Backward substitution: solve `Lᵀ x = b` for lower-triangular L.
pub fn solve_lower_transposed(l: &ArrayView2<f64>, b: &ArrayView1<f64>) -> Array1<f64> {
    let n = b.len();
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut acc = b[i];
        for k in i + 1..n {
            acc -= l[[k, i]] * x[k];
        }
        x[i] = acc / l[[i, i]];
    }
    x
}

/// Solve the SPD system `A x = b` given the lower factor of `A = L Lᵀ`.
pub fn chol_solve(l: &ArrayView2<f64>, b: &ArrayView1<f64>) -> Array1<f64> {
    let y = solve_lower(l, b);
    solve_lower_transposed(l, &y.view())
}

/// SPD inverse via substitution against the identity
///
/// Solves `A X = I` column by column through the Cholesky factor and
/// symmetrizes the result to scrub round-off asymmetry.
///
/// # Errors
///
/// Returns [`KernelError::NotPositiveDefinite`] when `a` fails to factor.
pub fn chol_inverse(a: &ArrayView2<f64>, context: &str) -> KernelResult<Array2<f64>> {
    let n = a.nrows();
    let l = cholesky_lower(a, context)?;

    let mut inv = Array2::<f64>::zeros((n, n));
    let mut e = Array1::<f64>::zeros(n);
    for j in 0..n {
        e[j] = 1.0;
        let col = chol_solve(&l.view(), &e.view());
        inv.column_mut(j).assign(&col);
        e[j] = 0.0;
    }

    for i in 0..n {
        for j in i + 1..n {
            let avg = 0.5 * (inv[[i, j]] + inv[[j, i]]);
            inv[[i, j]] = avg;
            inv[[j, i]] = avg;
        }
    }
    Ok(inv)
}
