//! Khatri-Rao product (column-wise Kronecker product)
//!
//! For A (I × K) and B (J × K), the Khatri-Rao product A ⊙ B is the
//! (I·J × K) matrix whose column k is the Kronecker product of column k of
//! A with column k of B. Row `i·J + j` of the result is therefore
//! `A[i, k] * B[j, k]`, so B's row index varies fastest, matching the
//! row-major column ordering of a tensor unfolding.

use crate::error::{KernelError, KernelResult};
use scirs2_core::ndarray_ext::{Array2, ArrayView2};

/// Compute the Khatri-Rao product of two factor matrices
///
/// # Arguments
///
/// * `a` - Matrix with shape (I, K)
/// * `b` - Matrix with shape (J, K)
///
/// # Returns
///
/// The (I·J × K) column-wise Kronecker product, row `i·J + j` holding
/// `a[i, k] * b[j, k]`.
///
/// # Errors
///
/// Returns [`KernelError::DimensionMismatch`] when the column counts
/// differ.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use bptf_kernels::khatri_rao;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[5.0, 6.0], [7.0, 8.0]];
/// let kr = khatri_rao(&a.view(), &b.view()).unwrap();
/// assert_eq!(kr.shape(), &[4, 2]);
/// assert_eq!(kr[[2, 0]], 15.0); // a[1,0] * b[0,0]
/// ```
pub fn khatri_rao(a: &ArrayView2<f64>, b: &ArrayView2<f64>) -> KernelResult<Array2<f64>> {
    let (i_rows, a_cols) = a.dim();
    let (j_rows, b_cols) = b.dim();

    if a_cols != b_cols {
        return Err(KernelError::dimension_mismatch(
            "khatri_rao",
            vec![i_rows, a_cols],
            vec![j_rows, b_cols],
        ));
    }

    Ok(Array2::from_shape_fn((i_rows * j_rows, a_cols), |(row, k)| {
        a[[row / j_rows, k]] * b[[row % j_rows, k]]
    }))
}

/// Khatri-Rao product with columns processed in parallel
///
/// Behaviorally identical to [`khatri_rao`]; worthwhile once the output
/// has a few hundred thousand entries.
#[cfg(feature = "parallel")]
pub fn khatri_rao_parallel(
    a: &ArrayView2<f64>,
    b: &ArrayView2<f64>,
) -> KernelResult<Array2<f64>> {
    use scirs2_core::ndarray_ext::Axis;
    use scirs2_core::parallel_ops::*;

    let (i_rows, a_cols) = a.dim();
    let (j_rows, b_cols) = b.dim();

    if a_cols != b_cols {
        return Err(KernelError::dimension_mismatch(
            "khatri_rao_parallel",
            vec![i_rows, a_cols],
            vec![j_rows, b_cols],
        ));
    }

    let mut result = Array2::<f64>::zeros((i_rows * j_rows, a_cols));
    result
        .axis_iter_mut(Axis(1))
        .into_par_iter()
        .enumerate()
        .for_each(|(k, mut col)| {
            for i in 0..i_rows {
                let a_ik = a[[i, k]];
                for j in 0..j_rows {
                    col[i * j_rows + j] = a_ik * b[[j, k]];
                }
            }
        });

    Ok(result)
}
