//! CP reconstruction: factors back to a dense tensor

use crate::error::{KernelError, KernelResult};
use bptf_core::Tensor3;
use scirs2_core::ndarray_ext::{Array3, ArrayView2};

/// Contract three factor matrices into the dense rank-R tensor
///
/// Computes `ten[i, j, t] = Σ_r u[i, r] * v[j, r] * x[t, r]`, the CP model
/// with weights absorbed into the factors.
///
/// # Arguments
///
/// * `u` - First-mode factor, shape (d1, R)
/// * `v` - Second-mode factor, shape (d2, R)
/// * `x` - Third-mode factor, shape (d3, R)
///
/// # Errors
///
/// Returns [`KernelError::RankMismatch`] when the factors disagree on R.
///
/// # Complexity
///
/// Time: O(d1 · d2 · d3 · R). Space: O(d1 · d2 · d3).
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use bptf_kernels::cp_reconstruct;
///
/// let u = array![[1.0], [2.0]];
/// let v = array![[3.0], [4.0]];
/// let x = array![[5.0]];
/// let ten = cp_reconstruct(&u.view(), &v.view(), &x.view()).unwrap();
/// assert_eq!(ten[[1, 0, 0]], 30.0);
/// ```
pub fn cp_reconstruct(
    u: &ArrayView2<f64>,
    v: &ArrayView2<f64>,
    x: &ArrayView2<f64>,
) -> KernelResult<Tensor3<f64>> {
    let rank = u.ncols();
    for (index, factor) in [v, x].iter().enumerate() {
        if factor.ncols() != rank {
            return Err(KernelError::rank_mismatch(
                "cp_reconstruct",
                rank,
                factor.ncols(),
                index + 1,
            ));
        }
    }

    let (d1, d2, d3) = (u.nrows(), v.nrows(), x.nrows());
    let mut data = Array3::<f64>::zeros((d1, d2, d3));
    for i in 0..d1 {
        for j in 0..d2 {
            for t in 0..d3 {
                let mut acc = 0.0;
                for r in 0..rank {
                    acc += u[[i, r]] * v[[j, r]] * x[[t, r]];
                }
                data[[i, j, t]] = acc;
            }
        }
    }
    Ok(Tensor3::from_array(data))
}
