//! Dense 3-way tensor storage and matricization
//!
//! The factorization model in this stack is specific to order-3 tensors
//! (two entity modes and one temporal mode), so the core type fixes the
//! dimensionality at three instead of wrapping a dynamic-rank array.

use anyhow::Result;
use scirs2_core::ndarray_ext::{Array2, Array3, ArrayView3, ArrayViewMut3};
use scirs2_core::numeric::Num;
use std::fmt;

/// Dense order-3 tensor backed by scirs2_core's ndarray
///
/// Row-major (C-contiguous) layout, matching the column ordering produced
/// by [`Tensor3::unfold`].
///
/// # Examples
///
/// ```
/// use bptf_core::Tensor3;
///
/// let t = Tensor3::<f64>::zeros([4, 5, 6]);
/// assert_eq!(t.shape(), [4, 5, 6]);
/// assert_eq!(t.len(), 120);
/// ```
#[derive(Clone, PartialEq)]
pub struct Tensor3<T> {
    pub(crate) data: Array3<T>,
}

impl<T> Tensor3<T>
where
    T: Clone + Num,
{
    /// Wrap an existing order-3 array.
    pub fn from_array(array: Array3<T>) -> Self {
        Self { data: array }
    }

    /// Build a tensor from a row-major flat vector.
    ///
    /// # Errors
    ///
    /// Fails when `vec.len()` does not equal the product of `shape`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptf_core::Tensor3;
    ///
    /// let t = Tensor3::from_vec(vec![1.0, 2.0, 3.0, 4.0], [1, 2, 2]).unwrap();
    /// assert_eq!(t[[0, 1, 0]], 3.0);
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: [usize; 3]) -> Result<Self> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            anyhow::bail!(
                "Shape {:?} requires {} elements, but got {}",
                shape,
                total,
                vec.len()
            );
        }
        let data = Array3::from_shape_vec((shape[0], shape[1], shape[2]), vec)?;
        Ok(Self { data })
    }

    /// Tensor filled with zeros.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            data: Array3::zeros((shape[0], shape[1], shape[2])),
        }
    }

    /// Tensor filled with a constant.
    pub fn from_elem(shape: [usize; 3], value: T) -> Self {
        Self {
            data: Array3::from_elem((shape[0], shape[1], shape[2]), value),
        }
    }

    /// Shape as a fixed-size array `[d1, d2, d3]`.
    pub fn shape(&self) -> [usize; 3] {
        let s = self.data.shape();
        [s[0], s[1], s[2]]
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the tensor has zero entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Immutable view of the underlying array.
    pub fn view(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    /// Mutable view of the underlying array.
    pub fn view_mut(&mut self) -> ArrayViewMut3<'_, T> {
        self.data.view_mut()
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array3<T> {
        &self.data
    }

    /// Borrow the underlying array mutably.
    pub fn as_array_mut(&mut self) -> &mut Array3<T> {
        &mut self.data
    }

    /// Iterate over entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Unfold the tensor along a mode (matricization)
    ///
    /// The mode-k fibers become the rows of the result. Columns follow the
    /// row-major layout of the remaining modes, later axis varying fastest:
    /// for mode 0 the column index is `j * d3 + t`, for mode 1 it is
    /// `i * d3 + t`, for mode 2 it is `i * d2 + j`.
    ///
    /// # Errors
    ///
    /// Fails when `mode >= 3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptf_core::Tensor3;
    ///
    /// let t = Tensor3::<f64>::zeros([2, 3, 4]);
    /// let m = t.unfold(2).unwrap();
    /// assert_eq!(m.shape(), &[4, 6]);
    /// ```
    pub fn unfold(&self, mode: usize) -> Result<Array2<T>> {
        let [d1, d2, d3] = self.shape();
        let (perm, rows, cols) = match mode {
            0 => ([0, 1, 2], d1, d2 * d3),
            1 => ([1, 0, 2], d2, d1 * d3),
            2 => ([2, 0, 1], d3, d1 * d2),
            _ => anyhow::bail!("Mode {} out of bounds for an order-3 tensor", mode),
        };

        let permuted = self.data.clone().permuted_axes(perm);
        let contiguous = permuted.as_standard_layout().into_owned();
        let unfolded = contiguous.into_shape_with_order((rows, cols))?;
        Ok(unfolded)
    }

    /// Fold a mode-k matricization back into a tensor
    ///
    /// Inverse of [`Tensor3::unfold`] for the same `mode` and `shape`.
    ///
    /// # Errors
    ///
    /// Fails when `mode >= 3` or the matrix dimensions are incompatible
    /// with `shape`.
    pub fn fold(matrix: &Array2<T>, shape: [usize; 3], mode: usize) -> Result<Self> {
        let [d1, d2, d3] = shape;
        let (inter, inv_perm) = match mode {
            0 => ((d1, d2, d3), [0, 1, 2]),
            1 => ((d2, d1, d3), [1, 0, 2]),
            2 => ((d3, d1, d2), [1, 2, 0]),
            _ => anyhow::bail!("Mode {} out of bounds for an order-3 tensor", mode),
        };

        let rows = shape[mode];
        let cols = d1 * d2 * d3 / shape[mode].max(1);
        if matrix.shape() != [rows, cols] {
            anyhow::bail!(
                "Matrix shape {:?} incompatible with tensor shape {:?} and mode {}",
                matrix.shape(),
                shape,
                mode
            );
        }

        let stacked = matrix.clone().into_shape_with_order(inter)?;
        let data = stacked
            .permuted_axes(inv_perm)
            .as_standard_layout()
            .into_owned();
        Ok(Self { data })
    }
}

impl Tensor3<f64> {
    /// Frobenius norm: square root of the sum of squared entries.
    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

impl<T> std::ops::Index<[usize; 3]> for Tensor3<T> {
    type Output = T;

    fn index(&self, index: [usize; 3]) -> &T {
        &self.data[index]
    }
}

impl<T> std::ops::IndexMut<[usize; 3]> for Tensor3<T> {
    fn index_mut(&mut self, index: [usize; 3]) -> &mut T {
        &mut self.data[index]
    }
}

impl<'b, T> std::ops::Add<&'b Tensor3<T>> for &Tensor3<T>
where
    T: Clone + Num,
{
    type Output = Tensor3<T>;

    fn add(self, rhs: &'b Tensor3<T>) -> Tensor3<T> {
        Tensor3 {
            data: &self.data + &rhs.data,
        }
    }
}

impl<'b, T> std::ops::Sub<&'b Tensor3<T>> for &Tensor3<T>
where
    T: Clone + Num,
{
    type Output = Tensor3<T>;

    fn sub(self, rhs: &'b Tensor3<T>) -> Tensor3<T> {
        Tensor3 {
            data: &self.data - &rhs.data,
        }
    }
}

impl<'b, T> std::ops::AddAssign<&'b Tensor3<T>> for Tensor3<T>
where
    T: Clone + Num + std::ops::AddAssign,
{
    fn add_assign(&mut self, rhs: &'b Tensor3<T>) {
        self.data += &rhs.data;
    }
}

impl std::ops::Mul<f64> for &Tensor3<f64> {
    type Output = Tensor3<f64>;

    fn mul(self, rhs: f64) -> Tensor3<f64> {
        Tensor3 {
            data: &self.data * rhs,
        }
    }
}

impl std::ops::Div<f64> for &Tensor3<f64> {
    type Output = Tensor3<f64>;

    fn div(self, rhs: f64) -> Tensor3<f64> {
        Tensor3 {
            data: &self.data / rhs,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Tensor3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor3{:?} ", self.data.shape())?;
        self.data.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iota(shape: [usize; 3]) -> Tensor3<f64> {
        let n: usize = shape.iter().product();
        Tensor3::from_vec((0..n).map(|x| x as f64).collect(), shape).unwrap()
    }

    #[test]
    fn test_from_vec_shape_mismatch() {
        let result = Tensor3::from_vec(vec![1.0, 2.0, 3.0], [2, 2, 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_indexing_row_major() {
        let t = iota([2, 3, 4]);
        // Row-major: entry (i, j, k) lives at i*12 + j*4 + k
        assert_eq!(t[[0, 0, 0]], 0.0);
        assert_eq!(t[[0, 0, 3]], 3.0);
        assert_eq!(t[[0, 2, 1]], 9.0);
        assert_eq!(t[[1, 1, 2]], 18.0);
    }

    #[test]
    fn test_unfold_mode0_is_reshape() {
        let t = iota([2, 3, 4]);
        let m = t.unfold(0).unwrap();
        assert_eq!(m.shape(), &[2, 12]);
        // Column index j*4 + t for row i
        assert_eq!(m[[0, 5]], t[[0, 1, 1]]);
        assert_eq!(m[[1, 11]], t[[1, 2, 3]]);
    }

    #[test]
    fn test_unfold_mode1_columns() {
        let t = iota([2, 3, 4]);
        let m = t.unfold(1).unwrap();
        assert_eq!(m.shape(), &[3, 8]);
        // Column index i*4 + t for row j
        for i in 0..2 {
            for j in 0..3 {
                for k in 0..4 {
                    assert_eq!(m[[j, i * 4 + k]], t[[i, j, k]]);
                }
            }
        }
    }

    #[test]
    fn test_unfold_mode2_columns() {
        let t = iota([2, 3, 4]);
        let m = t.unfold(2).unwrap();
        assert_eq!(m.shape(), &[4, 6]);
        // Column index i*3 + j for row t
        for i in 0..2 {
            for j in 0..3 {
                for k in 0..4 {
                    assert_eq!(m[[k, i * 3 + j]], t[[i, j, k]]);
                }
            }
        }
    }

    #[test]
    fn test_unfold_invalid_mode() {
        let t = Tensor3::<f64>::zeros([2, 2, 2]);
        assert!(t.unfold(3).is_err());
    }

    #[test]
    fn test_fold_inverts_unfold() {
        let t = iota([3, 4, 5]);
        for mode in 0..3 {
            let m = t.unfold(mode).unwrap();
            let back = Tensor3::fold(&m, [3, 4, 5], mode).unwrap();
            assert_eq!(back, t);
        }
    }

    #[test]
    fn test_fold_rejects_bad_matrix() {
        let m = Array2::<f64>::zeros((3, 7));
        assert!(Tensor3::fold(&m, [3, 2, 4], 0).is_err());
    }

    #[test]
    fn test_arithmetic_ops() {
        let a = iota([2, 2, 2]);
        let b = iota([2, 2, 2]);
        let sum = &a + &b;
        assert_eq!(sum[[1, 1, 1]], 14.0);
        let diff = &sum - &a;
        assert_eq!(diff, b);
        let scaled = &a * 2.0;
        assert_eq!(scaled[[1, 0, 0]], 8.0);
        let mut acc = Tensor3::<f64>::zeros([2, 2, 2]);
        acc += &a;
        acc += &a;
        assert_eq!(acc, scaled);
    }

    #[test]
    fn test_frobenius_norm() {
        let t = Tensor3::from_vec(vec![3.0, 0.0, 0.0, 4.0], [1, 2, 2]).unwrap();
        assert!((t.frobenius_norm() - 5.0).abs() < 1e-12);
    }
}
