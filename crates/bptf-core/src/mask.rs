//! Observation masks and held-out coordinate sets
//!
//! A partially observed tensor marks missing entries under one of two
//! conventions: `NaN` sentinels, or exact zeros. The mask is derived once
//! from the observed tensor and held constant for a fitting run; the
//! fitting code itself only ever sees zero-filled data weighted by the
//! mask.

use crate::Tensor3;
use anyhow::Result;

impl Tensor3<f64> {
    /// True when any entry is NaN, i.e. the NaN missing-value convention.
    pub fn uses_nan_convention(&self) -> bool {
        self.iter().any(|v| v.is_nan())
    }

    /// Derive the 0/1 observation mask
    ///
    /// Under the NaN convention an entry is observed iff it is not NaN
    /// (explicit zeros count as observed). Under the zero-sentinel
    /// convention an entry is observed iff it is nonzero.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptf_core::Tensor3;
    ///
    /// let t = Tensor3::from_vec(vec![1.0, f64::NAN, 2.0, 0.0], [1, 2, 2]).unwrap();
    /// let mask = t.observation_mask();
    /// assert_eq!(mask[[0, 0, 0]], 1.0);
    /// assert_eq!(mask[[0, 0, 1]], 0.0);
    /// assert_eq!(mask[[0, 1, 0]], 1.0);
    /// assert_eq!(mask[[0, 1, 1]], 1.0); // explicit zero, NaN convention
    /// ```
    pub fn observation_mask(&self) -> Tensor3<f64> {
        let nan_mode = self.uses_nan_convention();
        let data = self.as_array().mapv(|v| {
            let observed = if nan_mode { !v.is_nan() } else { v != 0.0 };
            if observed {
                1.0
            } else {
                0.0
            }
        });
        Tensor3::from_array(data)
    }

    /// Replace NaN entries with 0.0
    ///
    /// Identity for tensors already using the zero-sentinel convention.
    pub fn zero_filled(&self) -> Tensor3<f64> {
        let data = self.as_array().mapv(|v| if v.is_nan() { 0.0 } else { v });
        Tensor3::from_array(data)
    }

    /// Number of observed entries under the tensor's convention.
    pub fn observed_count(&self) -> usize {
        let nan_mode = self.uses_nan_convention();
        self.iter()
            .filter(|v| if nan_mode { !v.is_nan() } else { **v != 0.0 })
            .count()
    }
}

/// Coordinates hidden from fitting but known in the reference tensor
///
/// A position is held out when the dense reference is nonzero there and
/// the sparse tensor is missing there under its convention. Positions
/// where the reference itself is zero carry no ground truth and are
/// excluded.
///
/// # Errors
///
/// Fails when the two tensors disagree on shape.
///
/// # Examples
///
/// ```
/// use bptf_core::{held_out_positions, Tensor3};
///
/// let dense = Tensor3::from_vec(vec![1.0, 0.0, 2.0, 3.0], [1, 2, 2]).unwrap();
/// let sparse = Tensor3::from_vec(vec![1.0, f64::NAN, 2.0, 0.0], [1, 2, 2]).unwrap();
/// // (0,1,1) is missing in sparse (observed zero under the NaN convention
/// // is not missing) -- only (0,0,1) would qualify, but dense is 0 there.
/// let positions = held_out_positions(&dense, &sparse).unwrap();
/// assert!(positions.is_empty());
/// ```
pub fn held_out_positions(
    dense: &Tensor3<f64>,
    sparse: &Tensor3<f64>,
) -> Result<Vec<[usize; 3]>> {
    if dense.shape() != sparse.shape() {
        anyhow::bail!(
            "Reference tensor shape {:?} does not match observed tensor shape {:?}",
            dense.shape(),
            sparse.shape()
        );
    }

    let nan_mode = sparse.uses_nan_convention();
    let [d1, d2, d3] = dense.shape();
    let mut positions = Vec::new();
    for i in 0..d1 {
        for j in 0..d2 {
            for t in 0..d3 {
                let s = sparse[[i, j, t]];
                let missing = if nan_mode { s.is_nan() } else { s == 0.0 };
                if missing && dense[[i, j, t]] != 0.0 {
                    positions.push([i, j, t]);
                }
            }
        }
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_nan_convention() {
        let t = Tensor3::from_vec(vec![1.0, f64::NAN, 2.0, 0.0], [1, 2, 2]).unwrap();
        let mask = t.observation_mask();
        assert_eq!(mask[[0, 0, 0]], 1.0);
        assert_eq!(mask[[0, 0, 1]], 0.0);
        assert_eq!(mask[[0, 1, 0]], 1.0);
        assert_eq!(mask[[0, 1, 1]], 1.0);
    }

    #[test]
    fn test_mask_zero_convention() {
        let t = Tensor3::from_vec(vec![1.0, 0.0, 2.0, 0.0], [1, 2, 2]).unwrap();
        let mask = t.observation_mask();
        assert_eq!(mask[[0, 0, 0]], 1.0);
        assert_eq!(mask[[0, 0, 1]], 0.0);
        assert_eq!(mask[[0, 1, 0]], 1.0);
        assert_eq!(mask[[0, 1, 1]], 0.0);
    }

    #[test]
    fn test_zero_filled() {
        let t = Tensor3::from_vec(vec![1.0, f64::NAN, 2.0, 0.0], [1, 2, 2]).unwrap();
        let filled = t.zero_filled();
        assert_eq!(filled[[0, 0, 0]], 1.0);
        assert_eq!(filled[[0, 0, 1]], 0.0);
        assert_eq!(filled[[0, 1, 0]], 2.0);
        assert_eq!(filled[[0, 1, 1]], 0.0);
    }

    #[test]
    fn test_observed_count() {
        let t = Tensor3::from_vec(vec![1.0, f64::NAN, 2.0, 0.0], [1, 2, 2]).unwrap();
        assert_eq!(t.observed_count(), 3);
        let z = Tensor3::from_vec(vec![1.0, 0.0, 2.0, 0.0], [1, 2, 2]).unwrap();
        assert_eq!(z.observed_count(), 2);
    }

    #[test]
    fn test_held_out_nan_convention() {
        // dense = [[1, 0], [2, 3]], sparse = [[1, NaN], [2, 0]]
        let dense = Tensor3::from_vec(vec![1.0, 0.0, 2.0, 3.0], [1, 2, 2]).unwrap();
        let sparse = Tensor3::from_vec(vec![1.0, f64::NAN, 2.0, 0.0], [1, 2, 2]).unwrap();
        let positions = held_out_positions(&dense, &sparse).unwrap();
        // (0,0,1): sparse NaN but dense zero there -> excluded.
        // (0,1,1): sparse holds an observed zero -> not missing.
        assert!(positions.is_empty());

        // Move the ground truth so the NaN cell carries it.
        let dense = Tensor3::from_vec(vec![1.0, 5.0, 2.0, 3.0], [1, 2, 2]).unwrap();
        let positions = held_out_positions(&dense, &sparse).unwrap();
        assert_eq!(positions, vec![[0, 0, 1]]);
    }

    #[test]
    fn test_held_out_zero_convention() {
        let dense = Tensor3::from_vec(vec![1.0, 0.0, 2.0, 3.0], [1, 2, 2]).unwrap();
        let sparse = Tensor3::from_vec(vec![1.0, 0.0, 2.0, 0.0], [1, 2, 2]).unwrap();
        let positions = held_out_positions(&dense, &sparse).unwrap();
        // (0,0,1) excluded: dense is zero there. (0,1,1) qualifies.
        assert_eq!(positions, vec![[0, 1, 1]]);
    }

    #[test]
    fn test_held_out_shape_mismatch() {
        let dense = Tensor3::<f64>::zeros([2, 2, 2]);
        let sparse = Tensor3::<f64>::zeros([2, 2, 3]);
        assert!(held_out_positions(&dense, &sparse).is_err());
    }
}
