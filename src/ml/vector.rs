//! Sparse feature vectors.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScamCheckError};

/// A sparse numeric vector with a fixed dimension.
///
/// Entries are kept sorted by index with no duplicates, so iteration order is
/// deterministic and dot products only touch non-zero features.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dimension: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Create an all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        SparseVector {
            dimension,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a vector from `(index, value)` entries in any order.
    ///
    /// Duplicate indices are summed and explicit zeros are dropped.
    pub fn from_entries(dimension: usize, mut entries: Vec<(usize, f64)>) -> Result<Self> {
        if let Some(&(index, _)) = entries.iter().find(|(index, _)| *index >= dimension) {
            return Err(ScamCheckError::model(format!(
                "Feature index {index} out of bounds for dimension {dimension}"
            )));
        }

        entries.sort_by_key(|(index, _)| *index);

        let mut indices: Vec<usize> = Vec::with_capacity(entries.len());
        let mut values: Vec<f64> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            if indices.last() == Some(&index) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(index);
                values.push(value);
            }
        }

        let mut vector = SparseVector {
            dimension,
            indices,
            values,
        };
        vector.prune_zeros();
        Ok(vector)
    }

    /// Dimension of the vector space.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Whether every component is zero.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(index, value)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `index`, zero when not stored.
    pub fn get(&self, index: usize) -> f64 {
        self.indices
            .binary_search(&index)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    /// Dot product with a dense weight vector of the same dimension.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.iter()
            .map(|(index, value)| value * weights.get(index).copied().unwrap_or(0.0))
            .sum()
    }

    /// Euclidean norm.
    pub fn l2_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Sum of absolute values.
    pub fn l1_norm(&self) -> f64 {
        self.values.iter().map(|v| v.abs()).sum()
    }

    /// Multiply every component by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.values {
            *value *= factor;
        }
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for (index, value) in self.iter() {
            dense[index] = value;
        }
        dense
    }

    fn prune_zeros(&mut self) {
        let mut keep = self.values.iter().map(|v| *v != 0.0);
        self.indices.retain(|_| keep.next().unwrap_or(false));
        self.values.retain(|v| *v != 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_entries_sorts_and_merges() {
        let vector =
            SparseVector::from_entries(5, vec![(3, 1.0), (1, 2.0), (3, 0.5), (4, 0.0)]).unwrap();

        assert_eq!(vector.dimension(), 5);
        assert_eq!(vector.nnz(), 2);
        assert_eq!(vector.iter().collect::<Vec<_>>(), vec![(1, 2.0), (3, 1.5)]);
        assert_eq!(vector.get(3), 1.5);
        assert_eq!(vector.get(0), 0.0);
        assert_eq!(vector.to_dense(), vec![0.0, 2.0, 0.0, 1.5, 0.0]);
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(SparseVector::from_entries(2, vec![(2, 1.0)]).is_err());
    }

    #[test]
    fn test_norms_and_dot() {
        let mut vector = SparseVector::from_entries(3, vec![(0, 3.0), (2, -4.0)]).unwrap();
        assert_eq!(vector.l2_norm(), 5.0);
        assert_eq!(vector.l1_norm(), 7.0);
        assert_eq!(vector.dot(&[1.0, 10.0, 0.5]), 1.0);

        vector.scale(0.5);
        assert_eq!(vector.to_dense(), vec![1.5, 0.0, -2.0]);

        let zeros = SparseVector::zeros(3);
        assert!(zeros.is_empty());
        assert_eq!(zeros.l2_norm(), 0.0);
    }
}
