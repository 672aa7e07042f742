use ndarray::Array2;

use crate::math::matrix::{argmax_rows, Matrix};

/// Ground-truth class labels for a batch.
///
/// The encoding is part of the type, so every consumer matches on it instead
/// of guessing from array rank.
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    /// One class index per sample.
    Sparse(Vec<usize>),
    /// One one-hot row per sample, shape (samples, classes).
    OneHot(Matrix),
}

impl Labels {
    /// Number of samples the labels describe.
    pub fn len(&self) -> usize {
        match self {
            Labels::Sparse(indices) => indices.len(),
            Labels::OneHot(rows) => rows.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Class indices; one-hot rows collapse to their arg-max.
    pub fn to_sparse(&self) -> Vec<usize> {
        match self {
            Labels::Sparse(indices) => indices.clone(),
            Labels::OneHot(rows) => argmax_rows(rows),
        }
    }

    /// One-hot matrix with `classes` columns.
    ///
    /// # Panics
    /// Panics if a sparse index is out of range, or if one-hot rows have a
    /// different width than `classes`.
    pub fn to_one_hot(&self, classes: usize) -> Matrix {
        match self {
            Labels::Sparse(indices) => {
                let mut out = Array2::zeros((indices.len(), classes));
                for (row, &class) in indices.iter().enumerate() {
                    assert!(
                        class < classes,
                        "label {} out of range for {} classes",
                        class,
                        classes
                    );
                    out[[row, class]] = 1.0;
                }
                out
            }
            Labels::OneHot(rows) => {
                assert_eq!(
                    rows.ncols(),
                    classes,
                    "one-hot labels have {} columns, expected {}",
                    rows.ncols(),
                    classes
                );
                rows.clone()
            }
        }
    }
}

impl From<Vec<usize>> for Labels {
    fn from(indices: Vec<usize>) -> Self {
        Labels::Sparse(indices)
    }
}

impl From<Matrix> for Labels {
    fn from(rows: Matrix) -> Self {
        Labels::OneHot(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn sparse_and_one_hot_convert_both_ways() {
        let sparse = Labels::Sparse(vec![2, 0, 1]);
        let one_hot = sparse.to_one_hot(3);
        assert_eq!(
            one_hot,
            array![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
        );
        assert_eq!(Labels::OneHot(one_hot).to_sparse(), vec![2, 0, 1]);
    }

    #[test]
    fn len_counts_samples_for_either_encoding() {
        assert_eq!(Labels::from(vec![0, 1]).len(), 2);
        assert_eq!(Labels::from(Matrix::zeros((4, 3))).len(), 4);
        assert!(Labels::Sparse(vec![]).is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn sparse_index_beyond_classes_panics() {
        Labels::Sparse(vec![3]).to_one_hot(3);
    }
}
