use ndarray::{Array2, ArrayView1, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

/// Row-major batch matrix: one sample per row.
///
/// All arithmetic (dot products, broadcasting, axis reductions) comes from
/// `ndarray`; this module only adds the handful of helpers the layers share.
pub type Matrix = Array2<f64>;

/// Samples a (rows, cols) matrix from N(0, 1) scaled by `scale`.
///
/// With `scale = 0.01` this is the small symmetric-breaking initialisation the
/// dense layers use.
pub fn gaussian<R: Rng>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
    Array2::from_shape_fn((rows, cols), |_| rng.sample::<f64, _>(StandardNormal) * scale)
}

/// Per-row maximum as an (n, 1) column, ready to broadcast against `m`.
pub fn row_max(m: &Matrix) -> Matrix {
    m.map_axis(Axis(1), |row| row.fold(f64::NEG_INFINITY, |acc, &x| acc.max(x)))
        .insert_axis(Axis(1))
}

/// Per-row sum as an (n, 1) column.
pub fn row_sum(m: &Matrix) -> Matrix {
    m.sum_axis(Axis(1)).insert_axis(Axis(1))
}

/// Column sums as a (1, cols) row, collapsing the batch dimension.
pub fn column_sum(m: &Matrix) -> Matrix {
    m.sum_axis(Axis(0)).insert_axis(Axis(0))
}

/// Index of the maximum element of a row. Ties resolve to the first index.
pub fn argmax(row: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &x) in row.iter().enumerate() {
        if x > row[best] {
            best = i;
        }
    }
    best
}

/// Arg-max of every row.
pub fn argmax_rows(m: &Matrix) -> Vec<usize> {
    m.rows().into_iter().map(argmax).collect()
}

/// Element-wise clamp into `[lo, hi]`.
pub fn clip(m: &Matrix, lo: f64, hi: f64) -> Matrix {
    m.mapv(|x| x.clamp(lo, hi))
}

/// Panics with a descriptive message when `a` and `b` differ in shape.
pub fn assert_same_shape(context: &str, a: &Matrix, b: &Matrix) {
    if a.dim() != b.dim() {
        panic!(
            "{}: matrices are of incorrect sizes ({:?} vs {:?})",
            context,
            a.dim(),
            b.dim()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn row_reductions_keep_column_shape() {
        let m = array![[1.0, 5.0, 2.0], [-3.0, -1.0, -2.0]];
        assert_eq!(row_max(&m), array![[5.0], [-1.0]]);
        assert_eq!(row_sum(&m), array![[8.0], [-6.0]]);
        assert_eq!(column_sum(&m), array![[-2.0, 4.0, 0.0]]);
    }

    #[test]
    fn argmax_prefers_first_of_equal_maxima() {
        let m = array![[0.2, 0.4, 0.4], [0.9, 0.05, 0.05]];
        assert_eq!(argmax_rows(&m), vec![1, 0]);
    }

    #[test]
    fn clip_bounds_every_entry() {
        let m = array![[0.0, 0.5, 1.0]];
        assert_eq!(clip(&m, 0.1, 0.9), array![[0.1, 0.5, 0.9]]);
    }

    #[test]
    fn gaussian_is_seeded_and_scaled() {
        let a = gaussian(4, 3, 0.01, &mut StdRng::seed_from_u64(7));
        let b = gaussian(4, 3, 0.01, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|x| x.abs() < 0.1));
        assert!(a.iter().any(|&x| x != 0.0));
    }

    #[test]
    #[should_panic(expected = "matrices are of incorrect sizes")]
    fn shape_check_panics() {
        assert_same_shape("test", &Matrix::zeros((2, 2)), &Matrix::zeros((2, 3)));
    }
}
