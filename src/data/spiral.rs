use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::math::matrix::Matrix;

/// Angle noise applied to every spiral point.
const ANGLE_NOISE: f64 = 0.2;

/// Generates the interleaved-spirals classification set.
///
/// Returns `points * classes` two-dimensional samples grouped by class, and
/// the matching class index per row. Class `c` sweeps radius 0 → 1 while its
/// angle runs over `[4c, 4(c + 1)]` with Gaussian jitter.
pub fn spiral_data<R: Rng>(points: usize, classes: usize, rng: &mut R) -> (Matrix, Vec<usize>) {
    let mut features = Array2::zeros((points * classes, 2));
    let mut labels = vec![0usize; points * classes];

    for class in 0..classes {
        let radius = Array1::linspace(0.0, 1.0, points);
        let start = class as f64 * 4.0;
        let angle = Array1::linspace(start, start + 4.0, points);

        for i in 0..points {
            let row = points * class + i;
            let t = (angle[i] + rng.sample::<f64, _>(StandardNormal) * ANGLE_NOISE) * 2.5;
            features[[row, 0]] = radius[i] * t.sin();
            features[[row, 1]] = radius[i] * t.cos();
            labels[row] = class;
        }
    }

    (features, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn shapes_and_labels_are_grouped_by_class() {
        let (x, y) = spiral_data(100, 3, &mut StdRng::seed_from_u64(0));
        assert_eq!(x.dim(), (300, 2));
        assert_eq!(y.len(), 300);
        assert_eq!(y[0], 0);
        assert_eq!(y[150], 1);
        assert_eq!(y[299], 2);
    }

    #[test]
    fn points_stay_inside_unit_disc() {
        let (x, _) = spiral_data(50, 4, &mut StdRng::seed_from_u64(1));
        for row in x.rows() {
            assert!(row[0].hypot(row[1]) <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn first_point_of_each_class_is_origin() {
        let (x, _) = spiral_data(10, 2, &mut StdRng::seed_from_u64(2));
        assert_eq!(x.row(0).to_vec(), vec![0.0, 0.0]);
        assert_eq!(x.row(10).to_vec(), vec![0.0, 0.0]);
    }
}
