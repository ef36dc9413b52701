use rand::Rng;

use crate::math::matrix::Matrix;

/// Smallest magnitude any initial weight can take.
pub const WEIGHT_FLOOR: f64 = 0.01;

/// Fan-in scaled uniform initialization.
///
/// Every weight gets a magnitude drawn from `U[0, 1/√cols) + WEIGHT_FLOOR`
/// and an independent fair sign, where `cols` is the size of the layer the
/// links enter. The floor keeps every weight non-zero so no two paths start
/// out identical.
///
/// The random source is always supplied by the caller, which makes the
/// initial weights reproducible under a seeded generator.
pub fn fan_in_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
    let bound = 1.0 / (cols.max(1) as f64).sqrt();
    let mut res = Matrix::zeros(rows, cols);

    for i in 0..rows {
        for j in 0..cols {
            let magnitude = rng.gen_range(0.0..bound) + WEIGHT_FLOOR;
            res.data[i][j] = if rng.gen::<bool>() { magnitude } else { -magnitude };
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn weights_are_bounded_by_fan_in() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = fan_in_uniform(20, 16, &mut rng);
        assert_eq!(m.shape(), (20, 16));
        let bound = 1.0 / 4.0 + WEIGHT_FLOOR;
        for row in &m.data {
            for &w in row {
                assert!(w.abs() >= WEIGHT_FLOOR && w.abs() < bound, "weight {w} out of range");
            }
        }
    }

    #[test]
    fn both_signs_appear() {
        let mut rng = StdRng::seed_from_u64(11);
        let m = fan_in_uniform(10, 10, &mut rng);
        let flat: Vec<f64> = m.data.concat();
        assert!(flat.iter().any(|&w| w > 0.0));
        assert!(flat.iter().any(|&w| w < 0.0));
    }

    #[test]
    fn same_seed_same_weights() {
        let a = fan_in_uniform(3, 4, &mut StdRng::seed_from_u64(42));
        let b = fan_in_uniform(3, 4, &mut StdRng::seed_from_u64(42));
        let c = fan_in_uniform(3, 4, &mut StdRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
