//! Creation Helpers - Random Tensor Construction
//!
//! Free functions for building randomly initialised vectors and matrices,
//! used by the nn layer for parameter initialisation and by tests.
//!
//! @version 0.1.0
//! @author Gradix Development Team

use rand::Rng;
use rand_distr::StandardNormal;

use crate::matrix::Matrix;
use crate::vector::Vector;

// =============================================================================
// Normal Distribution
// =============================================================================

/// Creates a vector with components drawn from the standard normal
/// distribution.
#[must_use]
pub fn randn_vector<const N: usize>() -> Vector<N> {
    let mut rng = rand::thread_rng();
    Vector::from_fn(|_| rng.sample(StandardNormal))
}

/// Creates a matrix with entries drawn from the standard normal
/// distribution.
#[must_use]
pub fn randn_matrix<const R: usize, const C: usize>() -> Matrix<R, C> {
    let mut rng = rand::thread_rng();
    Matrix::from_fn(|_, _| rng.sample(StandardNormal))
}

/// Creates a vector with components drawn from `N(mean, std_dev^2)`.
#[must_use]
pub fn randn_vector_with<const N: usize>(mean: f32, std_dev: f32) -> Vector<N> {
    let mut rng = rand::thread_rng();
    Vector::from_fn(|_| mean + rng.sample::<f32, _>(StandardNormal) * std_dev)
}

/// Creates a matrix with entries drawn from `N(mean, std_dev^2)`.
#[must_use]
pub fn randn_matrix_with<const R: usize, const C: usize>(mean: f32, std_dev: f32) -> Matrix<R, C> {
    let mut rng = rand::thread_rng();
    Matrix::from_fn(|_, _| mean + rng.sample::<f32, _>(StandardNormal) * std_dev)
}

// =============================================================================
// Uniform Distribution
// =============================================================================

/// Creates a vector with components drawn uniformly from `[low, high)`.
#[must_use]
pub fn rand_vector<const N: usize>(low: f32, high: f32) -> Vector<N> {
    let mut rng = rand::thread_rng();
    Vector::from_fn(|_| rng.gen_range(low..high))
}

/// Creates a matrix with entries drawn uniformly from `[low, high)`.
#[must_use]
pub fn rand_matrix<const R: usize, const C: usize>(low: f32, high: f32) -> Matrix<R, C> {
    let mut rng = rand::thread_rng();
    Matrix::from_fn(|_, _| rng.gen_range(low..high))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_randn_vector_varies() {
        let v: Vector<16> = randn_vector();
        // All components equal would mean the generator is broken.
        let first = v[0];
        assert!(v.to_vec().iter().any(|&x| x != first));
    }

    #[test]
    fn test_randn_with_offset() {
        let v: Vector<64> = randn_vector_with(100.0, 0.1);
        for x in v.to_vec() {
            assert!((x - 100.0).abs() < 10.0);
        }
    }

    #[test]
    fn test_rand_matrix_in_range() {
        let m: Matrix<8, 8> = rand_matrix(-1.0, 1.0);
        for x in m.to_vec() {
            assert!((-1.0..1.0).contains(&x));
        }
    }
}
