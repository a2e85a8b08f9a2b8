//! Parameter Initialisation
//!
//! Leaf constructors for network parameters: normally distributed weights
//! and zero-filled biases, all with gradient tracking enabled.
//!
//! @version 0.1.0
//! @author Gradix Development Team

use gradix_autograd::Value;
use gradix_tensor::{randn_matrix_with, randn_vector_with, Matrix, Vector};

// =============================================================================
// Normal Initialisation
// =============================================================================

/// Creates a weight matrix leaf with entries drawn from `N(0, std_dev^2)`.
#[must_use]
pub fn normal_matrix<const R: usize, const C: usize>(std_dev: f32) -> Value<Matrix<R, C>> {
    Value::new(randn_matrix_with(0.0, std_dev))
}

/// Creates a weight vector leaf with components drawn from
/// `N(0, std_dev^2)`.
#[must_use]
pub fn normal_vector<const N: usize>(std_dev: f32) -> Value<Vector<N>> {
    Value::new(randn_vector_with(0.0, std_dev))
}

// =============================================================================
// Zero Initialisation
// =============================================================================

/// Creates a zero-filled bias vector leaf.
#[must_use]
pub fn zero_vector<const N: usize>() -> Value<Vector<N>> {
    Value::new(Vector::zeros())
}

/// Creates a zero-filled scalar leaf.
#[must_use]
pub fn zero_scalar() -> Value<f32> {
    Value::new(0.0)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_matrix_tracks_gradients() {
        let w: Value<Matrix<4, 4>> = normal_matrix(0.1);
        assert!(w.requires_grad());
        let spread = w.value().to_vec();
        assert!(spread.iter().any(|&x| x != spread[0]));
    }

    #[test]
    fn test_zero_init() {
        let b: Value<Vector<8>> = zero_vector();
        assert_eq!(b.value().to_vec(), vec![0.0; 8]);
        assert!(b.requires_grad());
    }
}
