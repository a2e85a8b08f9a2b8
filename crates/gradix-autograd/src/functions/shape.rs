//! Shape Gradient Functions - Reductions and Broadcasts
//!
//! Gradient functions for the shape-changing operations: the reducing sum
//! and the two expand forms (scalar replication and vector tiling). Their
//! backward rules are each other's mirror: sum broadcasts the upstream
//! scalar over the input shape, expand folds the upstream components back
//! onto their source.
//!
//! @version 0.1.0
//! @author Gradix Development Team

use core::fmt;
use std::sync::Arc;

use gradix_tensor::{Result, Tensor, Vector};

use crate::grad_fn::GradientFunction;
use crate::node::TraceNode;
use crate::value::Value;

// =============================================================================
// Sum Backward
// =============================================================================

/// Gradient function for the reducing sum.
///
/// d/dx(sum(x)) = ones of x's shape, scaled by the upstream gradient.
pub struct SumBackward<T: Tensor> {
    input: Value<T>,
}

impl<T: Tensor> SumBackward<T> {
    /// Creates a new `SumBackward`.
    #[must_use]
    pub fn new(input: Value<T>) -> Self {
        Self { input }
    }
}

impl<T: Tensor> GradientFunction<f32> for SumBackward<T> {
    fn apply(&self, grad_output: &f32) -> Result<()> {
        if self.input.requires_grad() {
            self.input.node().accumulate(T::splat(*grad_output));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sum"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.input.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sum({})", self.input)
    }
}

// =============================================================================
// Expand Backward (scalar -> vector)
// =============================================================================

/// Gradient function for replicating a scalar into a vector.
///
/// Every output component sees the scalar, so the scalar's gradient is the
/// sum of the upstream components.
pub struct ExpandBackward {
    input: Value<f32>,
}

impl ExpandBackward {
    /// Creates a new `ExpandBackward`.
    #[must_use]
    pub fn new(input: Value<f32>) -> Self {
        Self { input }
    }
}

impl<const N: usize> GradientFunction<Vector<N>> for ExpandBackward {
    fn apply(&self, grad_output: &Vector<N>) -> Result<()> {
        if self.input.requires_grad() {
            self.input.node().accumulate(grad_output.sum());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "expand"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.input.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expand({})", self.input)
    }
}

// =============================================================================
// Tile Backward (vector -> longer vector)
// =============================================================================

/// Gradient function for tiling a vector into blocks.
///
/// With `out[i*S + j] = v[j]`, source component `j` receives the sum of the
/// upstream components at positions congruent to `j` modulo `S`.
pub struct TileBackward<const S: usize> {
    input: Value<Vector<S>>,
}

impl<const S: usize> TileBackward<S> {
    /// Creates a new `TileBackward`.
    #[must_use]
    pub fn new(input: Value<Vector<S>>) -> Self {
        Self { input }
    }
}

impl<const S: usize, const M: usize> GradientFunction<Vector<M>> for TileBackward<S> {
    fn apply(&self, grad_output: &Vector<M>) -> Result<()> {
        if self.input.requires_grad() {
            let contribution = Vector::<S>::from_fn(|j| {
                let mut total = 0.0;
                let mut i = j;
                while i < M {
                    total += grad_output[i];
                    i += S;
                }
                total
            });
            self.input.node().accumulate(contribution);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "expand"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.input.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expand({})", self.input)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gradix_tensor::Matrix;

    #[test]
    fn test_sum_backward_splats() {
        let input = Value::new(Matrix::<2, 3>::ones());
        let grad_fn = SumBackward::new(input.clone());

        grad_fn.apply(&2.0).unwrap();

        let grad = input.node().grad.read().unwrap();
        assert_eq!(grad.to_vec(), vec![2.0; 6]);
    }

    #[test]
    fn test_expand_backward_sums() {
        let input = Value::new(1.5f32);
        let grad_fn = ExpandBackward::new(input.clone());

        grad_fn.apply(&Vector::new([1.0, 2.0, 3.0])).unwrap();

        assert_eq!(*input.node().grad.read(), Some(6.0));
    }

    #[test]
    fn test_tile_backward_folds_blocks() {
        let input = Value::new(Vector::new([1.0, 2.0, 3.0]));
        let grad_fn = TileBackward::new(input.clone());

        let upstream = Vector::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        GradientFunction::<Vector<6>>::apply(&grad_fn, &upstream).unwrap();

        // Component j collects upstream[j] + upstream[j + 3].
        assert_eq!(
            input.node().grad.read().unwrap().to_vec(),
            vec![5.0, 7.0, 9.0]
        );
    }
}
