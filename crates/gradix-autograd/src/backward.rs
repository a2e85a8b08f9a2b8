//! Backward Pass - Gradient Computation
//!
//! Implements the backward traversal: order the reachable graph
//! topologically, clear stale gradients, seed the root with the all-ones
//! element of its shape, then visit nodes in reverse topological order,
//! letting each operation accumulate contributions into its inputs.
//!
//! Accumulating (rather than overwriting) makes shared sub-expressions
//! correct: a node feeding several consumers receives the sum of their
//! contributions before its own rule runs. The traversal is iterative, so
//! stack depth does not grow with graph depth.
//!
//! @version 0.1.0
//! @author Gradix Development Team

use std::collections::HashSet;
use std::sync::Arc;

use gradix_tensor::{Result, Tensor};

use crate::node::TraceNode;
use crate::value::Value;

// =============================================================================
// Backward Function
// =============================================================================

/// Computes gradients for every requiring leaf reachable from `root`.
///
/// Calling this on a root that does not require gradients is a no-op.
///
/// # Errors
/// [`gradix_tensor::Error::UnsupportedDerivative`] when the graph routes a
/// gradient through a non-differentiable argument.
pub fn backward<T: Tensor>(root: &Value<T>) -> Result<()> {
    if !root.requires_grad() {
        return Ok(());
    }

    let order = topo_order(root.trace());

    // Discard gradients from any previous invocation.
    for node in &order {
        node.clear_grad();
    }

    root.node().seed();

    for node in order.iter().rev() {
        node.step()?;
    }

    Ok(())
}

/// Collects the requiring subgraph in topological order (inputs first),
/// deduplicated by node identity. Iterative DFS with an explicit stack.
fn topo_order(root: Arc<dyn TraceNode>) -> Vec<Arc<dyn TraceNode>> {
    let mut order: Vec<Arc<dyn TraceNode>> = Vec::new();
    let mut visited: HashSet<usize> = HashSet::new();
    let mut stack: Vec<(Arc<dyn TraceNode>, bool)> = vec![(root, false)];

    while let Some((node, inputs_done)) = stack.pop() {
        if inputs_done {
            order.push(node);
            continue;
        }
        if !visited.insert(node.key()) {
            continue;
        }
        let inputs = node.inputs();
        stack.push((node, true));
        for input in inputs {
            // Nothing below a non-requiring node can require gradients.
            if input.requires_grad() && !visited.contains(&input.key()) {
                stack.push((input, false));
            }
        }
    }

    order
}

// =============================================================================
// Gradient Checking
// =============================================================================

/// Numerically estimates the gradient of a scalar-valued graph function by
/// central differences, for validating analytical gradients in tests.
pub fn numerical_gradient<T, F>(func: F, input: &T, eps: f32) -> T
where
    T: Tensor,
    F: Fn(&Value<T>) -> Value<f32>,
{
    let mut grad = T::zeros();

    for i in 0..T::NUMEL {
        let mut plus = *input;
        plus.set_component(i, input.component(i) + eps);
        let plus_value = func(&Value::constant(plus)).value();

        let mut minus = *input;
        minus.set_component(i, input.component(i) - eps);
        let minus_value = func(&Value::constant(minus)).value();

        grad.set_component(i, (plus_value - minus_value) / (2.0 * eps));
    }

    grad
}

/// Checks that analytical and numerical gradients agree within a combined
/// relative/absolute tolerance.
#[must_use]
pub fn gradcheck<T: Tensor>(analytical: &T, numerical: &T, rtol: f32, atol: f32) -> bool {
    for i in 0..T::NUMEL {
        let a = analytical.component(i);
        let n = numerical.component(i);
        if (a - n).abs() > atol + rtol * n.abs() {
            return false;
        }
    }
    true
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gradix_tensor::{Error, Matrix, Vector};

    #[test]
    fn test_leaf_gradient_is_one() {
        let a = Value::new(3.0f32);
        let b = &a + 0.0;
        b.backward().unwrap();
        assert_eq!(a.grad().unwrap(), 1.0);
    }

    #[test]
    fn test_addition_is_linear() {
        let a = Value::new(2.0f32);
        let b = Value::new(3.0f32);
        let y = &a + &b;
        y.backward().unwrap();
        assert_eq!(a.grad().unwrap(), 1.0);
        assert_eq!(b.grad().unwrap(), 1.0);
    }

    #[test]
    fn test_product_rule() {
        let a = Value::new(2.0f32);
        let b = Value::new(3.0f32);
        let y = &a * &b;
        y.backward().unwrap();
        assert_eq!(a.grad().unwrap(), 3.0);
        assert_eq!(b.grad().unwrap(), 2.0);
    }

    #[test]
    fn test_division_rule() {
        let a = Value::new(2.0f32);
        let b = Value::new(4.0f32);
        let y = &a / &b;
        y.backward().unwrap();
        assert_eq!(a.grad().unwrap(), 0.25);
        assert_eq!(b.grad().unwrap(), -2.0 / 16.0);
    }

    #[test]
    fn test_chain_rule_through_relu() {
        let x = Value::new(-3.0f32);
        let y = (-&x * 3.0 + 2.0).relu();
        y.backward().unwrap();
        assert_eq!(x.grad().unwrap(), -3.0);
    }

    #[test]
    fn test_relu_blocks_dead_branch() {
        let x = Value::new(3.0f32);
        // -x*3 + 2 = -7 < 0, so the gate is closed.
        let y = (-&x * 3.0 + 2.0).relu();
        y.backward().unwrap();
        assert_eq!(x.grad().unwrap(), 0.0);
    }

    #[test]
    fn test_shared_node_accumulates() {
        // y = x * x must see both paths: dy/dx = 2x.
        let x = Value::new(3.0f32);
        let y = &x * &x;
        y.backward().unwrap();
        assert_eq!(x.grad().unwrap(), 6.0);
    }

    #[test]
    fn test_diamond_graph_accumulates() {
        // y = (a + b) * (a - b) = a^2 - b^2; dy/da = 2a, dy/db = -2b.
        let a = Value::new(3.0f32);
        let b = Value::new(2.0f32);
        let y = (&a + &b) * (&a - &b);
        y.backward().unwrap();
        assert_eq!(a.grad().unwrap(), 6.0);
        assert_eq!(b.grad().unwrap(), -4.0);
    }

    #[test]
    fn test_second_backward_overwrites_not_accumulates() {
        let a = Value::new(2.0f32);
        let b = Value::new(3.0f32);
        let y = &a * &b;
        y.backward().unwrap();
        y.backward().unwrap();
        assert_eq!(a.grad().unwrap(), 3.0);
    }

    #[test]
    fn test_backward_on_constant_root_is_noop() {
        let c = Value::constant(3.0f32);
        let y = &c + 1.0;
        assert!(!y.requires_grad());
        y.backward().unwrap();
        assert!(matches!(c.grad(), Err(Error::MissingGradient { .. })));
    }

    #[test]
    fn test_matvec_backward_shapes() {
        let m = Value::new(Matrix::<3, 3>::identity());
        let v = Value::new(Vector::new([2.0, 4.0, 6.0]));
        let y = (&m * &v + 2.0).sum();
        y.backward().unwrap();

        assert_eq!(y.value(), 18.0);
        let m_grad = m.grad().unwrap();
        for i in 0..3 {
            assert_eq!(m_grad.row(i).to_vec(), vec![2.0, 4.0, 6.0]);
        }
        assert_eq!(v.grad().unwrap().to_vec(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_scaled_vector_backward() {
        let v = Value::new(Vector::new([1.0, 2.0, 3.0]));
        let y = 2.0 * &v;
        y.sum().backward().unwrap();
        assert_eq!(v.grad().unwrap().to_vec(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_expand_round_trip() {
        let s = Value::new(1.5f32);
        let y: Value<Vector<4>> = s.expand();
        y.sum().backward().unwrap();
        assert_eq!(s.grad().unwrap(), 4.0);
    }

    #[test]
    fn test_tile_round_trip() {
        let v = Value::new(Vector::new([1.0, 2.0, 3.0]));
        let y = v.expand::<6>().unwrap();
        y.sum().backward().unwrap();
        assert_eq!(v.grad().unwrap().to_vec(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_sigmoid_gradient_at_zero() {
        let x = Value::new(0.0f32);
        let y = x.sigmoid();
        y.backward().unwrap();
        assert!((y.value() - 0.5).abs() < 1e-6);
        assert!((x.grad().unwrap() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_pow_gradient() {
        let v = Value::new(Vector::new([1.0, 2.0, 3.0]));
        v.powf(2.0).sum().backward().unwrap();
        assert_eq!(v.grad().unwrap().to_vec(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_pow_exponent_gradient_is_rejected() {
        let base = Value::new(2.0f32);
        let exponent = Value::new(3.0f32);
        let y = base.pow(&exponent);
        assert!(matches!(
            y.backward(),
            Err(Error::UnsupportedDerivative { .. })
        ));
    }

    #[test]
    fn test_trig_gradients() {
        let x = Value::new(1.0f32);
        x.sin().backward().unwrap();
        assert!((x.grad().unwrap() - 1.0f32.cos()).abs() < 1e-6);

        x.cos().backward().unwrap();
        assert!((x.grad().unwrap() + 1.0f32.sin()).abs() < 1e-6);
    }

    #[test]
    fn test_numerical_gradient_matches_analytical() {
        let input = Vector::new([0.5, -1.0, 2.0]);

        let v = Value::new(input);
        (v.powf(2.0) * 3.0 + v.sin()).sum().backward().unwrap();
        let analytical = v.grad().unwrap();

        let numerical = numerical_gradient(
            |x: &Value<Vector<3>>| (x.powf(2.0) * 3.0 + x.sin()).sum(),
            &input,
            1e-3,
        );

        assert!(gradcheck(&analytical, &numerical, 1e-2, 1e-2));
    }

    #[test]
    fn test_dropped_intermediate_handle_stays_alive() {
        let a = Value::new(2.0f32);
        let y = {
            let hidden = &a * 3.0;
            hidden.relu()
            // `hidden` goes out of scope here; the relu node keeps it alive.
        };
        y.backward().unwrap();
        assert_eq!(a.grad().unwrap(), 3.0);
    }
}
