//! Value - Expression Handle with Gradient Tracking
//!
//! [`Value`] is the user-facing handle of the engine: a reference-counted
//! pointer to a computation-graph node. Cloning a handle shares the node;
//! building an expression out of handles records the operations so that
//! [`Value::backward`] can compute the gradient of the result with respect
//! to every leaf that requires one.
//!
//! Raw scalars, vectors, and matrices can be mixed into expressions
//! directly; they are lifted into constant leaves owned by the resulting
//! node.
//!
//! @version 0.1.0
//! @author Gradix Development Team

use core::fmt;
use std::sync::Arc;

use gradix_tensor::{Error, Result, Tensor, Vector};
use parking_lot::RwLockWriteGuard;

use crate::functions::{
    CosBackward, ExpandBackward, PowBackward, ReluBackward, SigmoidBackward, SinBackward,
    SumBackward, TileBackward,
};
use crate::grad_fn::GradFn;
use crate::node::{Node, TraceNode};

// =============================================================================
// Value Struct
// =============================================================================

/// A handle to one node of the computation graph.
///
/// The handle is a thin wrapper around a shared pointer: copies observe the
/// same node, and the node (plus everything reachable from it) lives for as
/// long as any handle does.
pub struct Value<T: Tensor> {
    node: Arc<Node<T>>,
}

impl<T: Tensor> Clone for Value<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T: Tensor> Value<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a leaf that participates in differentiation.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            node: Node::leaf(value, true),
        }
    }

    /// Creates a constant leaf.
    ///
    /// Constants are treated as fixed values: the backward pass never
    /// writes a gradient for them. Raw operands in mixed expressions are
    /// lifted through this constructor.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            node: Node::leaf(value, false),
        }
    }

    /// Creates a handle for an operation result.
    pub(crate) fn from_op(value: T, grad_fn: GradFn<T>, requires_grad: bool) -> Self {
        Self {
            node: Node::from_op(value, grad_fn, requires_grad),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the current forward value.
    #[must_use]
    pub fn value(&self) -> T {
        *self.node.value.read()
    }

    /// Returns a write guard over the forward value.
    pub fn value_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.node.value.write()
    }

    /// Replaces the forward value.
    pub fn set_value(&self, value: T) {
        *self.node.value.write() = value;
    }

    /// Returns the gradient computed by the last backward pass.
    ///
    /// # Errors
    /// [`Error::MissingGradient`] when no backward pass has reached this
    /// node.
    pub fn grad(&self) -> Result<T> {
        (*self.node.grad.read()).ok_or_else(|| {
            Error::missing_gradient("grad() called before a backward pass reached this node")
        })
    }

    /// Returns whether the backward pass propagates through this node.
    #[must_use]
    pub fn requires_grad(&self) -> bool {
        self.node.requires_grad
    }

    // =========================================================================
    // Differentiation
    // =========================================================================

    /// Runs the backward pass from this node.
    ///
    /// The gradient is seeded with the all-ones element of this node's
    /// shape, then propagated to every reachable leaf that requires one.
    /// Gradients from a previous invocation are discarded, not accumulated.
    ///
    /// # Errors
    /// [`Error::UnsupportedDerivative`] when the graph routes a gradient
    /// through a non-differentiable argument.
    pub fn backward(&self) -> Result<()> {
        crate::backward::backward(self)
    }

    /// Applies one gradient-descent step: `value <- value - grad * lr`.
    ///
    /// # Errors
    /// [`Error::MissingGradient`] when no backward pass has reached this
    /// node.
    pub fn update(&self, lr: f32) -> Result<()> {
        let grad = match *self.node.grad.read() {
            Some(grad) => grad,
            None => {
                return Err(Error::missing_gradient(
                    "update() called before a backward pass reached this node",
                ))
            }
        };
        let mut value = self.node.value.write();
        *value = *value - grad * lr;
        Ok(())
    }

    // =========================================================================
    // Element-Wise Operations
    // =========================================================================

    /// `ReLU` activation, element-wise `max(x, 0)`.
    #[must_use]
    pub fn relu(&self) -> Value<T> {
        let output = self.value().map(|x| if x > 0.0 { x } else { 0.0 });
        Value::from_op(
            output,
            GradFn::new(ReluBackward::new(self.clone())),
            self.requires_grad(),
        )
    }

    /// Sigmoid activation, element-wise `1 / (1 + e^-x)`.
    #[must_use]
    pub fn sigmoid(&self) -> Value<T> {
        let output = self.value().map(|x| 1.0 / (1.0 + (-x).exp()));
        Value::from_op(
            output,
            GradFn::new(SigmoidBackward::new(self.clone(), output)),
            self.requires_grad(),
        )
    }

    /// Element-wise sine.
    #[must_use]
    pub fn sin(&self) -> Value<T> {
        let output = self.value().map(f32::sin);
        Value::from_op(
            output,
            GradFn::new(SinBackward::new(self.clone())),
            self.requires_grad(),
        )
    }

    /// Element-wise cosine.
    #[must_use]
    pub fn cos(&self) -> Value<T> {
        let output = self.value().map(f32::cos);
        Value::from_op(
            output,
            GradFn::new(CosBackward::new(self.clone())),
            self.requires_grad(),
        )
    }

    /// Element-wise power with a scalar exponent handle.
    ///
    /// The result differentiates with respect to the base only; a backward
    /// pass through a `requires_grad` exponent fails with
    /// [`Error::UnsupportedDerivative`].
    #[must_use]
    pub fn pow(&self, exponent: &Value<f32>) -> Value<T> {
        let e = exponent.value();
        let output = self.value().map(|x| x.powf(e));
        let requires_grad = self.requires_grad() || exponent.requires_grad();
        Value::from_op(
            output,
            GradFn::new(PowBackward::new(self.clone(), exponent.clone())),
            requires_grad,
        )
    }

    /// Element-wise power with a raw scalar exponent.
    #[must_use]
    pub fn powf(&self, exponent: f32) -> Value<T> {
        self.pow(&Value::constant(exponent))
    }

    // =========================================================================
    // Reductions
    // =========================================================================

    /// Sums all components into a scalar node.
    #[must_use]
    pub fn sum(&self) -> Value<f32> {
        Value::from_op(
            self.value().sum(),
            GradFn::new(SumBackward::new(self.clone())),
            self.requires_grad(),
        )
    }

    // =========================================================================
    // Internal
    // =========================================================================

    pub(crate) fn node(&self) -> &Node<T> {
        &self.node
    }

    pub(crate) fn trace(&self) -> Arc<dyn TraceNode> {
        Arc::clone(&self.node) as Arc<dyn TraceNode>
    }
}

// =============================================================================
// Shape Changes
// =============================================================================

impl Value<f32> {
    /// Replicates this scalar into an `N`-vector.
    ///
    /// The backward rule sums the `N` upstream components back onto the
    /// scalar.
    #[must_use]
    pub fn expand<const N: usize>(&self) -> Value<Vector<N>> {
        let output = Vector::splat(self.value());
        Value::from_op(
            output,
            GradFn::new(ExpandBackward::new(self.clone())),
            self.requires_grad(),
        )
    }
}

impl<const S: usize> Value<Vector<S>> {
    /// Tiles this vector into `M / S` contiguous blocks:
    /// `out[i*S + j] = v[j]`.
    ///
    /// # Errors
    /// [`Error::ShapeMismatch`] when `S` does not divide `M`.
    pub fn expand<const M: usize>(&self) -> Result<Value<Vector<M>>> {
        if S == 0 || M % S != 0 {
            return Err(Error::shape_mismatch(&[S], &[M]));
        }
        let input = self.value();
        let output = Vector::<M>::from_fn(|i| input[i % S]);
        Ok(Value::from_op(
            output,
            GradFn::new(TileBackward::new(self.clone())),
            self.requires_grad(),
        ))
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Renders the expression tree, inlining each operation's symbol; leaves
/// print their value. Printing reads the graph and mutates nothing.
impl<T: Tensor> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node.grad_fn {
            Some(grad_fn) => grad_fn.fmt_expr(f),
            None => write!(f, "{}", *self.node.value.read()),
        }
    }
}

impl<T: Tensor> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("value", &self.value())
            .field("requires_grad", &self.requires_grad())
            .field("grad_fn", &self.node.grad_fn.as_ref().map(GradFn::name))
            .finish()
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
    fn test_leaf_creation() {
        let v = Value::new(3.0f32);
        assert_eq!(v.value(), 3.0);
        assert!(v.requires_grad());

        let c = Value::constant(3.0f32);
        assert!(!c.requires_grad());
    }

    #[test]
    fn test_clone_shares_the_node() {
        let a = Value::new(1.0f32);
        let b = a.clone();
        b.set_value(5.0);
        assert_eq!(a.value(), 5.0);
    }

    #[test]
    fn test_grad_before_backward_fails() {
        let v = Value::new(3.0f32);
        assert!(matches!(v.grad(), Err(Error::MissingGradient { .. })));
        assert!(matches!(v.update(0.1), Err(Error::MissingGradient { .. })));
    }

    #[test]
    fn test_relu_forward() {
        let v = Value::new(Vector::new([-1.0, 2.0]));
        assert_eq!(v.relu().value().to_vec(), vec![0.0, 2.0]);
    }

    #[test]
    fn test_sigmoid_forward_bounds() {
        let v = Value::new(Vector::new([-10.0, 0.0, 10.0]));
        let out = v.sigmoid().value().to_vec();
        assert!(out.iter().all(|&x| x > 0.0 && x < 1.0));
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sum_forward() {
        let m = Value::new(Matrix::<2, 2>::ones());
        assert_eq!(m.sum().value(), 4.0);
    }

    #[test]
    fn test_expand_scalar_forward() {
        let s = Value::new(2.0f32);
        let v: Value<Vector<4>> = s.expand();
        assert_eq!(v.value().to_vec(), vec![2.0; 4]);
    }

    #[test]
    fn test_expand_vector_forward_and_shape_check() {
        let v = Value::new(Vector::new([1.0, 2.0, 3.0]));
        let tiled = v.expand::<6>().unwrap();
        assert_eq!(tiled.value().to_vec(), vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);

        assert!(v.expand::<7>().is_err());
    }

    #[test]
    fn test_display_leaf_prints_value() {
        let v = Value::new(3.0f32);
        assert_eq!(v.to_string(), "3");
    }
}
