//! Basic Gradient Functions - Arithmetic Operations
//!
//! Gradient functions for the arithmetic operations: add, sub, mul, div,
//! neg, pow. Each struct owns handles to its input nodes plus whatever
//! forward values its rule needs, and is generic over the operand shapes;
//! the supported shape pairings are exactly those for which the trait
//! bounds are satisfied.
//!
//! @version 0.1.0
//! @author Gradix Development Team

use core::fmt;
use std::sync::Arc;

use gradix_tensor::{BroadcastTo, Error, ReduceTo, Result, Tensor};

use crate::grad_fn::{reduce_to, GradientFunction, ProductGrad};
use crate::node::TraceNode;
use crate::value::Value;

// =============================================================================
// Add Backward
// =============================================================================

/// Gradient function for addition.
///
/// d/dx(x + y) = 1, d/dy(x + y) = 1; broadcast scalars collect the sum of
/// the upstream gradient.
pub struct AddBackward<A: Tensor, B: Tensor> {
    lhs: Value<A>,
    rhs: Value<B>,
}

impl<A: Tensor, B: Tensor> AddBackward<A, B> {
    /// Creates a new `AddBackward`.
    #[must_use]
    pub fn new(lhs: Value<A>, rhs: Value<B>) -> Self {
        Self { lhs, rhs }
    }
}

impl<A, B, S> GradientFunction<S> for AddBackward<A, B>
where
    A: Tensor,
    B: Tensor,
    S: Tensor + ReduceTo<A> + ReduceTo<B>,
{
    fn apply(&self, grad_output: &S) -> Result<()> {
        if self.lhs.requires_grad() {
            self.lhs.node().accumulate(reduce_to(*grad_output));
        }
        if self.rhs.requires_grad() {
            self.rhs.node().accumulate(reduce_to(*grad_output));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "+"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.lhs.trace(), self.rhs.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.lhs, self.rhs)
    }
}

// =============================================================================
// Sub Backward
// =============================================================================

/// Gradient function for subtraction.
///
/// d/dx(x - y) = 1, d/dy(x - y) = -1.
pub struct SubBackward<A: Tensor, B: Tensor> {
    lhs: Value<A>,
    rhs: Value<B>,
}

impl<A: Tensor, B: Tensor> SubBackward<A, B> {
    /// Creates a new `SubBackward`.
    #[must_use]
    pub fn new(lhs: Value<A>, rhs: Value<B>) -> Self {
        Self { lhs, rhs }
    }
}

impl<A, B, S> GradientFunction<S> for SubBackward<A, B>
where
    A: Tensor,
    B: Tensor,
    S: Tensor + ReduceTo<A> + ReduceTo<B>,
{
    fn apply(&self, grad_output: &S) -> Result<()> {
        if self.lhs.requires_grad() {
            self.lhs.node().accumulate(reduce_to(*grad_output));
        }
        if self.rhs.requires_grad() {
            self.rhs.node().accumulate(reduce_to(-*grad_output));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "-"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.lhs.trace(), self.rhs.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lhs, self.rhs)
    }
}

// =============================================================================
// Mul Backward
// =============================================================================

/// Gradient function for multiplication.
///
/// Covers the element-wise, scalar-scaled, and matrix-vector forms; the
/// shape routing lives in [`ProductGrad`].
pub struct MulBackward<A: Tensor, B: Tensor> {
    lhs: Value<A>,
    rhs: Value<B>,
    saved_lhs: A,
    saved_rhs: B,
}

impl<A: Tensor, B: Tensor> MulBackward<A, B> {
    /// Creates a new `MulBackward`, saving both forward values.
    #[must_use]
    pub fn new(lhs: Value<A>, rhs: Value<B>) -> Self {
        let saved_lhs = lhs.value();
        let saved_rhs = rhs.value();
        Self {
            lhs,
            rhs,
            saved_lhs,
            saved_rhs,
        }
    }
}

impl<A, B, S> GradientFunction<S> for MulBackward<A, B>
where
    A: Tensor + ProductGrad<B, S>,
    B: Tensor + ProductGrad<A, S>,
    S: Tensor,
{
    fn apply(&self, grad_output: &S) -> Result<()> {
        if self.lhs.requires_grad() {
            self.lhs
                .node()
                .accumulate(A::product_grad(*grad_output, self.saved_rhs));
        }
        if self.rhs.requires_grad() {
            self.rhs
                .node()
                .accumulate(B::product_grad(*grad_output, self.saved_lhs));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "*"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.lhs.trace(), self.rhs.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.lhs, self.rhs)
    }
}

// =============================================================================
// Div Backward
// =============================================================================

/// Gradient function for division.
///
/// d/dx(x / y) = 1/y, d/dy(x / y) = -x/y^2; broadcast scalars collect the
/// sum of their side.
pub struct DivBackward<A: Tensor, B: Tensor> {
    lhs: Value<A>,
    rhs: Value<B>,
    saved_lhs: A,
    saved_rhs: B,
}

impl<A: Tensor, B: Tensor> DivBackward<A, B> {
    /// Creates a new `DivBackward`, saving both forward values.
    #[must_use]
    pub fn new(lhs: Value<A>, rhs: Value<B>) -> Self {
        let saved_lhs = lhs.value();
        let saved_rhs = rhs.value();
        Self {
            lhs,
            rhs,
            saved_lhs,
            saved_rhs,
        }
    }
}

impl<A, B, S> GradientFunction<S> for DivBackward<A, B>
where
    A: Tensor + BroadcastTo<S>,
    B: Tensor + BroadcastTo<S>,
    S: Tensor + ReduceTo<A> + ReduceTo<B>,
{
    fn apply(&self, grad_output: &S) -> Result<()> {
        let rhs: S = self.saved_rhs.broadcast();
        if self.lhs.requires_grad() {
            let contribution = grad_output.zip_map(rhs, |g, b| g / b);
            self.lhs.node().accumulate(reduce_to(contribution));
        }
        if self.rhs.requires_grad() {
            let lhs: S = self.saved_lhs.broadcast();
            let contribution = grad_output
                .zip_map(lhs, |g, a| g * a)
                .zip_map(rhs, |t, b| -t / (b * b));
            self.rhs.node().accumulate(reduce_to(contribution));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "/"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.lhs.trace(), self.rhs.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.lhs, self.rhs)
    }
}

// =============================================================================
// Neg Backward
// =============================================================================

/// Gradient function for negation.
///
/// d/dx(-x) = -1
pub struct NegBackward<T: Tensor> {
    input: Value<T>,
}

impl<T: Tensor> NegBackward<T> {
    /// Creates a new `NegBackward`.
    #[must_use]
    pub fn new(input: Value<T>) -> Self {
        Self { input }
    }
}

impl<T: Tensor> GradientFunction<T> for NegBackward<T> {
    fn apply(&self, grad_output: &T) -> Result<()> {
        if self.input.requires_grad() {
            self.input.node().accumulate(-*grad_output);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "-"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.input.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{}", self.input)
    }
}

// =============================================================================
// Pow Backward
// =============================================================================

/// Gradient function for an element-wise power with scalar exponent.
///
/// d/dx(x^e) = e * x^(e-1). The derivative with respect to the exponent is
/// not supported; reaching it during backward raises
/// [`Error::UnsupportedDerivative`].
pub struct PowBackward<T: Tensor> {
    base: Value<T>,
    exponent: Value<f32>,
    saved_base: T,
    saved_exponent: f32,
}

impl<T: Tensor> PowBackward<T> {
    /// Creates a new `PowBackward`, saving the base and exponent values.
    #[must_use]
    pub fn new(base: Value<T>, exponent: Value<f32>) -> Self {
        let saved_base = base.value();
        let saved_exponent = exponent.value();
        Self {
            base,
            exponent,
            saved_base,
            saved_exponent,
        }
    }
}

impl<T: Tensor> GradientFunction<T> for PowBackward<T> {
    fn apply(&self, grad_output: &T) -> Result<()> {
        if self.exponent.requires_grad() {
            return Err(Error::unsupported_derivative(
                "gradient with respect to a pow exponent is not supported",
            ));
        }
        if self.base.requires_grad() {
            let e = self.saved_exponent;
            let local = self.saved_base.map(|x| e * x.powf(e - 1.0));
            self.base
                .node()
                .accumulate(grad_output.zip_map(local, |g, l| g * l));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "**"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.base.trace(), self.exponent.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}**{}", self.base, self.exponent)
    }
}

// =============================================================================
// Tests
// =============================================================================
