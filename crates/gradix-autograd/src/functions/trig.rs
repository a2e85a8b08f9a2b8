//! Trigonometric Gradient Functions
//!
//! Gradient functions for element-wise sine and cosine.
//!
//! @version 0.1.0
//! @author Gradix Development Team

use core::fmt;
use std::sync::Arc;

use gradix_tensor::{Result, Tensor};

use crate::grad_fn::GradientFunction;
use crate::node::TraceNode;
use crate::value::Value;

// =============================================================================
// Sin Backward
// =============================================================================

/// Gradient function for sine.
///
/// d/dx(sin(x)) = cos(x)
pub struct SinBackward<T: Tensor> {
    input: Value<T>,
    saved_input: T,
}

impl<T: Tensor> SinBackward<T> {
    /// Creates a new `SinBackward`, saving the forward input.
    #[must_use]
    pub fn new(input: Value<T>) -> Self {
        let saved_input = input.value();
        Self { input, saved_input }
    }
}

impl<T: Tensor> GradientFunction<T> for SinBackward<T> {
    fn apply(&self, grad_output: &T) -> Result<()> {
        if self.input.requires_grad() {
            let contribution = grad_output.zip_map(self.saved_input, |g, x| g * x.cos());
            self.input.node().accumulate(contribution);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sin"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.input.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sin({})", self.input)
    }
}

// =============================================================================
// Cos Backward
// =============================================================================

/// Gradient function for cosine.
///
/// d/dx(cos(x)) = -sin(x)
pub struct CosBackward<T: Tensor> {
    input: Value<T>,
    saved_input: T,
}

impl<T: Tensor> CosBackward<T> {
    /// Creates a new `CosBackward`, saving the forward input.
    #[must_use]
    pub fn new(input: Value<T>) -> Self {
        let saved_input = input.value();
        Self { input, saved_input }
    }
}

impl<T: Tensor> GradientFunction<T> for CosBackward<T> {
    fn apply(&self, grad_output: &T) -> Result<()> {
        if self.input.requires_grad() {
            let contribution = grad_output.zip_map(self.saved_input, |g, x| -g * x.sin());
            self.input.node().accumulate(contribution);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "cos"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.input.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cos({})", self.input)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sin_backward() {
        let input = Value::new(1.0f32);
        let grad_fn = SinBackward::new(input.clone());

        grad_fn.apply(&1.0).unwrap();

        let grad = input.node().grad.read().unwrap();
        assert!((grad - 1.0f32.cos()).abs() < 1e-6);
    }

    #[test]
    fn test_cos_backward() {
        let input = Value::new(1.0f32);
        let grad_fn = CosBackward::new(input.clone());

        grad_fn.apply(&1.0).unwrap();

        let grad = input.node().grad.read().unwrap();
        assert!((grad + 1.0f32.sin()).abs() < 1e-6);
    }
}
