//! Activation Gradient Functions
//!
//! Gradient functions for the element-wise non-linearities: `ReLU` and
//! Sigmoid. Both act component-wise on every shape family.
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
// ReLU Backward
// =============================================================================

/// Gradient function for `ReLU`.
///
/// d/dx(relu(x)) = 1 if x > 0, else 0. The gate reads the saved *input*,
/// not the output, so the boundary case x = 0 blocks the gradient.
pub struct ReluBackward<T: Tensor> {
    input: Value<T>,
    saved_input: T,
}

impl<T: Tensor> ReluBackward<T> {
    /// Creates a new `ReluBackward`, saving the forward input.
    #[must_use]
    pub fn new(input: Value<T>) -> Self {
        let saved_input = input.value();
        Self { input, saved_input }
    }
}

impl<T: Tensor> GradientFunction<T> for ReluBackward<T> {
    fn apply(&self, grad_output: &T) -> Result<()> {
        if self.input.requires_grad() {
            let contribution = grad_output.zip_map(self.saved_input, |g, x| {
                if x > 0.0 {
                    g
                } else {
                    0.0
                }
            });
            self.input.node().accumulate(contribution);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "relu"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.input.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relu({})", self.input)
    }
}

// =============================================================================
// Sigmoid Backward
// =============================================================================

/// Gradient function for Sigmoid.
///
/// With s = sigmoid(x): d/dx = s * (1 - s); the rule only needs the saved
/// *output*.
pub struct SigmoidBackward<T: Tensor> {
    input: Value<T>,
    saved_output: T,
}

impl<T: Tensor> SigmoidBackward<T> {
    /// Creates a new `SigmoidBackward` from the forward output.
    #[must_use]
    pub fn new(input: Value<T>, output: T) -> Self {
        Self {
            input,
            saved_output: output,
        }
    }
}

impl<T: Tensor> GradientFunction<T> for SigmoidBackward<T> {
    fn apply(&self, grad_output: &T) -> Result<()> {
        if self.input.requires_grad() {
            let contribution = grad_output.zip_map(self.saved_output, |g, s| g * s * (1.0 - s));
            self.input.node().accumulate(contribution);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sigmoid"
    }

    fn inputs(&self) -> Vec<Arc<dyn TraceNode>> {
        vec![self.input.trace()]
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sigmoid({})", self.input)
    }
}

// =============================================================================
// Tests
// =============================================================================
