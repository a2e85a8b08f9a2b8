//! # Gradix - Reverse-Mode Autodiff over Fixed-Size Tensors
//!
//! Gradix builds a computation graph while you compose expressions out of
//! scalars, fixed-size vectors, and fixed-size matrices, then computes the
//! gradient of any result with respect to every leaf that requires one.
//! Shapes are part of the types, so mismatched operands fail to compile
//! rather than at run time.
//!
//! ## Core Pieces
//!
//! - **Tensors**: [`Vector`] and [`Matrix`] with const-generic shapes,
//!   element-wise arithmetic, scalar broadcasting, and the matrix-vector
//!   product
//! - **Autograd**: the [`Value`] handle records operations and
//!   back-propagates with gradient accumulation over shared
//!   sub-expressions
//! - **Overloads**: every binary operator takes handles or raw values on
//!   either side; raw operands become constant leaves
//! - **NN helpers**: positional encoding and parameter initialisation in
//!   [`nn`]
//!
//! # Quick Start
//!
//! ```
//! use gradix::prelude::*;
//!
//! // A scalar expression.
//! let x = Value::new(-3.0f32);
//! let y = (-&x * 3.0 + 2.0).relu();
//! y.backward().unwrap();
//! assert_eq!(x.grad().unwrap(), -3.0);
//!
//! // A matrix-vector expression; gradients come back in each leaf's shape.
//! let w = Value::new(Matrix::<1, 2>::ones());
//! let x = Vector::new([0.5, 1.5]);
//! let y = (&w * x).sum();
//! y.backward().unwrap();
//! assert_eq!(w.grad().unwrap().row(0).to_vec(), vec![0.5, 1.5]);
//! ```
//!
//! # Training Loop
//!
//! ```
//! use gradix::prelude::*;
//!
//! let w = Value::new(Matrix::<1, 2>::ones());
//! let b = Value::new(0.0f32);
//!
//! for _ in 0..10 {
//!     let x = Vector::new([1.0, 0.0]);
//!     let y_est = (&w * x + &b).relu();
//!     let loss = (&y_est - 1.0).powf(2.0) * 0.5;
//!
//!     loss.backward().unwrap();
//!     w.update(0.1).unwrap();
//!     b.update(0.1).unwrap();
//! }
//! ```
//!
//! @version 0.1.0
//! @author Gradix Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Numerics-specific allowances
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]

// =============================================================================
// Re-exports
// =============================================================================

pub use gradix_autograd::{
    backward, gradcheck, numerical_gradient, GradFn, GradientFunction, Node, ProductGrad,
    TraceNode, Value,
};
pub use gradix_tensor::{
    rand_matrix, rand_vector, randn_matrix, randn_matrix_with, randn_vector, randn_vector_with,
    BroadcastTo, Error, Matrix, ReduceTo, Result, Tensor, Vector,
};

/// Network-building conveniences: positional encoding and initialisation.
pub mod nn {
    pub use gradix_nn::{
        normal_matrix, normal_vector, positional_encoding, zero_scalar, zero_vector,
    };
}

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::nn;
    pub use gradix_autograd::{gradcheck, numerical_gradient, Value};
    pub use gradix_tensor::{Error, Matrix, Result, Tensor, Vector};
}
