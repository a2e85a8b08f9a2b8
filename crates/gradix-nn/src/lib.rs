//! Gradix NN - Network Conveniences
//!
//! A thin layer over the autodiff engine for building small
//! coordinate-fitting networks: positional encoding of inputs and
//! randomized parameter initialisation. Layers themselves are just
//! expressions; a dense layer is `relu(w * x + b)` written with the
//! engine's operators.
//!
//! # Example
//! ```
//! use gradix_autograd::Value;
//! use gradix_nn::positional_encoding;
//! use gradix_tensor::Vector;
//!
//! let xy = Value::new(Vector::new([0.25, 0.75]));
//! let features = positional_encoding::<4, 2, 16>(&xy).unwrap();
//! assert_eq!(features.value().numel(), 16);
//! ```
//!
//! @version 0.1.0
//! @author Gradix Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Numerics-specific allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

// =============================================================================
// Modules
// =============================================================================

pub mod encoding;
pub mod init;

// =============================================================================
// Re-exports
// =============================================================================

pub use encoding::positional_encoding;
pub use init::{normal_matrix, normal_vector, zero_scalar, zero_vector};
