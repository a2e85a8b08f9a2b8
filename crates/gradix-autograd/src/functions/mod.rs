//! Gradient Functions - Backward Rules per Operation
//!
//! One module per operation family, mirroring the forward surface: basic
//! arithmetic, activations, trigonometry, and shape changes. Each gradient
//! function owns handles to its input nodes, which is what keeps the graph
//! alive between the forward construction and the backward pass.
//!
//! @version 0.1.0
//! @author Gradix Development Team

pub mod activation;
pub mod basic;
pub mod shape;
pub mod trig;

pub use activation::{ReluBackward, SigmoidBackward};
pub use basic::{AddBackward, DivBackward, MulBackward, NegBackward, PowBackward, SubBackward};
pub use shape::{ExpandBackward, SumBackward, TileBackward};
pub use trig::{CosBackward, SinBackward};
