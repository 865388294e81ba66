// src/ops/butterfly/mod.rs

//! Butterfly product evaluation.
//!
//! - [`block_mult`]: the single-factor primitive (generic, `f32` and `complex64` kernels).
//! - [`evaluate`]: the multi-factor loop and the permuted variant.
//! - `reference`: the unspecialized path used to cross-check the kernels.

pub mod block_mult;
pub mod evaluate;
mod reference;
pub(crate) mod validate;

pub use evaluate::{bp_mul_op, bp_mul_op_with_config, butterfly_mul_op, butterfly_mul_op_with_config};
