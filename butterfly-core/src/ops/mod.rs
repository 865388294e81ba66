//! # Operations Module (`ops`)
//!
//! - [`butterfly`]: block multiply kernels and the factor-product evaluator.
//! - [`traits`]: the [`ButterflyScalar`](traits::ButterflyScalar) element trait
//!   the generic kernels are written against.
//!
//! Each operation has a core `xxx_op` function; [`ButterflyOperator`](crate::operator::ButterflyOperator)
//! wraps them for callers holding a fixed factor sequence.

pub mod butterfly;
pub mod traits;
