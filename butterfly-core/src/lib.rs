//! Forward evaluation of block 2x2 diagonal ("butterfly") factor products.
//!
//! A butterfly operator of dimension `n = 2^k` is the product of `k` factors,
//! each made of four diagonal blocks `A, B, C, D`. Applying it to a batch costs
//! `O(n log n)` per row and never builds the dense `n x n` matrix.
//!
//! ```
//! use butterfly_core::{butterfly_mul_op, Batch, Factor};
//!
//! # fn main() -> Result<(), butterfly_core::ButterflyError> {
//! let swap = Factor::new(vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0], vec![2, 2, 2])?;
//! let x = Batch::new(vec![1.0, 2.0, 3.0, 4.0], vec![1, 4])?;
//! // A full operator for n = 4 has two factors; the inner one here is the identity.
//! let inner = Factor::identity::<f32>(1)?;
//! let y = butterfly_mul_op(&[swap, inner], &x)?;
//! assert_eq!(y.get_f32_data()?, vec![3.0, 4.0, 1.0, 2.0]);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod buffer;
pub mod config;
pub mod error;
pub mod factor;
pub mod operator;
pub mod ops;
pub mod permutation;
pub mod types;
pub mod utils;

pub use batch::Batch;
pub use config::{Buffering, EvalConfig, EvalPath};
pub use error::ButterflyError;
pub use factor::Factor;
pub use operator::ButterflyOperator;
pub use ops::butterfly::{bp_mul_op, bp_mul_op_with_config, butterfly_mul_op, butterfly_mul_op_with_config};
pub use ops::traits::ButterflyScalar;
pub use permutation::{permute_batch_op, Permutation};
pub use types::DType;

// Re-export crates that appear in public signatures
pub use num_complex;
pub use num_traits;

#[cfg(test)]
mod operator_test;
