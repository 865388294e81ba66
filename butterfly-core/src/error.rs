use crate::types::DType;
use thiserror::Error;

/// Custom error type for butterfly product evaluation.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum ButterflyError {
    #[error("Shape mismatch: expected {expected}, got {actual} during operation {operation}")]
    ShapeMismatch {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("Data type mismatch for operation '{operation}': expected {expected:?}, got {actual:?}")]
    DataTypeMismatch {
        expected: DType,
        actual: DType,
        operation: String,
    },

    #[error("Invalid permutation: indices {indices:?} are not a bijection on 0..{len}")]
    InvalidPermutation { indices: Vec<i64>, len: usize },

    #[error("Unsupported data type {dtype:?} for operation '{operation}'")]
    UnsupportedDataType { dtype: DType, operation: String },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },
}

impl ButterflyError {
    /// Shorthand for a `ShapeMismatch` built from debug-printable shapes.
    pub(crate) fn shape_mismatch(
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
        operation: impl Into<String>,
    ) -> Self {
        ButterflyError::ShapeMismatch {
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
            operation: operation.into(),
        }
    }
}
