use std::fmt::Debug;
use std::sync::Arc;

use num_complex::Complex32;

use crate::error::ButterflyError;
use crate::types::DType;

/// Typed storage shared by `Batch` and `Factor`.
///
/// The data vectors are wrapped in `Arc` so that cloning a batch or a factor
/// never copies the elements. Storage is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer {
    /// Buffer holding f32 data.
    F32(Arc<Vec<f32>>),
    /// Buffer holding packed complex64 data.
    C64(Arc<Vec<Complex32>>),
    /// Buffer holding f64 data (accepted, never evaluated).
    F64(Arc<Vec<f64>>),
    /// Buffer holding i64 data (accepted, never evaluated).
    I64(Arc<Vec<i64>>),
}

impl Buffer {
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::F32(_) => DType::F32,
            Buffer::C64(_) => DType::C64,
            Buffer::F64(_) => DType::F64,
            Buffer::I64(_) => DType::I64,
        }
    }

    /// Returns the number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Buffer::F32(data) => data.len(),
            Buffer::C64(data) => data.len(),
            Buffer::F64(data) => data.len(),
            Buffer::I64(data) => data.len(),
        }
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f32>>`.
    ///
    /// Returns `DataTypeMismatch` if the buffer holds another element type.
    pub fn try_get_f32(&self) -> Result<&Arc<Vec<f32>>, ButterflyError> {
        match self {
            Buffer::F32(data_arc) => Ok(data_arc),
            other => Err(ButterflyError::DataTypeMismatch {
                expected: DType::F32,
                actual: other.dtype(),
                operation: "try_get_f32".to_string(),
            }),
        }
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<Complex32>>`.
    ///
    /// Returns `DataTypeMismatch` if the buffer holds another element type.
    pub fn try_get_c64(&self) -> Result<&Arc<Vec<Complex32>>, ButterflyError> {
        match self {
            Buffer::C64(data_arc) => Ok(data_arc),
            other => Err(ButterflyError::DataTypeMismatch {
                expected: DType::C64,
                actual: other.dtype(),
                operation: "try_get_c64".to_string(),
            }),
        }
    }
}

/// Packs interleaved `[re, im, re, im, ...]` pairs into complex values.
///
/// The caller guarantees an even length.
pub(crate) fn pack_interleaved(data: &[f32]) -> Vec<Complex32> {
    data.chunks_exact(2)
        .map(|pair| Complex32::new(pair[0], pair[1]))
        .collect()
}

/// Inverse of [`pack_interleaved`].
pub(crate) fn unpack_interleaved(data: &[Complex32]) -> Vec<f32> {
    data.iter().flat_map(|z| [z.re, z.im]).collect()
}
