// src/batch.rs
use std::sync::Arc;

use num_complex::Complex32;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::buffer::{pack_interleaved, unpack_interleaved, Buffer};
use crate::error::ButterflyError;
use crate::ops::traits::ButterflyScalar;
use crate::types::DType;

/// A 2-D batch of vectors with shape `(batch_size, n)`, stored row-major.
///
/// Batches are immutable; the storage is shared through an `Arc` so cloning is
/// cheap. Evaluation always returns a freshly owned batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub(crate) buffer: Arc<Buffer>,
    pub(crate) shape: Vec<usize>,
}

/// Checks that `shape` is `(batch_size, n)` and matches `data_len`.
fn check_batch_shape(data_len: usize, shape: &[usize]) -> Result<(), ButterflyError> {
    if shape.len() != 2 {
        return Err(ButterflyError::shape_mismatch(
            "rank 2 (batch_size, n)",
            shape,
            "Batch creation",
        ));
    }
    let numel: usize = shape.iter().product();
    if numel != data_len {
        return Err(ButterflyError::TensorCreationError {
            data_len,
            shape: shape.to_vec(),
        });
    }
    Ok(())
}

impl Batch {
    /// Creates a real (`F32`) batch from row-major data.
    ///
    /// # Errors
    /// `ShapeMismatch` if `shape` is not 2-D, `TensorCreationError` if
    /// `data.len()` is not `shape[0] * shape[1]`.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, ButterflyError> {
        Self::from_vec(data, shape)
    }

    /// Creates a complex (`C64`) batch from packed complex values.
    pub fn new_c64(data: Vec<Complex32>, shape: Vec<usize>) -> Result<Self, ButterflyError> {
        Self::from_vec(data, shape)
    }

    /// Creates a complex batch from interleaved `(re, im)` pairs.
    ///
    /// `shape` is `(batch_size, n, 2)`; the resulting batch has shape
    /// `(batch_size, n)`.
    pub fn from_interleaved(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, ButterflyError> {
        if shape.len() != 3 || shape[2] != 2 {
            return Err(ButterflyError::shape_mismatch(
                "(batch_size, n, 2)",
                &shape,
                "Batch::from_interleaved",
            ));
        }
        let numel: usize = shape.iter().product();
        if numel != data.len() {
            return Err(ButterflyError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Self::from_vec(pack_interleaved(&data), vec![shape[0], shape[1]])
    }

    /// Creates an `F64` batch. Such batches can be held but not evaluated.
    pub fn new_f64(data: Vec<f64>, shape: Vec<usize>) -> Result<Self, ButterflyError> {
        check_batch_shape(data.len(), &shape)?;
        Ok(Batch {
            buffer: Arc::new(Buffer::F64(Arc::new(data))),
            shape,
        })
    }

    /// Creates an `I64` batch. Such batches can be held but not evaluated.
    pub fn new_i64(data: Vec<i64>, shape: Vec<usize>) -> Result<Self, ButterflyError> {
        check_batch_shape(data.len(), &shape)?;
        Ok(Batch {
            buffer: Arc::new(Buffer::I64(Arc::new(data))),
            shape,
        })
    }

    /// Generic constructor over the evaluable element types.
    pub fn from_vec<T: ButterflyScalar>(
        data: Vec<T>,
        shape: Vec<usize>,
    ) -> Result<Self, ButterflyError> {
        check_batch_shape(data.len(), &shape)?;
        Ok(Batch {
            buffer: Arc::new(T::into_buffer(data)),
            shape,
        })
    }

    /// Creates an `n x n` identity batch: row `i` is the `i`-th basis vector.
    pub fn eye<T: ButterflyScalar>(n: usize) -> Result<Self, ButterflyError> {
        let mut data = vec![T::zero(); n * n];
        for i in 0..n {
            data[i * n + i] = T::one();
        }
        Self::from_vec(data, vec![n, n])
    }

    /// Creates a real batch with standard normal entries.
    pub fn randn<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Result<Self, ButterflyError> {
        let numel = shape.iter().product();
        let data: Vec<f32> = (0..numel).map(|_| StandardNormal.sample(rng)).collect();
        Self::new(data, shape.to_vec())
    }

    /// Creates a complex batch whose real and imaginary parts are standard normal.
    pub fn randn_c64<R: Rng + ?Sized>(
        shape: &[usize],
        rng: &mut R,
    ) -> Result<Self, ButterflyError> {
        let numel = shape.iter().product();
        let data: Vec<Complex32> = (0..numel)
            .map(|_| Complex32::new(StandardNormal.sample(rng), StandardNormal.sample(rng)))
            .collect();
        Self::new_c64(data, shape.to_vec())
    }

    /// Returns a clone of the shape `(batch_size, n)`.
    pub fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    pub fn batch_size(&self) -> usize {
        self.shape[0]
    }

    /// Returns `n`, the length of each row.
    pub fn dim(&self) -> usize {
        self.shape[1]
    }

    /// Returns the total number of elements in the batch.
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    /// Provides immutable access to the underlying storage.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Borrows the elements as `T`, failing if the batch holds another type.
    pub fn data_as<T: ButterflyScalar>(&self) -> Result<&[T], ButterflyError> {
        T::slice_of(&self.buffer)
    }

    /// Returns a copy of the data if the batch is `F32`.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, ButterflyError> {
        Ok(self.buffer.try_get_f32()?.as_ref().clone())
    }

    /// Returns a copy of the data if the batch is `C64`.
    pub fn get_c64_data(&self) -> Result<Vec<Complex32>, ButterflyError> {
        Ok(self.buffer.try_get_c64()?.as_ref().clone())
    }

    /// Exports a complex batch as interleaved `(re, im)` pairs, shape `(batch_size, n, 2)`.
    pub fn to_interleaved(&self) -> Result<Vec<f32>, ButterflyError> {
        Ok(unpack_interleaved(self.buffer.try_get_c64()?))
    }

    /// Returns row `r` as a slice of `T`.
    pub fn row<T: ButterflyScalar>(&self, r: usize) -> Result<&[T], ButterflyError> {
        if r >= self.batch_size() {
            return Err(ButterflyError::shape_mismatch(
                format!("row < {}", self.batch_size()),
                r,
                "Batch::row",
            ));
        }
        let n = self.dim();
        Ok(&self.data_as::<T>()?[r * n..(r + 1) * n])
    }
}
