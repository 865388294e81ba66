// src/permutation.rs
use log::trace;

use crate::batch::Batch;
use crate::error::ButterflyError;
use crate::ops::traits::ButterflyScalar;
use crate::types::DType;

/// A validated bijection on `0..n`, applied to the columns of every batch row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    indices: Vec<usize>,
}

/// Validates that `indices` is a bijection on `0..indices.len()`.
pub(crate) fn validate_permutation(indices: &[usize]) -> Result<(), ButterflyError> {
    let len = indices.len();
    let mut seen = vec![false; len];
    for &idx in indices {
        if idx >= len || seen[idx] {
            return Err(ButterflyError::InvalidPermutation {
                indices: indices.iter().map(|&i| i as i64).collect(),
                len,
            });
        }
        seen[idx] = true;
    }
    Ok(())
}

impl Permutation {
    /// Creates a permutation, failing with `InvalidPermutation` on duplicate
    /// or out-of-range indices.
    pub fn new(indices: Vec<usize>) -> Result<Self, ButterflyError> {
        validate_permutation(&indices)?;
        Ok(Permutation { indices })
    }

    /// Creates a permutation from signed indices, as produced by numeric array exporters.
    pub fn try_from_i64(indices: &[i64]) -> Result<Self, ButterflyError> {
        if indices.iter().any(|&i| i < 0) {
            return Err(ButterflyError::InvalidPermutation {
                indices: indices.to_vec(),
                len: indices.len(),
            });
        }
        Self::new(indices.iter().map(|&i| i as usize).collect())
    }

    pub fn identity(n: usize) -> Self {
        Permutation {
            indices: (0..n).collect(),
        }
    }

    /// Returns the permutation `q` with `q[p[j]] = j`.
    pub fn inverse(&self) -> Self {
        let mut inverse = vec![0; self.indices.len()];
        for (j, &p) in self.indices.iter().enumerate() {
            inverse[p] = j;
        }
        Permutation { indices: inverse }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

fn permute_rows<T: ButterflyScalar>(input: &Batch, perm: &[usize]) -> Result<Batch, ButterflyError> {
    let n = input.dim();
    let data = input.data_as::<T>()?;
    if n == 0 {
        return Batch::from_vec(data.to_vec(), input.shape());
    }
    let mut output = Vec::with_capacity(data.len());
    for row in data.chunks_exact(n) {
        output.extend(perm.iter().map(|&p| row[p]));
    }
    Batch::from_vec(output, input.shape())
}

/// Gathers the columns of every row: `out[r, j] = input[r, perm[j]]`.
///
/// # Errors
/// `ShapeMismatch` if `perm.len() != n`, `UnsupportedDataType` for batches
/// that are neither `F32` nor `C64`.
pub fn permute_batch_op(input: &Batch, perm: &Permutation) -> Result<Batch, ButterflyError> {
    let n = input.dim();
    if perm.len() != n {
        return Err(ButterflyError::shape_mismatch(
            n,
            perm.len(),
            "permute_batch_op (permutation length)",
        ));
    }
    trace!("permute_batch_op: permuting {} rows of length {}", input.batch_size(), n);
    match input.dtype() {
        DType::F32 => permute_rows::<f32>(input, perm.as_slice()),
        DType::C64 => permute_rows::<num_complex::Complex32>(input, perm.as_slice()),
        dtype => Err(ButterflyError::UnsupportedDataType {
            dtype,
            operation: "permute_batch_op".to_string(),
        }),
    }
}
