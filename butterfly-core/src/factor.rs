// src/factor.rs
use std::sync::Arc;

use num_complex::Complex32;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::buffer::{pack_interleaved, unpack_interleaved, Buffer};
use crate::error::ButterflyError;
use crate::ops::traits::ButterflyScalar;
use crate::types::DType;

/// One butterfly factor: four diagonal blocks `A, B, C, D` of length `m`.
///
/// Stored flat with logical shape `(2, 2, m)`:
/// `A = abcd[0, 0, :]`, `B = abcd[0, 1, :]`, `C = abcd[1, 0, :]`, `D = abcd[1, 1, :]`.
/// The factor acts on blocks of `2 * m` contiguous elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    pub(crate) buffer: Arc<Buffer>,
    pub(crate) m: usize,
}

fn check_factor_shape(data_len: usize, shape: &[usize]) -> Result<usize, ButterflyError> {
    if shape.len() != 3 || shape[0] != 2 || shape[1] != 2 {
        return Err(ButterflyError::shape_mismatch(
            "(2, 2, m)",
            shape,
            "Factor creation",
        ));
    }
    let m = shape[2];
    if m == 0 {
        return Err(ButterflyError::shape_mismatch(
            "m >= 1",
            shape,
            "Factor creation",
        ));
    }
    if data_len != 4 * m {
        return Err(ButterflyError::TensorCreationError {
            data_len,
            shape: shape.to_vec(),
        });
    }
    Ok(m)
}

impl Factor {
    /// Creates a real factor from flat `(2, 2, m)` data.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, ButterflyError> {
        Self::from_vec(data, shape)
    }

    /// Creates a complex factor from packed `(2, 2, m)` data.
    pub fn new_c64(data: Vec<Complex32>, shape: Vec<usize>) -> Result<Self, ButterflyError> {
        Self::from_vec(data, shape)
    }

    /// Creates a complex factor from interleaved `(2, 2, m, 2)` real/imaginary data.
    pub fn from_interleaved(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, ButterflyError> {
        if shape.len() != 4 || shape[3] != 2 {
            return Err(ButterflyError::shape_mismatch(
                "(2, 2, m, 2)",
                &shape,
                "Factor::from_interleaved",
            ));
        }
        let numel: usize = shape.iter().product();
        if numel != data.len() {
            return Err(ButterflyError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Self::new_c64(pack_interleaved(&data), shape[..3].to_vec())
    }

    /// Generic constructor over the evaluable element types.
    pub fn from_vec<T: ButterflyScalar>(
        data: Vec<T>,
        shape: Vec<usize>,
    ) -> Result<Self, ButterflyError> {
        let m = check_factor_shape(data.len(), &shape)?;
        Ok(Factor {
            buffer: Arc::new(T::into_buffer(data)),
            m,
        })
    }

    /// Assembles a factor from its four diagonal blocks.
    pub fn from_blocks<T: ButterflyScalar>(
        a: &[T],
        b: &[T],
        c: &[T],
        d: &[T],
    ) -> Result<Self, ButterflyError> {
        let m = a.len();
        for (name, block) in [("B", b), ("C", c), ("D", d)] {
            if block.len() != m {
                return Err(ButterflyError::shape_mismatch(
                    m,
                    block.len(),
                    format!("Factor::from_blocks (block {})", name),
                ));
            }
        }
        let data: Vec<T> = [a, b, c, d].concat();
        Self::from_vec(data, vec![2, 2, m])
    }

    /// The identity factor: `A = D = 1`, `B = C = 0`.
    pub fn identity<T: ButterflyScalar>(m: usize) -> Result<Self, ButterflyError> {
        let ones = vec![T::one(); m];
        let zeros = vec![T::zero(); m];
        Self::from_blocks(&ones, &zeros, &zeros, &ones)
    }

    /// A real factor with standard normal entries scaled by `scale`.
    pub fn randn<R: Rng + ?Sized>(m: usize, scale: f32, rng: &mut R) -> Result<Self, ButterflyError> {
        let data: Vec<f32> = (0..4 * m)
            .map(|_| {
                let v: f32 = StandardNormal.sample(rng);
                scale * v
            })
            .collect();
        Self::new(data, vec![2, 2, m])
    }

    /// A complex factor whose real and imaginary parts are standard normal, scaled by `scale`.
    pub fn randn_c64<R: Rng + ?Sized>(
        m: usize,
        scale: f32,
        rng: &mut R,
    ) -> Result<Self, ButterflyError> {
        let data: Vec<Complex32> = (0..4 * m)
            .map(|_| {
                let re: f32 = StandardNormal.sample(rng);
                let im: f32 = StandardNormal.sample(rng);
                Complex32::new(scale * re, scale * im)
            })
            .collect();
        Self::new_c64(data, vec![2, 2, m])
    }

    /// Trailing dimension `m` (half the block size this factor acts on).
    pub fn m(&self) -> usize {
        self.m
    }

    /// Returns the logical shape `(2, 2, m)`.
    pub fn shape(&self) -> Vec<usize> {
        vec![2, 2, self.m]
    }

    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    /// Borrows the flat `(2, 2, m)` data as `T`.
    pub fn abcd<T: ButterflyScalar>(&self) -> Result<&[T], ButterflyError> {
        T::slice_of(&self.buffer)
    }

    /// Borrows the four diagonal blocks `(A, B, C, D)`.
    pub fn blocks<T: ButterflyScalar>(&self) -> Result<(&[T], &[T], &[T], &[T]), ButterflyError> {
        let abcd = self.abcd::<T>()?;
        let m = self.m;
        Ok((
            &abcd[..m],
            &abcd[m..2 * m],
            &abcd[2 * m..3 * m],
            &abcd[3 * m..],
        ))
    }

    /// Exports a complex factor as interleaved `(2, 2, m, 2)` data.
    pub fn to_interleaved(&self) -> Result<Vec<f32>, ButterflyError> {
        Ok(unpack_interleaved(self.buffer.try_get_c64()?))
    }
}
