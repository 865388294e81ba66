use num_complex::Complex32;
use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Mul};
use std::sync::Arc;

use crate::buffer::Buffer;
use crate::error::ButterflyError;
use crate::types::DType;

/// A trait representing the element types a butterfly product can be evaluated on.
///
/// The generic kernels only need a ring: `Zero`, `One`, addition and
/// multiplication. For complex types `Mul` is the true complex product, so the
/// same kernel text serves both the real and the complex path.
pub trait ButterflyScalar:
    Zero
    + One
    + Add<Output = Self>
    + Mul<Output = Self>
    + PartialEq
    + Debug
    + Copy
    + Send
    + Sync
    + 'static
{
    /// The `DType` tag stored alongside buffers of this element type.
    const DTYPE: DType;

    /// Borrows the elements of `buffer` if it holds this element type.
    fn slice_of(buffer: &Buffer) -> Result<&[Self], ButterflyError>;

    /// Wraps owned elements into a `Buffer`.
    fn into_buffer(data: Vec<Self>) -> Buffer;
}

impl ButterflyScalar for f32 {
    const DTYPE: DType = DType::F32;

    fn slice_of(buffer: &Buffer) -> Result<&[Self], ButterflyError> {
        buffer.try_get_f32().map(|data| data.as_slice())
    }

    fn into_buffer(data: Vec<Self>) -> Buffer {
        Buffer::F32(Arc::new(data))
    }
}

impl ButterflyScalar for Complex32 {
    const DTYPE: DType = DType::C64;

    fn slice_of(buffer: &Buffer) -> Result<&[Self], ButterflyError> {
        buffer.try_get_c64().map(|data| data.as_slice())
    }

    fn into_buffer(data: Vec<Self>) -> Buffer {
        Buffer::C64(Arc::new(data))
    }
}
