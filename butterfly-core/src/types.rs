/// Defines the possible element types of factors and batches.
///
/// Only `F32` and `C64` can be evaluated; the remaining kinds exist so that
/// arrays handed over by a caller can be held and rejected with a typed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// Complex value made of two 32-bit floats (real, imaginary).
    C64,
    /// 64-bit floating-point type.
    F64,
    /// 64-bit integer type.
    I64,
}

impl DType {
    /// Returns true for element types the evaluator has kernels for.
    pub fn is_supported(&self) -> bool {
        matches!(self, DType::F32 | DType::C64)
    }

    /// Returns true for complex element types.
    pub fn is_complex(&self) -> bool {
        matches!(self, DType::C64)
    }

    pub fn size_of(&self) -> usize {
        match self {
            DType::F32 => std::mem::size_of::<f32>(),
            DType::C64 => 2 * std::mem::size_of::<f32>(),
            DType::F64 => std::mem::size_of::<f64>(),
            DType::I64 => std::mem::size_of::<i64>(),
        }
    }
}
