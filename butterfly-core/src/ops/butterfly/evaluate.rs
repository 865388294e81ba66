use log::{debug, trace};
use num_complex::Complex32;

use super::block_mult::{
    abcd_mult, abcd_mult_c64, abcd_mult_f32, abcd_mult_inplace, abcd_mult_inplace_c64,
    abcd_mult_inplace_f32,
};
use super::reference::butterfly_mul_reference;
use super::validate::validate_factors;
use crate::batch::Batch;
use crate::config::{Buffering, EvalConfig, EvalPath};
use crate::error::ButterflyError;
use crate::factor::Factor;
use crate::ops::traits::ButterflyScalar;
use crate::permutation::{permute_batch_op, Permutation};
use crate::types::DType;

type PairKernel<T> = fn(&[T], &[T], &mut [T], usize, &EvalConfig) -> Result<(), ButterflyError>;
type InPlaceKernel<T> = fn(&[T], &mut [T], usize, &EvalConfig) -> Result<(), ButterflyError>;

/// Applies `factors` last-to-first to a copy of `data` with the given kernels.
fn apply_factors<T: ButterflyScalar>(
    factors: &[Factor],
    data: &[T],
    config: &EvalConfig,
    pair: PairKernel<T>,
    inplace: InPlaceKernel<T>,
) -> Result<Vec<T>, ButterflyError> {
    let mut output = data.to_vec();
    match config.buffering {
        Buffering::PingPong => {
            let mut scratch = vec![T::zero(); output.len()];
            for (idx, factor) in factors.iter().enumerate().rev() {
                trace!("butterfly_mul: factor {} (m = {}), ping-pong", idx, factor.m());
                pair(factor.abcd::<T>()?, &output, &mut scratch, factor.m(), config)?;
                std::mem::swap(&mut output, &mut scratch);
            }
        }
        Buffering::InPlace => {
            for (idx, factor) in factors.iter().enumerate().rev() {
                trace!("butterfly_mul: factor {} (m = {}), in place", idx, factor.m());
                inplace(factor.abcd::<T>()?, &mut output, factor.m(), config)?;
            }
        }
    }
    Ok(output)
}

/// Evaluates with the generic kernels or the reference path for element type `T`.
fn evaluate_generic<T: ButterflyScalar>(
    factors: &[Factor],
    input: &Batch,
    config: &EvalConfig,
) -> Result<Batch, ButterflyError> {
    let data = input.data_as::<T>()?;
    let output = match config.path {
        EvalPath::Reference => butterfly_mul_reference(factors, data)?,
        _ => apply_factors(factors, data, config, abcd_mult::<T>, abcd_mult_inplace::<T>)?,
    };
    Batch::from_vec(output, input.shape())
}

fn evaluate_specialized(
    factors: &[Factor],
    input: &Batch,
    config: &EvalConfig,
) -> Result<Batch, ButterflyError> {
    match input.dtype() {
        DType::F32 => {
            let data = input.data_as::<f32>()?;
            let output =
                apply_factors(factors, data, config, abcd_mult_f32, abcd_mult_inplace_f32)?;
            Batch::new(output, input.shape())
        }
        DType::C64 => {
            let data = input.data_as::<Complex32>()?;
            let output =
                apply_factors(factors, data, config, abcd_mult_c64, abcd_mult_inplace_c64)?;
            Batch::new_c64(output, input.shape())
        }
        dtype => Err(ButterflyError::UnsupportedDataType {
            dtype,
            operation: "butterfly_mul (specialized)".to_string(),
        }),
    }
}

/// Applies the product of `factors` to every row of `input` with the default config.
///
/// See [`butterfly_mul_op_with_config`].
pub fn butterfly_mul_op(factors: &[Factor], input: &Batch) -> Result<Batch, ButterflyError> {
    butterfly_mul_op_with_config(factors, input, &EvalConfig::default())
}

/// Applies the product of `factors` to every row of `input`.
///
/// `factors` are given outer-to-inner, as produced from a trained model; the
/// last factor is applied first. Each step views the working buffer as
/// `(-1, 2, m)` and mixes the two halves of every block with the factor's
/// `A, B, C, D` diagonals. An empty `factors` slice returns a copy of `input`.
///
/// # Errors
/// - `UnsupportedDataType` if `input` is neither `F32` nor `C64`.
/// - `ShapeMismatch` if `2^factors.len()` does not divide `n` (too many factors
///   for the row length) or if the factor at `idx` does not have trailing
///   dimension `n / 2^(idx + 1)`.
/// - `DataTypeMismatch` if a factor's dtype differs from the batch's.
///
/// All checks run before any arithmetic; the input and the factors are never modified.
pub fn butterfly_mul_op_with_config(
    factors: &[Factor],
    input: &Batch,
    config: &EvalConfig,
) -> Result<Batch, ButterflyError> {
    validate_factors(factors, input, "butterfly_mul")?;
    debug!(
        "butterfly_mul: {} factors on {:?} {:?} ({} bytes), path {:?}, buffering {:?}",
        factors.len(),
        input.dtype(),
        input.shape(),
        input.numel() * input.dtype().size_of(),
        config.path,
        config.buffering
    );

    match (config.path, input.dtype()) {
        (EvalPath::Specialized, _) => evaluate_specialized(factors, input, config),
        (_, DType::F32) => evaluate_generic::<f32>(factors, input, config),
        (_, DType::C64) => evaluate_generic::<Complex32>(factors, input, config),
        (_, dtype) => Err(ButterflyError::UnsupportedDataType {
            dtype,
            operation: "butterfly_mul".to_string(),
        }),
    }
}

/// Permutes the columns of every row of `input`, then applies the product of `factors`.
pub fn bp_mul_op(
    factors: &[Factor],
    perm: &Permutation,
    input: &Batch,
) -> Result<Batch, ButterflyError> {
    bp_mul_op_with_config(factors, perm, input, &EvalConfig::default())
}

/// Config-taking variant of [`bp_mul_op`].
///
/// Factors are validated before the permutation is applied, so a bad factor
/// sequence is reported without any work being done.
pub fn bp_mul_op_with_config(
    factors: &[Factor],
    perm: &Permutation,
    input: &Batch,
    config: &EvalConfig,
) -> Result<Batch, ButterflyError> {
    validate_factors(factors, input, "bp_mul")?;
    let permuted = permute_batch_op(input, perm)?;
    butterfly_mul_op_with_config(factors, &permuted, config)
}
