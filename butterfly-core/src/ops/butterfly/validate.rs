use crate::batch::Batch;
use crate::error::ButterflyError;
use crate::factor::Factor;

/// Expected trailing dimension of the factor at list position `idx`.
///
/// Factors are applied last-to-first; the factor at `idx` still has `idx + 1`
/// factors (itself included) to go, so it acts on halves of size `n / 2^(idx + 1)`.
pub(crate) fn expected_m(n: usize, idx: usize) -> usize {
    n >> (idx + 1)
}

/// Checks a factor sequence against a batch before any arithmetic happens.
///
/// Checks, in order: the batch element type is evaluable, `k` factors fit in
/// `n` (`2^k` divides `n`, so `k <= log2(n)`), then every factor in processing
/// order (last to first) has the batch's dtype and the expected trailing dim
/// `n / 2^(idx + 1)`. A full operator has `k = log2(n)` and ends at `m = 1`.
/// An empty sequence is valid for any `n`.
pub(crate) fn validate_factors(
    factors: &[Factor],
    input: &Batch,
    operation: &str,
) -> Result<(), ButterflyError> {
    let dtype = input.dtype();
    if !dtype.is_supported() {
        return Err(ButterflyError::UnsupportedDataType {
            dtype,
            operation: operation.to_string(),
        });
    }
    if factors.is_empty() {
        return Ok(());
    }

    let n = input.dim();
    let k = factors.len();
    let covers_n = (k as u32) < usize::BITS && n > 0 && n % (1usize << k) == 0;
    if !covers_n {
        return Err(ButterflyError::ShapeMismatch {
            expected: format!("n divisible by 2^{} for {} factors", k, k),
            actual: format!("n = {}", n),
            operation: format!("{} (factor count)", operation),
        });
    }

    for (idx, factor) in factors.iter().enumerate().rev() {
        if factor.dtype() != dtype {
            return Err(ButterflyError::DataTypeMismatch {
                expected: dtype,
                actual: factor.dtype(),
                operation: format!("{} (factor {})", operation, idx),
            });
        }
        let m = expected_m(n, idx);
        if factor.m() != m {
            return Err(ButterflyError::shape_mismatch(
                vec![2, 2, m],
                factor.shape(),
                format!("{} (factor {})", operation, idx),
            ));
        }
    }
    Ok(())
}
