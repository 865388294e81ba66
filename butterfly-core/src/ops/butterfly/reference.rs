use crate::error::ButterflyError;
use crate::factor::Factor;
use crate::ops::traits::ButterflyScalar;

/// Reference evaluation: no specialization and no buffer reuse.
///
/// Each step views the data as `(-1, 1, 2, m)`, multiplies it against the
/// `(2, 2, m)` factor and sums over the input-half axis:
/// `out[t, i, c] = sum_j abcd[i, j, c] * in[t, j, c]`.
/// A new buffer is allocated per factor. Factors are consumed last-to-first.
///
/// The caller validates the factor sequence against `data`.
pub(crate) fn butterfly_mul_reference<T: ButterflyScalar>(
    factors: &[Factor],
    data: &[T],
) -> Result<Vec<T>, ButterflyError> {
    let mut output = data.to_vec();
    for factor in factors.iter().rev() {
        let m = factor.m();
        let abcd = factor.abcd::<T>()?;
        let mut next = vec![T::zero(); output.len()];
        for (src, dst) in output.chunks_exact(2 * m).zip(next.chunks_exact_mut(2 * m)) {
            for i in 0..2 {
                for c in 0..m {
                    let mut acc = T::zero();
                    for j in 0..2 {
                        acc = acc + abcd[(2 * i + j) * m + c] * src[j * m + c];
                    }
                    dst[i * m + c] = acc;
                }
            }
        }
        output = next;
    }
    Ok(output)
}
