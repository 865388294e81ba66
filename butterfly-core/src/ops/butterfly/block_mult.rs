//! Single-factor block multiply.
//!
//! A buffer of length `L` is viewed as `(L / 2m, 2, m)` and every block `t`
//! is mixed with the factor's diagonal blocks:
//!
//! ```text
//! out[t, 0, c] = A[c] * in[t, 0, c] + B[c] * in[t, 1, c]
//! out[t, 1, c] = C[c] * in[t, 0, c] + D[c] * in[t, 1, c]
//! ```
//!
//! Blocks are independent, so with the `parallel` feature they are split
//! across rayon workers once a factor has enough of them.

use num_complex::Complex32;

use crate::config::EvalConfig;
use crate::error::ButterflyError;
use crate::ops::traits::ButterflyScalar;

/// Checks the `(2, 2, m)` factor length and that the buffer splits into `2m` blocks.
fn check_block_dims(abcd_len: usize, buf_len: usize, m: usize) -> Result<(), ButterflyError> {
    if m == 0 || abcd_len != 4 * m {
        return Err(ButterflyError::shape_mismatch(
            vec![2, 2, m],
            format!("{} factor elements", abcd_len),
            "abcd_mult (factor)",
        ));
    }
    if buf_len % (2 * m) != 0 {
        return Err(ButterflyError::shape_mismatch(
            format!("(-1, 2, {})", m),
            format!("{} buffer elements", buf_len),
            "abcd_mult (reshape)",
        ));
    }
    Ok(())
}

fn check_pair_dims(
    abcd_len: usize,
    in_len: usize,
    out_len: usize,
    m: usize,
) -> Result<(), ButterflyError> {
    check_block_dims(abcd_len, in_len, m)?;
    if in_len != out_len {
        return Err(ButterflyError::shape_mismatch(
            in_len,
            out_len,
            "abcd_mult (output buffer)",
        ));
    }
    Ok(())
}

/// Runs `f` on matching `block`-sized chunks of `input` and `output`.
#[cfg(feature = "parallel")]
fn for_each_block_pair<T, F>(input: &[T], output: &mut [T], block: usize, parallel: bool, f: F)
where
    T: ButterflyScalar,
    F: Fn(&[T], &mut [T]) + Send + Sync,
{
    use rayon::prelude::*;
    if parallel {
        input
            .par_chunks_exact(block)
            .zip(output.par_chunks_exact_mut(block))
            .for_each(|(src, dst)| f(src, dst));
    } else {
        for (src, dst) in input.chunks_exact(block).zip(output.chunks_exact_mut(block)) {
            f(src, dst);
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn for_each_block_pair<T, F>(input: &[T], output: &mut [T], block: usize, _parallel: bool, f: F)
where
    T: ButterflyScalar,
    F: Fn(&[T], &mut [T]) + Send + Sync,
{
    for (src, dst) in input.chunks_exact(block).zip(output.chunks_exact_mut(block)) {
        f(src, dst);
    }
}

/// Runs `f` on every `block`-sized chunk of `buffer`.
#[cfg(feature = "parallel")]
fn for_each_block<T, F>(buffer: &mut [T], block: usize, parallel: bool, f: F)
where
    T: ButterflyScalar,
    F: Fn(&mut [T]) + Send + Sync,
{
    use rayon::prelude::*;
    if parallel {
        buffer.par_chunks_exact_mut(block).for_each(|blk| f(blk));
    } else {
        buffer.chunks_exact_mut(block).for_each(f);
    }
}

#[cfg(not(feature = "parallel"))]
fn for_each_block<T, F>(buffer: &mut [T], block: usize, _parallel: bool, f: F)
where
    T: ButterflyScalar,
    F: Fn(&mut [T]) + Send + Sync,
{
    buffer.chunks_exact_mut(block).for_each(f);
}

// --- Generic kernels ---

/// Applies one factor from `input` into `output` for any [`ButterflyScalar`].
///
/// # Errors
/// `ShapeMismatch` if `abcd` is not `4 * m` long, if the buffers do not split
/// into `2m` blocks, or if `output` and `input` differ in length.
pub fn abcd_mult<T: ButterflyScalar>(
    abcd: &[T],
    input: &[T],
    output: &mut [T],
    m: usize,
    config: &EvalConfig,
) -> Result<(), ButterflyError> {
    check_pair_dims(abcd.len(), input.len(), output.len(), m)?;
    let parallel = config.parallelize(input.len() / (2 * m));
    for_each_block_pair(input, output, 2 * m, parallel, |src, dst| {
        for c in 0..m {
            let x0 = src[c];
            let x1 = src[m + c];
            dst[c] = abcd[c] * x0 + abcd[m + c] * x1;
            dst[m + c] = abcd[2 * m + c] * x0 + abcd[3 * m + c] * x1;
        }
    });
    Ok(())
}

/// In-place variant of [`abcd_mult`]: both halves of a column are read before
/// either is written.
pub fn abcd_mult_inplace<T: ButterflyScalar>(
    abcd: &[T],
    buffer: &mut [T],
    m: usize,
    config: &EvalConfig,
) -> Result<(), ButterflyError> {
    check_block_dims(abcd.len(), buffer.len(), m)?;
    let parallel = config.parallelize(buffer.len() / (2 * m));
    for_each_block(buffer, 2 * m, parallel, |blk| {
        for c in 0..m {
            let x0 = blk[c];
            let x1 = blk[m + c];
            blk[c] = abcd[c] * x0 + abcd[m + c] * x1;
            blk[m + c] = abcd[2 * m + c] * x0 + abcd[3 * m + c] * x1;
        }
    });
    Ok(())
}

// --- f32 kernels ---

/// `f32` kernel: the factor is split into its four diagonals once and each
/// block is processed as zipped slices.
pub fn abcd_mult_f32(
    abcd: &[f32],
    input: &[f32],
    output: &mut [f32],
    m: usize,
    config: &EvalConfig,
) -> Result<(), ButterflyError> {
    check_pair_dims(abcd.len(), input.len(), output.len(), m)?;
    let (ab, cd) = abcd.split_at(2 * m);
    let (a, b) = ab.split_at(m);
    let (c, d) = cd.split_at(m);
    let parallel = config.parallelize(input.len() / (2 * m));
    for_each_block_pair(input, output, 2 * m, parallel, |src, dst| {
        let (x0, x1) = src.split_at(m);
        let (y0, y1) = dst.split_at_mut(m);
        for i in 0..m {
            y0[i] = a[i] * x0[i] + b[i] * x1[i];
            y1[i] = c[i] * x0[i] + d[i] * x1[i];
        }
    });
    Ok(())
}

pub fn abcd_mult_inplace_f32(
    abcd: &[f32],
    buffer: &mut [f32],
    m: usize,
    config: &EvalConfig,
) -> Result<(), ButterflyError> {
    check_block_dims(abcd.len(), buffer.len(), m)?;
    let (ab, cd) = abcd.split_at(2 * m);
    let (a, b) = ab.split_at(m);
    let (c, d) = cd.split_at(m);
    let parallel = config.parallelize(buffer.len() / (2 * m));
    for_each_block(buffer, 2 * m, parallel, |blk| {
        let (x0, x1) = blk.split_at_mut(m);
        for i in 0..m {
            let (u, v) = (x0[i], x1[i]);
            x0[i] = a[i] * u + b[i] * v;
            x1[i] = c[i] * u + d[i] * v;
        }
    });
    Ok(())
}

// --- complex64 kernels ---

/// `p * x + q * y` on packed complex lanes.
#[inline(always)]
fn cmul_add(p: Complex32, x: Complex32, q: Complex32, y: Complex32) -> Complex32 {
    Complex32::new(
        (p.re * x.re - p.im * x.im) + (q.re * y.re - q.im * y.im),
        (p.re * x.im + p.im * x.re) + (q.re * y.im + q.im * y.re),
    )
}

/// `complex64` kernel with the real and imaginary parts of each product
/// written out explicitly.
pub fn abcd_mult_c64(
    abcd: &[Complex32],
    input: &[Complex32],
    output: &mut [Complex32],
    m: usize,
    config: &EvalConfig,
) -> Result<(), ButterflyError> {
    check_pair_dims(abcd.len(), input.len(), output.len(), m)?;
    let (ab, cd) = abcd.split_at(2 * m);
    let (a, b) = ab.split_at(m);
    let (c, d) = cd.split_at(m);
    let parallel = config.parallelize(input.len() / (2 * m));
    for_each_block_pair(input, output, 2 * m, parallel, |src, dst| {
        let (x0, x1) = src.split_at(m);
        let (y0, y1) = dst.split_at_mut(m);
        for i in 0..m {
            y0[i] = cmul_add(a[i], x0[i], b[i], x1[i]);
            y1[i] = cmul_add(c[i], x0[i], d[i], x1[i]);
        }
    });
    Ok(())
}

pub fn abcd_mult_inplace_c64(
    abcd: &[Complex32],
    buffer: &mut [Complex32],
    m: usize,
    config: &EvalConfig,
) -> Result<(), ButterflyError> {
    check_block_dims(abcd.len(), buffer.len(), m)?;
    let (ab, cd) = abcd.split_at(2 * m);
    let (a, b) = ab.split_at(m);
    let (c, d) = cd.split_at(m);
    let parallel = config.parallelize(buffer.len() / (2 * m));
    for_each_block(buffer, 2 * m, parallel, |blk| {
        let (x0, x1) = blk.split_at_mut(m);
        for i in 0..m {
            let (u, v) = (x0[i], x1[i]);
            x0[i] = cmul_add(a[i], u, b[i], v);
            x1[i] = cmul_add(c[i], u, d[i], v);
        }
    });
    Ok(())
}
