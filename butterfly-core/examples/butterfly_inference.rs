// examples/butterfly_inference.rs
//!
//! Evaluates a random butterfly operator on a batch with every evaluation path,
//! times each one, and checks the results against the dense matrix `M` built by
//! `ButterflyOperator::to_dense`. Runs once for a real and once for a complex
//! operator.
//!
//! Run with `RUST_LOG=debug` to see the evaluator's log lines.

use butterfly_core::num_complex::Complex32;
use butterfly_core::{
    Batch, Buffering, ButterflyError, ButterflyOperator, EvalConfig, EvalPath, Factor,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

const N: usize = 1024;
const BATCH_SIZE: usize = 16;

fn configs() -> Vec<EvalConfig> {
    let mut configs = Vec::new();
    for path in [EvalPath::Reference, EvalPath::Specialized, EvalPath::Generic] {
        for buffering in [Buffering::PingPong, Buffering::InPlace] {
            configs.push(EvalConfig::new().with_path(path).with_buffering(buffering));
        }
    }
    configs
}

/// Row-wise `x · Mᵀ`, the dense baseline.
fn dense_apply<T>(dense: &[T], x: &[T], n: usize) -> Vec<T>
where
    T: Copy + num_traits::Zero + std::ops::Mul<Output = T>,
{
    x.chunks(n)
        .flat_map(|row| {
            (0..n).map(move |i| {
                (0..n).fold(T::zero(), |acc, j| acc + dense[i * n + j] * row[j])
            })
        })
        .collect()
}

fn max_abs_diff<T: Copy>(a: &[T], b: &[T], norm: impl Fn(T, T) -> f32) -> f32 {
    a.iter().zip(b).map(|(x, y)| norm(*x, *y)).fold(0.0, f32::max)
}

fn run_real(rng: &mut StdRng) -> Result<(), ButterflyError> {
    let factors = (0..N.trailing_zeros() as usize)
        .map(|idx| Factor::randn(N >> (idx + 1), 0.7, rng))
        .collect::<Result<Vec<_>, _>>()?;
    let op = ButterflyOperator::new(factors)?;
    let x = Batch::randn(&[BATCH_SIZE, N], rng)?;

    let start = Instant::now();
    let dense = op.to_dense()?.get_f32_data()?;
    println!("Real n = {}: dense matrix built in {:?}", N, start.elapsed());

    let x_data = x.get_f32_data()?;
    let start = Instant::now();
    let baseline = dense_apply(&dense, &x_data, N);
    println!("  dense x · Mᵀ: {:?}", start.elapsed());

    for config in configs() {
        let op = op.clone().with_config(config.clone());
        let start = Instant::now();
        let y = op.apply(&x)?;
        let elapsed = start.elapsed();
        let diff = max_abs_diff(&y.get_f32_data()?, &baseline, |a, b| (a - b).abs());
        println!(
            "  {:?} / {:?}: {:?}, max |diff| vs dense = {:.3e}",
            config.path, config.buffering, elapsed, diff
        );
    }
    Ok(())
}

fn run_complex(rng: &mut StdRng) -> Result<(), ButterflyError> {
    let factors = (0..N.trailing_zeros() as usize)
        .map(|idx| Factor::randn_c64(N >> (idx + 1), 0.5, rng))
        .collect::<Result<Vec<_>, _>>()?;
    let op = ButterflyOperator::new(factors)?;
    let x = Batch::randn_c64(&[BATCH_SIZE, N], rng)?;

    let dense = op.to_dense()?.get_c64_data()?;
    let baseline = dense_apply(&dense, &x.get_c64_data()?, N);
    println!("Complex n = {}", N);

    for config in configs() {
        let op = op.clone().with_config(config.clone());
        let start = Instant::now();
        let y = op.apply(&x)?;
        let elapsed = start.elapsed();
        let diff = max_abs_diff(&y.get_c64_data()?, &baseline, |a: Complex32, b| (a - b).norm());
        println!(
            "  {:?} / {:?}: {:?}, max |diff| vs dense = {:.3e}",
            config.path, config.buffering, elapsed, diff
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().try_init();
    println!("Starting butterfly inference example...");

    let mut rng = StdRng::seed_from_u64(0);
    run_real(&mut rng)?;
    run_complex(&mut rng)?;

    println!("Done.");
    Ok(())
}
