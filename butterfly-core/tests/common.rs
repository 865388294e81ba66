use butterfly_core::num_complex::Complex32;
use butterfly_core::{Batch, Buffering, EvalConfig, EvalPath, Factor};
use rand::rngs::StdRng;

// Shared by several test crates; not every crate uses every helper.
#[allow(dead_code)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A full factor sequence (`log2(n)` factors) with random real entries.
#[allow(dead_code)]
pub(crate) fn random_factors(n: usize, scale: f32, rng: &mut StdRng) -> Vec<Factor> {
    let k = n.trailing_zeros() as usize;
    (0..k)
        .map(|idx| Factor::randn(n >> (idx + 1), scale, rng).expect("random factor"))
        .collect()
}

/// Complex counterpart of [`random_factors`].
#[allow(dead_code)]
pub(crate) fn random_factors_c64(n: usize, scale: f32, rng: &mut StdRng) -> Vec<Factor> {
    let k = n.trailing_zeros() as usize;
    (0..k)
        .map(|idx| Factor::randn_c64(n >> (idx + 1), scale, rng).expect("random factor"))
        .collect()
}

/// Every path/buffering combination.
#[allow(dead_code)]
pub(crate) fn all_configs() -> Vec<EvalConfig> {
    let mut configs = Vec::new();
    for path in [EvalPath::Reference, EvalPath::Specialized, EvalPath::Generic] {
        for buffering in [Buffering::PingPong, Buffering::InPlace] {
            configs.push(EvalConfig::new().with_path(path).with_buffering(buffering));
        }
    }
    configs
}

/// Elementwise `a * x + b * y` for two real batches of the same shape.
#[allow(dead_code)]
pub(crate) fn axpby(a: f32, x: &Batch, b: f32, y: &Batch) -> Batch {
    let xs = x.get_f32_data().expect("F32 batch");
    let ys = y.get_f32_data().expect("F32 batch");
    let data = xs.iter().zip(&ys).map(|(u, v)| a * u + b * v).collect();
    Batch::new(data, x.shape()).expect("same shape")
}

/// Complex counterpart of [`axpby`].
#[allow(dead_code)]
pub(crate) fn axpby_c64(a: Complex32, x: &Batch, b: Complex32, y: &Batch) -> Batch {
    let xs = x.get_c64_data().expect("C64 batch");
    let ys = y.get_c64_data().expect("C64 batch");
    let data = xs.iter().zip(&ys).map(|(u, v)| a * u + b * v).collect();
    Batch::new_c64(data, x.shape()).expect("same shape")
}
