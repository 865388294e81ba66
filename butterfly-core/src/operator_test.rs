use crate::batch::Batch;
use crate::config::{Buffering, EvalConfig, EvalPath};
use crate::error::ButterflyError;
use crate::factor::Factor;
use crate::operator::ButterflyOperator;
use crate::permutation::Permutation;
use crate::types::DType;
use crate::utils::testing::{assert_batches_close, check_batch_near};
use num_complex::Complex32;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_operator(n: usize, rng: &mut StdRng) -> ButterflyOperator {
    let k = n.trailing_zeros() as usize;
    let factors = (0..k)
        .map(|idx| Factor::randn(n >> (idx + 1), 1.0, rng).unwrap())
        .collect();
    ButterflyOperator::new(factors).unwrap()
}

/// Row-wise `x · Mᵀ` for a dense real `M`.
fn dense_apply(dense: &Batch, x: &Batch) -> Vec<f32> {
    let n = dense.dim();
    let m = dense.get_f32_data().unwrap();
    let x = x.get_f32_data().unwrap();
    x.chunks(n)
        .flat_map(|row| {
            (0..n)
                .map(|i| (0..n).map(|j| m[i * n + j] * row[j]).sum::<f32>())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_new_sets_dim_and_dtype() {
    let op = ButterflyOperator::new(vec![
        Factor::identity::<Complex32>(4).unwrap(),
        Factor::identity::<Complex32>(2).unwrap(),
        Factor::identity::<Complex32>(1).unwrap(),
    ])
    .unwrap();
    assert_eq!(op.dim(), 8);
    assert_eq!(op.dtype(), DType::C64);
    assert_eq!(op.num_factors(), 3);
    assert!(op.permutation().is_none());
    assert_eq!(op.config(), &EvalConfig::default());
}

#[test]
fn test_new_rejects_empty() {
    assert!(matches!(
        ButterflyOperator::new(Vec::new()),
        Err(ButterflyError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_new_rejects_non_halving_factors() {
    let result = ButterflyOperator::new(vec![
        Factor::identity::<f32>(4).unwrap(),
        Factor::identity::<f32>(4).unwrap(),
    ]);
    match result.unwrap_err() {
        ButterflyError::ShapeMismatch { operation, .. } => {
            assert_eq!(operation, "ButterflyOperator::new (factor 1)");
        }
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_new_rejects_mixed_dtypes() {
    let result = ButterflyOperator::new(vec![
        Factor::identity::<f32>(2).unwrap(),
        Factor::identity::<Complex32>(1).unwrap(),
    ]);
    assert!(matches!(
        result,
        Err(ButterflyError::DataTypeMismatch { expected: DType::F32, actual: DType::C64, .. })
    ));
}

#[test]
fn test_with_permutation_length_check() {
    let op = ButterflyOperator::new(vec![Factor::identity::<f32>(2).unwrap()]).unwrap();
    assert!(matches!(
        op.with_permutation(Permutation::identity(3)),
        Err(ButterflyError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_swap_to_dense() {
    let swap = Factor::from_blocks(&[0.0f32, 0.0], &[1.0, 1.0], &[1.0, 1.0], &[0.0, 0.0]).unwrap();
    let op = ButterflyOperator::new(vec![swap]).unwrap();
    let dense = op.to_dense().unwrap();
    #[rustfmt::skip]
    let expected = [
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
    ];
    check_batch_near(&dense, &[4, 4], &expected, 0.0);
}

#[test]
fn test_apply_matches_dense() {
    let mut rng = StdRng::seed_from_u64(21);
    let op = random_operator(8, &mut rng);
    let x = Batch::randn(&[5, 8], &mut rng).unwrap();
    let y = op.apply(&x).unwrap();
    let expected = Batch::new(dense_apply(&op.to_dense().unwrap(), &x), vec![5, 8]).unwrap();
    assert_batches_close(&y, &expected, 1e-5);
}

#[test]
fn test_apply_with_permutation_matches_dense() {
    let mut rng = StdRng::seed_from_u64(22);
    let perm = Permutation::new(vec![0, 4, 2, 6, 1, 5, 3, 7]).unwrap();
    let op = random_operator(8, &mut rng).with_permutation(perm).unwrap();
    assert!(op.permutation().is_some());

    let x = Batch::randn(&[3, 8], &mut rng).unwrap();
    let y = op.apply(&x).unwrap();
    let expected = Batch::new(dense_apply(&op.to_dense().unwrap(), &x), vec![3, 8]).unwrap();
    assert_batches_close(&y, &expected, 1e-5);
}

#[test]
fn test_config_does_not_change_result() {
    let mut rng = StdRng::seed_from_u64(23);
    let op = random_operator(16, &mut rng);
    let x = Batch::randn(&[2, 16], &mut rng).unwrap();
    let baseline = op.apply(&x).unwrap();

    let op = op.with_config(
        EvalConfig::new()
            .with_path(EvalPath::Generic)
            .with_buffering(Buffering::InPlace),
    );
    assert_eq!(op.config().path, EvalPath::Generic);
    assert_batches_close(&op.apply(&x).unwrap(), &baseline, 1e-5);
}

#[test]
fn test_apply_rejects_wrong_width() {
    let op = ButterflyOperator::new(vec![
        Factor::identity::<f32>(2).unwrap(),
        Factor::identity::<f32>(1).unwrap(),
    ])
    .unwrap();
    let x = Batch::new(vec![0.0; 8], vec![1, 8]).unwrap();
    assert!(matches!(op.apply(&x), Err(ButterflyError::ShapeMismatch { .. })));
}

#[test]
fn test_complex_to_dense_identity() {
    let op = ButterflyOperator::new(vec![Factor::identity::<Complex32>(1).unwrap()]).unwrap();
    let dense = op.to_dense().unwrap();
    assert_eq!(dense, Batch::eye::<Complex32>(2).unwrap());
}
