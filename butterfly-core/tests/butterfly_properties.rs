use butterfly_core::utils::testing::assert_batches_close;
use butterfly_core::{
    bp_mul_op, butterfly_mul_op, butterfly_mul_op_with_config, permute_batch_op, Batch,
    ButterflyError, ButterflyOperator, EvalConfig, EvalPath, Factor, Permutation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod common;
use butterfly_core::num_complex::Complex32;
use common::{all_configs, axpby, axpby_c64, init_logger, random_factors, random_factors_c64};

#[test]
fn test_shape_and_dtype_preserved() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(1);
    for n in [2usize, 4, 8, 32, 128] {
        let factors = random_factors(n, 1.0, &mut rng);
        let x = Batch::randn(&[7, n], &mut rng).unwrap();
        for config in all_configs() {
            let y = butterfly_mul_op_with_config(&factors, &x, &config).unwrap();
            assert_eq!(y.shape(), vec![7, n]);
            assert_eq!(y.dtype(), x.dtype());
        }
    }
}

#[test]
fn test_identity_factors_are_identity() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(2);
    let n = 64;
    let factors: Vec<Factor> = (0..6)
        .map(|idx| Factor::identity::<f32>(n >> (idx + 1)).unwrap())
        .collect();
    let x = Batch::randn(&[3, n], &mut rng).unwrap();
    for config in all_configs() {
        let y = butterfly_mul_op_with_config(&factors, &x, &config).unwrap();
        assert_eq!(y, x);
    }
}

#[test]
fn test_linearity() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(3);
    let n = 32;
    let factors = random_factors(n, 0.8, &mut rng);
    let x = Batch::randn(&[4, n], &mut rng).unwrap();
    let y = Batch::randn(&[4, n], &mut rng).unwrap();
    let (a, b) = (1.5f32, -0.25f32);

    let lhs = butterfly_mul_op(&factors, &axpby(a, &x, b, &y)).unwrap();
    let rhs = axpby(
        a,
        &butterfly_mul_op(&factors, &x).unwrap(),
        b,
        &butterfly_mul_op(&factors, &y).unwrap(),
    );
    assert_batches_close(&lhs, &rhs, 1e-4);
}

#[test]
fn test_linearity_complex() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(12);
    let n = 32;
    let factors = random_factors_c64(n, 0.6, &mut rng);
    let x = Batch::randn_c64(&[4, n], &mut rng).unwrap();
    let y = Batch::randn_c64(&[4, n], &mut rng).unwrap();
    let (a, b) = (Complex32::new(0.5, -1.25), Complex32::new(-0.75, 0.3));

    let lhs = butterfly_mul_op(&factors, &axpby_c64(a, &x, b, &y)).unwrap();
    let rhs = axpby_c64(
        a,
        &butterfly_mul_op(&factors, &x).unwrap(),
        b,
        &butterfly_mul_op(&factors, &y).unwrap(),
    );
    assert_batches_close(&lhs, &rhs, 1e-4);
}

#[test]
fn test_rows_are_independent() {
    let mut rng = StdRng::seed_from_u64(4);
    let n = 16;
    let factors = random_factors(n, 1.0, &mut rng);
    let x = Batch::randn(&[5, n], &mut rng).unwrap();
    let y = butterfly_mul_op(&factors, &x).unwrap();
    for r in 0..5 {
        let row = Batch::new(x.row::<f32>(r).unwrap().to_vec(), vec![1, n]).unwrap();
        let single = butterfly_mul_op(&factors, &row).unwrap();
        assert_eq!(single.row::<f32>(0).unwrap(), y.row::<f32>(r).unwrap());
    }
}

#[test]
fn test_paths_agree_real() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(5);
    for n in [2usize, 16, 256] {
        let factors = random_factors(n, 0.7, &mut rng);
        let x = Batch::randn(&[6, n], &mut rng).unwrap();
        let reference = butterfly_mul_op_with_config(
            &factors,
            &x,
            &EvalConfig::new().with_path(EvalPath::Reference),
        )
        .unwrap();
        for config in all_configs() {
            let y = butterfly_mul_op_with_config(&factors, &x, &config).unwrap();
            assert_batches_close(&y, &reference, 1e-5);
        }
    }
}

#[test]
fn test_paths_agree_complex() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(6);
    for n in [4usize, 64] {
        let factors = random_factors_c64(n, 0.7, &mut rng);
        let x = Batch::randn_c64(&[3, n], &mut rng).unwrap();
        let reference = butterfly_mul_op_with_config(
            &factors,
            &x,
            &EvalConfig::new().with_path(EvalPath::Reference),
        )
        .unwrap();
        for config in all_configs() {
            let y = butterfly_mul_op_with_config(&factors, &x, &config).unwrap();
            assert_batches_close(&y, &reference, 1e-5);
        }
    }
}

#[test]
fn test_parallel_threshold_does_not_change_result() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 128;
    let factors = random_factors(n, 1.0, &mut rng);
    let x = Batch::randn(&[16, n], &mut rng).unwrap();
    let serial = butterfly_mul_op(&factors, &x).unwrap();
    let eager = EvalConfig::new().with_parallel_min_blocks(1);
    assert_eq!(butterfly_mul_op_with_config(&factors, &x, &eager).unwrap(), serial);
}

#[test]
fn test_truncated_sequence_acts_on_outer_blocks() {
    // A truncated sequence equals the full one padded with identity inner factors.
    let mut rng = StdRng::seed_from_u64(8);
    let n = 16;
    let outer = vec![
        Factor::randn(8, 1.0, &mut rng).unwrap(),
        Factor::randn(4, 1.0, &mut rng).unwrap(),
    ];
    let mut full = outer.clone();
    full.push(Factor::identity::<f32>(2).unwrap());
    full.push(Factor::identity::<f32>(1).unwrap());

    let x = Batch::randn(&[2, n], &mut rng).unwrap();
    assert_eq!(
        butterfly_mul_op(&outer, &x).unwrap(),
        butterfly_mul_op(&full, &x).unwrap()
    );
}

#[test]
fn test_bp_mul_composes_permutations() {
    let mut rng = StdRng::seed_from_u64(9);
    let n = 8;
    let factors = random_factors(n, 1.0, &mut rng);
    let p = Permutation::new(vec![7, 3, 5, 1, 6, 2, 4, 0]).unwrap();
    let q = Permutation::new(vec![1, 0, 3, 2, 5, 4, 7, 6]).unwrap();
    let x = Batch::randn(&[3, n], &mut rng).unwrap();

    // Permuting by q then p equals a single permutation by q[p[j]].
    let composed = Permutation::new(p.as_slice().iter().map(|&j| q.as_slice()[j]).collect()).unwrap();
    let twice = bp_mul_op(&factors, &p, &permute_batch_op(&x, &q).unwrap()).unwrap();
    let once = bp_mul_op(&factors, &composed, &x).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn test_bit_reversal_with_inverse_round_trip() {
    let n: usize = 16;
    let bits = n.trailing_zeros();
    let indices = (0..n)
        .map(|j: usize| j.reverse_bits() >> (usize::BITS - bits))
        .collect();
    let perm = Permutation::new(indices).unwrap();
    let x = Batch::new((0..2 * n).map(|v| v as f32).collect(), vec![2, n]).unwrap();

    let identity: Vec<Factor> = (0..4)
        .map(|idx| Factor::identity::<f32>(n >> (idx + 1)).unwrap())
        .collect();
    let permuted = bp_mul_op(&identity, &perm, &x).unwrap();
    assert_eq!(permute_batch_op(&permuted, &perm.inverse()).unwrap(), x);
}

#[test]
fn test_operator_matches_free_functions() {
    let mut rng = StdRng::seed_from_u64(10);
    let n = 32;
    let factors = random_factors(n, 1.0, &mut rng);
    let perm = Permutation::new((0..n).rev().collect()).unwrap();
    let x = Batch::randn(&[4, n], &mut rng).unwrap();

    let op = ButterflyOperator::new(factors.clone())
        .unwrap()
        .with_permutation(perm.clone())
        .unwrap();
    assert_eq!(op.apply(&x).unwrap(), bp_mul_op(&factors, &perm, &x).unwrap());
}

#[test]
fn test_errors_leave_no_partial_output() {
    let mut rng = StdRng::seed_from_u64(11);
    let factors = random_factors(4, 1.0, &mut rng);
    let x = Batch::randn(&[2, 8], &mut rng).unwrap();
    let result = butterfly_mul_op(&factors, &x);
    assert!(matches!(result, Err(ButterflyError::ShapeMismatch { .. })));
    let result = bp_mul_op(&factors, &Permutation::identity(8), &x);
    assert!(matches!(result, Err(ButterflyError::ShapeMismatch { .. })));
}
