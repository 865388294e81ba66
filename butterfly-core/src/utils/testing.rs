use num_complex::Complex32;

use crate::batch::Batch;
use crate::types::DType;

/// Checks that an `F32` batch has the expected shape and data within `tolerance`.
/// Panics if shapes differ or data differs significantly.
pub fn check_batch_near(
    actual: &Batch,
    expected_shape: &[usize],
    expected_data: &[f32],
    tolerance: f32,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data_vec = actual
        .get_f32_data()
        .expect("Failed to get F32 data in check_batch_near");

    assert_eq!(
        actual_data_vec.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data_vec.iter().zip(expected_data.iter()).enumerate() {
        let diff = (*a - *e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Complex counterpart of [`check_batch_near`]; the distance is the complex modulus.
pub fn check_batch_c64_near(
    actual: &Batch,
    expected_shape: &[usize],
    expected_data: &[Complex32],
    tolerance: f32,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data_vec = actual
        .get_c64_data()
        .expect("Failed to get C64 data in check_batch_c64_near");

    assert_eq!(
        actual_data_vec.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data_vec.iter().zip(expected_data.iter()).enumerate() {
        let diff = (*a - *e).norm();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Asserts two batches agree elementwise within `rel_tol * scale`, where
/// `scale` is the largest magnitude anywhere in `expected` (floored at 1).
///
/// The bound is batch-wide, not per element: an entry much smaller than the
/// batch maximum may differ from its expected value by far more than
/// `rel_tol` of itself. This matches the rounding of a sum whose terms are of
/// the batch's magnitude, which is what evaluation paths differ by.
pub fn assert_batches_close(actual: &Batch, expected: &Batch, rel_tol: f32) {
    assert_eq!(actual.shape(), expected.shape(), "Shape mismatch");
    assert_eq!(actual.dtype(), expected.dtype(), "DType mismatch");

    let diffs_and_scale: (Vec<f32>, f32) = match expected.dtype() {
        DType::F32 => {
            let a = actual.get_f32_data().expect("F32 data");
            let e = expected.get_f32_data().expect("F32 data");
            let scale = e.iter().fold(1.0f32, |acc, v| acc.max(v.abs()));
            (a.iter().zip(&e).map(|(x, y)| (x - y).abs()).collect(), scale)
        }
        DType::C64 => {
            let a = actual.get_c64_data().expect("C64 data");
            let e = expected.get_c64_data().expect("C64 data");
            let scale = e.iter().fold(1.0f32, |acc, v| acc.max(v.norm()));
            (a.iter().zip(&e).map(|(x, y)| (x - y).norm()).collect(), scale)
        }
        other => panic!("assert_batches_close: unsupported dtype {:?}", other),
    };

    let (diffs, scale) = diffs_and_scale;
    for (i, diff) in diffs.iter().enumerate() {
        if *diff > rel_tol * scale {
            panic!(
                "Batches differ at index {}: diff={:?}, allowed={:?}",
                i,
                diff,
                rel_tol * scale
            );
        }
    }
}
