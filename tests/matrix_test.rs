use matmul_bench::tensor::{element_count, try_buffer, ExecutionMode};
use matmul_bench::{BenchmarkError, Tensor};
use proptest::prelude::*;

const MODES: [ExecutionMode; 4] = [
    ExecutionMode::Sequential,
    ExecutionMode::Parallel,
    ExecutionMode::SIMD,
    ExecutionMode::ParallelSIMD,
];

// Helper function to compare tensors with floating point tolerance
fn tensors_equal(a: &Tensor, b: &Tensor, tolerance: f32) -> bool {
    if a.shape != b.shape {
        return false;
    }
    a.data.iter()
        .zip(b.data.iter())
        .all(|(x, y)| (x - y).abs() <= tolerance)
}

#[test]
fn test_basic_matrix_multiplication() {
    // Test 2x2 * 2x2 matrix multiplication
    let a = Tensor::new_2d(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    let b = Tensor::new_2d(vec![5.0, 6.0, 7.0, 8.0], 2, 2);

    // Expected result: [[19, 22], [43, 50]]
    let expected = Tensor::new_2d(vec![19.0, 22.0, 43.0, 50.0], 2, 2);

    for mode in MODES {
        let result = a.mul(&b, mode).unwrap();
        assert!(tensors_equal(&result, &expected, 1e-5), "{:?} gave {:?}", mode, result.data);
    }
}

#[test]
fn test_identity_matrix_multiplication() {
    let a = Tensor::new_2d(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    let identity = Tensor::new_2d(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0], 3, 3);

    for mode in MODES {
        let result = a.mul(&identity, mode).unwrap();
        assert!(tensors_equal(&result, &a, 1e-6), "{:?}", mode);
    }
}

#[test]
fn test_zero_matrix_multiplication() {
    let a = Tensor::new_2d(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    let zero = Tensor::zeros(vec![2, 2]).unwrap();

    for mode in MODES {
        let result = a.mul(&zero, mode).unwrap();
        assert!(tensors_equal(&result, &zero, 0.0), "{:?}", mode);
    }
}

#[test]
fn test_rectangular_multiplication() {
    // (2x3) * (3x2) = (2x2)
    let a = Tensor::new_2d(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    let b = Tensor::new_2d(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0], 3, 2);
    let expected = Tensor::new_2d(vec![58.0, 64.0, 139.0, 154.0], 2, 2);

    for mode in MODES {
        let result = a.mul(&b, mode).unwrap();
        assert_eq!(result.dims(), (2, 2));
        assert!(tensors_equal(&result, &expected, 1e-4), "{:?}", mode);
    }
}

#[test]
fn test_dimension_mismatch_is_an_error() {
    let a = Tensor::new_2d(vec![1.0; 6], 2, 3);
    let b = Tensor::new_2d(vec![1.0; 4], 2, 2);

    for mode in MODES {
        match a.mul(&b, mode) {
            Err(BenchmarkError::ShapeMismatch { left, right }) => {
                assert_eq!(left, vec![2, 3]);
                assert_eq!(right, vec![2, 2]);
            }
            other => panic!("{:?}: expected shape mismatch, got {:?}", mode, other),
        }
    }
}

#[test]
fn test_simd_handles_non_multiple_of_eight() {
    // 13 columns exercises the scalar tail of the vector kernel
    let a = Tensor::random(vec![5, 13], 1).unwrap();
    let b = Tensor::random(vec![13, 7], 2).unwrap();

    let expected = a.mul_seq(&b).unwrap();
    assert_eq!(a.mul_simd(&b).unwrap(), expected);
    assert_eq!(a.mul_simd_parallel(&b).unwrap(), expected);
}

#[test]
fn test_random_is_seeded() {
    let a = Tensor::random(vec![16, 16], 42).unwrap();
    let b = Tensor::random(vec![16, 16], 42).unwrap();
    let c = Tensor::random(vec![16, 16], 24).unwrap();

    assert_eq!(a.data, b.data);
    assert_ne!(a.data, c.data);
}

#[test]
fn test_random_is_standard_normal() {
    let t = Tensor::random(vec![200, 200], 7).unwrap();
    let n = t.size() as f32;
    let mean = t.sum() / n;
    let variance = t.data.iter().map(|x| (x - mean) * (x - mean)).sum::<f32>() / n;

    assert!(mean.abs() < 0.05, "mean {}", mean);
    assert!((variance - 1.0).abs() < 0.05, "variance {}", variance);
    assert!(t.data.iter().any(|&x| x < 0.0));
}

#[test]
fn test_transpose() {
    let a = Tensor::new_2d(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    let t = a.transpose().unwrap();
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.data, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

#[test]
fn test_element_count_overflow_is_an_error() {
    assert_eq!(element_count(&[3, 4]).unwrap(), 12);
    assert_eq!(element_count(&[]).unwrap(), 1);

    let huge = 1usize << 33;
    assert!(matches!(element_count(&[huge, huge]), Err(BenchmarkError::InvalidConfig(_))));
    assert!(matches!(Tensor::zeros(vec![huge, huge]), Err(BenchmarkError::InvalidConfig(_))));
    assert!(Tensor::random(vec![huge, huge], 1).is_err());
}

#[test]
fn test_unallocatable_buffer_is_an_error() {
    match try_buffer(usize::MAX / 8) {
        Err(BenchmarkError::Backend { device, .. }) => assert_eq!(device, "cpu"),
        other => panic!("expected allocation failure, got {:?}", other.map(|v| v.len())),
    }

    let side = 1usize << 21;
    assert!(matches!(Tensor::zeros(vec![side, side]), Err(BenchmarkError::Backend { .. })));
}

proptest! {
    #[test]
    fn prop_all_modes_agree(m in 1usize..24, k in 1usize..24, n in 1usize..24, seed in any::<u64>()) {
        let a = Tensor::random(vec![m, k], seed).unwrap();
        let b = Tensor::random(vec![k, n], seed.wrapping_add(1)).unwrap();

        let reference = a.mul_seq(&b).unwrap();
        for mode in MODES {
            prop_assert_eq!(a.mul(&b, mode).unwrap(), reference.clone());
        }
    }
}
