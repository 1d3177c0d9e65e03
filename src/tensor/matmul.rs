use rayon::prelude::*;

use crate::error::{BenchmarkError, Result};
use crate::tensor::{element_count, try_buffer, Tensor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    Sequential,
    Parallel,
    SIMD,
    #[default]
    ParallelSIMD,
}

impl Tensor {

    fn check_matmul(&self, matrix: &Tensor) -> Result<()> {
        if self.rank() != 2 || matrix.rank() != 2 || self.cols() != matrix.rows() {
            return Err(BenchmarkError::ShapeMismatch {
                left: self.shape.clone(),
                right: matrix.shape.clone(),
            });
        }
        Ok(())
    }

    pub fn mul_seq(&self, matrix: &Tensor) -> Result<Tensor> {
        self.check_matmul(matrix)?;
        let c1 = self.cols();
        let r1 = self.rows();
        let c2 = matrix.cols();

        let mut result = output_buffer(r1, c2)?;

        for i in 0..r1 {
            for k in 0..c1 {
                let a = self.data[i * c1 + k];
                let row = &matrix.data[k * c2..(k + 1) * c2];
                for (out, b) in result[i * c2..(i + 1) * c2].iter_mut().zip(row) {
                    *out += a * b;
                }
            }
        }
        Ok(Tensor::new(result, vec![r1, c2]))
    }

    pub fn mul_par(&self, matrix: &Tensor) -> Result<Tensor> {
        self.check_matmul(matrix)?;
        let c1 = self.cols();
        let r1 = self.rows();
        let c2 = matrix.cols();

        if r1 == 0 || c2 == 0 {
            return Tensor::zeros(vec![r1, c2]);
        }

        let mut result = output_buffer(r1, c2)?;

        // one output row per task
        result.par_chunks_mut(c2).enumerate().for_each(|(i, out_row)| {
            for k in 0..c1 {
                let a = self.data[i * c1 + k];
                let row = &matrix.data[k * c2..(k + 1) * c2];
                for (out, b) in out_row.iter_mut().zip(row) {
                    *out += a * b;
                }
            }
        });

        Ok(Tensor::new(result, vec![r1, c2]))
    }

    pub fn mul_simd(&self, matrix: &Tensor) -> Result<Tensor> {
        self.check_matmul(matrix)?;
        let r1 = self.rows();
        let c1 = self.cols();
        let c2 = matrix.cols();

        let transposed = matrix.transpose()?;
        let mut result = output_buffer(r1, c2)?;

        for i in 0..r1 {
            let a_row = &self.data[i * c1..(i + 1) * c1];
            for k in 0..c2 {
                let b_col = &transposed.data[k * c1..(k + 1) * c1];
                result[i * c2 + k] = dot(a_row, b_col);
            }
        }
        Ok(Tensor::new(result, vec![r1, c2]))
    }

    pub fn mul_simd_parallel(&self, matrix: &Tensor) -> Result<Tensor> {
        self.check_matmul(matrix)?;
        let r1 = self.rows();
        let c1 = self.cols();
        let c2 = matrix.cols();

        if r1 == 0 || c2 == 0 {
            return Tensor::zeros(vec![r1, c2]);
        }

        let transposed = matrix.transpose()?;
        let mut result = output_buffer(r1, c2)?;

        result.par_chunks_mut(c2).enumerate().for_each(|(i, out_row)| {
            let a_row = &self.data[i * c1..(i + 1) * c1];
            for (k, out) in out_row.iter_mut().enumerate() {
                let b_col = &transposed.data[k * c1..(k + 1) * c1];
                *out = dot(a_row, b_col);
            }
        });

        Ok(Tensor::new(result, vec![r1, c2]))
    }

    pub fn mul(&self, matrix: &Tensor, execution_mode: ExecutionMode) -> Result<Tensor> {
        match execution_mode {
            ExecutionMode::Sequential => self.mul_seq(matrix),
            ExecutionMode::Parallel => self.mul_par(matrix),
            ExecutionMode::SIMD => self.mul_simd(matrix),
            ExecutionMode::ParallelSIMD => self.mul_simd_parallel(matrix),
        }
    }

}

fn output_buffer(rows: usize, cols: usize) -> Result<Vec<f32>> {
    let len = element_count(&[rows, cols])?;
    let mut result = try_buffer(len)?;
    result.resize(len, 0.0);
    Ok(result)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx") {
            // SAFETY: the avx feature was detected at runtime
            return unsafe { dot_avx(a, b) };
        }
    }
    dot_scalar(a, b)
}

fn dot_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
unsafe fn dot_avx(a: &[f32], b: &[f32]) -> f32 {
    use std::arch::x86_64::{_mm256_add_ps, _mm256_loadu_ps, _mm256_mul_ps, _mm256_setzero_ps, _mm256_storeu_ps};

    let len = a.len().min(b.len());
    let complete_chunks = len / 8;
    let mut elem = _mm256_setzero_ps();

    for j in 0..complete_chunks {
        let offset = j * 8;
        let a_vec = _mm256_loadu_ps(a.as_ptr().add(offset));
        let b_vec = _mm256_loadu_ps(b.as_ptr().add(offset));
        let prod = _mm256_mul_ps(a_vec, b_vec);
        elem = _mm256_add_ps(prod, elem);
    }

    let mut values = [0.0f32; 8];
    _mm256_storeu_ps(values.as_mut_ptr(), elem);
    let mut total: f32 = values.iter().sum();

    for j in complete_chunks * 8..len {
        total += a[j] * b[j];
    }
    total
}
