mod basic_ops;
mod matmul;

pub use matmul::ExecutionMode;

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_pcg::Pcg64;

use crate::error::{BenchmarkError, Result};

/// Number of elements in `shape`, or an error if it does not fit in `usize`.
pub fn element_count(shape: &[usize]) -> Result<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| BenchmarkError::InvalidConfig(format!("shape {:?} is too large to address", shape)))
}

/// Empty host buffer with room for `len` values. Allocation failure is an
/// error, not an abort.
pub fn try_buffer(len: usize) -> Result<Vec<f32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|e| BenchmarkError::backend("cpu", format!("cannot allocate {} f32 values: {}", len, e)))?;
    Ok(data)
}

/// Row-major host matrix used by the CPU engine.
#[derive(Debug, Clone)]
pub struct Tensor {
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
}

impl Tensor {

    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
        let expected_size: usize = shape.iter().product();
        assert_eq!(data.len(), expected_size,
            "Data length {} doesn't match shape {:?} (expected {})",
            data.len(), shape, expected_size);
        Tensor {
            data,
            shape,
        }
    }

    pub fn new_2d(data: Vec<f32>, rows: usize, cols: usize) -> Tensor {
        Self::new(data, vec![rows, cols])
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rows(&self) -> usize {
        if self.shape.len() >= 1 { self.shape[0] } else { 1 }
    }

    pub fn cols(&self) -> usize {
        if self.shape.len() >= 2 { self.shape[1] } else { 1 }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Standard-normal samples drawn from `rng`.
    pub fn randn<R: Rng + ?Sized>(shape: Vec<usize>, rng: &mut R) -> Result<Tensor> {
        let size = element_count(&shape)?;
        let mut data = try_buffer(size)?;
        data.extend((0..size).map(|_| -> f32 { StandardNormal.sample(&mut *rng) }));

        Ok(Tensor::new(data, shape))
    }

    pub fn random(shape: Vec<usize>, seed: u64) -> Result<Tensor> {
        let mut rng = Pcg64::seed_from_u64(seed);
        Self::randn(shape, &mut rng)
    }

    pub fn zeros(shape: Vec<usize>) -> Result<Tensor> {
        let size = element_count(&shape)?;
        let mut data = try_buffer(size)?;
        data.resize(size, 0.0);
        Ok(Tensor::new(data, shape))
    }

    pub fn transpose(&self) -> Result<Tensor> {
        assert_eq!(self.rank(), 2, "Transpose only supported for 2D tensors");
        let rows = self.rows();
        let cols = self.cols();
        let mut data = try_buffer(self.data.len())?;
        data.resize(self.data.len(), 0.0);
        for i in 0..rows {
            for j in 0..cols {
                data[j * rows + i] = self.data[i * cols + j];
            }
        }
        Ok(Tensor::new(data, vec![cols, rows]))
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

}
