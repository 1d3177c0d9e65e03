use rand::SeedableRng;
use rand_pcg::Pcg64;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::backend::ComputeDevice;
use crate::config::BenchmarkConfig;
use crate::device::SyncPolicy;
use crate::error::{BenchmarkError, Result};
use crate::tensor::{ExecutionMode, Tensor};

/// Host device running the crate's own multiplication kernels, selected with
/// `--cpu-mode`.
pub struct CpuDevice {
    mode: ExecutionMode,
    pool: Option<ThreadPool>,
    rng: Pcg64,
}

impl CpuDevice {
    pub fn new(config: &BenchmarkConfig) -> Result<Self> {
        let pool = match config.threads {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| BenchmarkError::backend("cpu", e))?,
            ),
            None => None,
        };

        let rng = match config.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };

        Ok(CpuDevice {
            mode: config.cpu_mode.unwrap_or_default(),
            pool,
            rng,
        })
    }
}

impl ComputeDevice for CpuDevice {
    type Matrix = Tensor;

    fn sync_policy(&self) -> SyncPolicy {
        SyncPolicy::NoSync
    }

    fn random_matrix(&mut self, dimension: usize) -> Result<Tensor> {
        Tensor::randn(vec![dimension, dimension], &mut self.rng)
    }

    fn matmul(&mut self, lhs: &Tensor, rhs: &Tensor) -> Result<Tensor> {
        let mode = self.mode;
        match &self.pool {
            Some(pool) => pool.install(|| lhs.mul(rhs, mode)),
            None => lhs.mul(rhs, mode),
        }
    }

    fn synchronize(&mut self) -> Result<()> {
        Ok(())
    }
}
