//! Command-line arguments and the benchmark configuration they produce.
//!
//! Running with no arguments reproduces the default workload: two 8192x8192
//! matrices, five warm-up multiplications and three timed runs.

use clap::{Parser, ValueEnum};

use crate::error::{BenchmarkError, Result};
use crate::tensor::{element_count, ExecutionMode};

pub const DEFAULT_DIMENSION: usize = 8192;
pub const DEFAULT_REPEATS: usize = 3;
pub const DEFAULT_WARMUP: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    /// Side length of the square matrices.
    pub dimension: usize,
    /// Number of timed multiplications averaged into the result.
    pub repeats: usize,
    /// Untimed multiplications run before measuring.
    pub warmup: usize,
    /// Thread count for the CPU engine; `None` uses rayon's default pool.
    pub threads: Option<usize>,
    /// Seed for matrix contents; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Host kernel for the `cpu` device; `None` runs it through candle like
    /// the accelerators.
    pub cpu_mode: Option<ExecutionMode>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            dimension: DEFAULT_DIMENSION,
            repeats: DEFAULT_REPEATS,
            warmup: DEFAULT_WARMUP,
            threads: None,
            seed: None,
            cpu_mode: None,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(BenchmarkError::InvalidConfig("dimension must be positive".to_string()));
        }
        if self.repeats == 0 {
            return Err(BenchmarkError::InvalidConfig("repeats must be positive".to_string()));
        }
        let elements = element_count(&[self.dimension, self.dimension])?;
        if elements.checked_mul(std::mem::size_of::<f32>()).is_none() {
            return Err(BenchmarkError::InvalidConfig(format!(
                "a {0}x{0} matrix does not fit in the address space", self.dimension
            )));
        }
        if self.threads == Some(0) {
            return Err(BenchmarkError::InvalidConfig("threads must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CpuMode {
    /// candle's CPU backend
    Library,
    Sequential,
    Parallel,
    Simd,
    ParallelSimd,
}

impl CpuMode {
    /// The crate's own kernel for this mode, if it is not the library engine.
    pub fn execution_mode(self) -> Option<ExecutionMode> {
        match self {
            CpuMode::Library => None,
            CpuMode::Sequential => Some(ExecutionMode::Sequential),
            CpuMode::Parallel => Some(ExecutionMode::Parallel),
            CpuMode::Simd => Some(ExecutionMode::SIMD),
            CpuMode::ParallelSimd => Some(ExecutionMode::ParallelSIMD),
        }
    }
}

/// Compare CPU and GPU matrix multiplication throughput
#[derive(Parser, Debug)]
#[command(name = "matmul-bench")]
#[command(version)]
pub struct Args {
    /// Side length of the square matrices
    #[arg(short, long, default_value_t = DEFAULT_DIMENSION, value_parser = parse_positive)]
    pub size: usize,

    /// Number of timed runs to average
    #[arg(short, long, default_value_t = DEFAULT_REPEATS, value_parser = parse_positive)]
    pub runs: usize,

    /// Untimed warm-up multiplications before measuring
    #[arg(long, default_value_t = DEFAULT_WARMUP)]
    pub warmup: usize,

    /// Worker threads for the built-in CPU kernels (defaults to one per core)
    #[arg(short, long, value_parser = parse_positive)]
    pub threads: Option<usize>,

    /// Seed for the random matrices
    #[arg(long)]
    pub seed: Option<u64>,

    /// CPU multiplication engine: candle's backend or one of the built-in kernels
    #[arg(long, value_enum, default_value_t = CpuMode::Library)]
    pub cpu_mode: CpuMode,
}

impl Args {
    pub fn benchmark_config(&self) -> BenchmarkConfig {
        BenchmarkConfig {
            dimension: self.size,
            repeats: self.runs,
            warmup: self.warmup,
            threads: self.threads,
            seed: self.seed,
            cpu_mode: self.cpu_mode.execution_mode(),
        }
    }
}

fn parse_positive(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
