//! Benchmark runner: warm up, time repeated multiplications, average.

use std::fmt;
use std::hint::black_box;
use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::backend::{CandleDevice, ComputeDevice, CpuDevice};
use crate::config::BenchmarkConfig;
use crate::device::{DeviceKind, DeviceSpec, SyncPolicy};
use crate::driver::Benchmark;
use crate::error::Result;
use crate::tensor::ExecutionMode;

/// Source of monotonic timestamps.
pub trait Clock {
    /// Time elapsed since some fixed origin.
    fn now(&mut self) -> Duration;
}

pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

fn barrier<D: ComputeDevice>(device: &mut D) -> Result<()> {
    match device.sync_policy() {
        SyncPolicy::RequiresSync => device.synchronize(),
        SyncPolicy::NoSync => Ok(()),
    }
}

/// Time `config.repeats` multiplications on `device` and return the mean in
/// seconds. Warm-up runs happen before the clock is first read.
pub fn measure<D, C>(
    device: &mut D,
    clock: &mut C,
    config: &BenchmarkConfig,
    out: &mut dyn Write,
) -> Result<f64>
where
    D: ComputeDevice,
    C: Clock,
{
    config.validate()?;

    let a = device.random_matrix(config.dimension)?;
    let b = device.random_matrix(config.dimension)?;

    writeln!(out, "Warming up...")?;
    for _ in 0..config.warmup {
        black_box(device.matmul(&a, &b)?);
    }
    barrier(device)?;

    writeln!(out, "Running benchmark ({} runs)...", config.repeats)?;
    let mut times = Vec::with_capacity(config.repeats);
    for run in 0..config.repeats {
        let start = clock.now();
        black_box(device.matmul(&a, &b)?);
        barrier(device)?;
        let end = clock.now();

        let elapsed = end.saturating_sub(start).as_secs_f64();
        debug!(run, elapsed, "timed run");
        times.push(elapsed);
    }

    // repeats > 0 was validated above
    let avg_time = mean(&times).unwrap_or_default();
    writeln!(out, "Average time over {} runs: {:.4} seconds", config.repeats, avg_time)?;
    Ok(avg_time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// candle-core
    Library,
    /// The crate's own host kernels.
    Native(ExecutionMode),
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Library => write!(f, "candle-core"),
            Engine::Native(mode) => write!(f, "built-in {:?}", mode),
        }
    }
}

/// Runs the benchmark against named devices with one shared configuration.
pub struct Runner {
    config: BenchmarkConfig,
}

impl Runner {
    pub fn new(config: BenchmarkConfig) -> Self {
        Runner { config }
    }

    /// Which engine multiplies on `spec`. Everything goes through candle
    /// unless a built-in CPU kernel was asked for.
    pub fn engine(&self, spec: &DeviceSpec) -> Engine {
        match (spec.kind, self.config.cpu_mode) {
            (DeviceKind::Cpu, Some(mode)) => Engine::Native(mode),
            _ => Engine::Library,
        }
    }

    pub fn try_run(&self, identifier: &str, out: &mut dyn Write) -> Result<f64> {
        let spec: DeviceSpec = identifier.parse()?;

        writeln!(out, "\n--- Benchmarking on: {} ---", identifier)?;
        writeln!(out, "Matrix size: {}x{}", self.config.dimension, self.config.dimension)?;
        info!(
            device = identifier,
            dimension = self.config.dimension,
            repeats = self.config.repeats,
            "starting benchmark"
        );

        let engine = self.engine(&spec);
        writeln!(out, "Engine: {}", engine)?;

        let mut clock = MonotonicClock::new();
        match engine {
            Engine::Native(_) => {
                let mut device = CpuDevice::new(&self.config)?;
                measure(&mut device, &mut clock, &self.config, out)
            }
            Engine::Library => {
                let mut device = CandleDevice::new(&spec, self.config.seed)?;
                measure(&mut device, &mut clock, &self.config, out)
            }
        }
    }

    /// Benchmark one device. Failures are reported on `out` and logged,
    /// never propagated.
    pub fn run(&self, identifier: &str, out: &mut dyn Write) -> Option<f64> {
        match self.try_run(identifier, out) {
            Ok(avg_time) => {
                info!(device = identifier, avg_time, "benchmark finished");
                Some(avg_time)
            }
            Err(e) => {
                error!(device = identifier, error = %e, "benchmark failed");
                // the report stream itself may be what failed
                let _ = writeln!(out, "An error occurred on device {}: {}", identifier, e);
                None
            }
        }
    }
}

impl Benchmark for Runner {
    fn run(&mut self, device: &str, out: &mut dyn Write) -> Option<f64> {
        Runner::run(self, device, out)
    }
}
