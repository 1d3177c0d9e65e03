//! Device detection and the CPU-versus-accelerator comparison.

use std::io::{self, Write};

use tracing::{info, warn};

use crate::device::{DeviceKind, DeviceSpec};
use crate::probe::EnvironmentProbe;

/// Something that can benchmark a named device. Implemented by
/// [`crate::runner::Runner`].
pub trait Benchmark {
    fn run(&mut self, device: &str, out: &mut dyn Write) -> Option<f64>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accelerator {
    pub kind: DeviceKind,
    /// Identifier handed to the runner.
    pub identifier: &'static str,
    pub name: Option<String>,
}

/// CUDA first, then Metal. At most one accelerator per run.
pub fn detect_accelerator<P: EnvironmentProbe + ?Sized>(probe: &P) -> Option<Accelerator> {
    let (kind, identifier) = if probe.cuda_available() {
        (DeviceKind::Cuda, "cuda")
    } else if probe.metal_available() {
        (DeviceKind::Metal, "mps")
    } else {
        return None;
    };

    let spec = DeviceSpec { kind, ordinal: 0 };
    Some(Accelerator {
        kind,
        identifier,
        name: probe.device_name(&spec),
    })
}

pub fn speedup(cpu_time: f64, gpu_time: f64) -> Option<f64> {
    if gpu_time > 0.0 {
        Some(cpu_time / gpu_time)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub accelerator: Option<Accelerator>,
    pub cpu_time: Option<f64>,
    pub gpu_time: Option<f64>,
    pub speedup: Option<f64>,
}

pub struct Driver<P, B> {
    probe: P,
    bench: B,
}

impl<P: EnvironmentProbe, B: Benchmark> Driver<P, B> {
    pub fn new(probe: P, bench: B) -> Self {
        Driver { probe, bench }
    }

    pub fn bench(&self) -> &B {
        &self.bench
    }

    pub fn run(&mut self, out: &mut dyn Write) -> io::Result<Summary> {
        writeln!(out, "Version: {}", self.probe.library_version())?;

        let accelerator = detect_accelerator(&self.probe);
        match &accelerator {
            Some(accel) => {
                let name = accel.name.as_deref().unwrap_or("name unavailable");
                match accel.kind {
                    DeviceKind::Cuda => writeln!(out, "Detected NVIDIA CUDA GPU: {}", name)?,
                    _ => writeln!(out, "Detected Apple MPS GPU: {}", name)?,
                }
                info!(device = accel.identifier, name, "accelerator detected");
            }
            None => writeln!(out, "No compatible GPU found (CUDA or MPS).")?,
        }

        let mut summary = Summary {
            cpu_time: self.bench.run("cpu", out),
            ..Summary::default()
        };

        let identifier = accelerator.as_ref().map(|accel| accel.identifier);
        let (identifier, cpu_time) = match (identifier, summary.cpu_time) {
            (Some(identifier), Some(cpu_time)) => (identifier, cpu_time),
            _ => {
                writeln!(out, "\nNo GPU available to compare against.")?;
                summary.accelerator = accelerator;
                return Ok(summary);
            }
        };

        summary.gpu_time = self.bench.run(identifier, out);
        summary.speedup = summary.gpu_time.and_then(|gpu_time| speedup(cpu_time, gpu_time));

        match (summary.gpu_time, summary.speedup) {
            (Some(gpu_time), Some(ratio)) => {
                writeln!(out, "\n--- Comparison ---")?;
                writeln!(out, "CPU Time: {:.4}s", cpu_time)?;
                writeln!(out, "GPU Time: {:.4}s", gpu_time)?;
                writeln!(out, "GPU is {:.1}x faster than CPU.", ratio)?;
            }
            _ => {
                warn!(device = identifier, "no usable accelerator timing");
                writeln!(out, "\nGPU benchmark failed; no comparison available.")?;
            }
        }

        summary.accelerator = accelerator;
        Ok(summary)
    }
}
