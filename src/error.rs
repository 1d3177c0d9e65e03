//! Error type for the benchmark.
//!
//! Every failure inside a benchmark invocation ends up here. The runner
//! catches these at its boundary and reports the device as not benchmarked.

use std::fmt::Display;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchmarkError {
    /// The identifier does not name any backend we know about.
    #[error("unknown device identifier '{0}' (expected cpu, cuda[:N], mps[:N] or metal[:N])")]
    UnknownDevice(String),

    /// The numeric backend failed: unavailable device, allocation failure,
    /// kernel error.
    #[error("backend error on {device}: {message}")]
    Backend { device: String, message: String },

    #[error("invalid benchmark configuration: {0}")]
    InvalidConfig(String),

    #[error("shape mismatch: {left:?} x {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchmarkError {
    pub fn backend(device: impl Into<String>, err: impl Display) -> Self {
        BenchmarkError::Backend {
            device: device.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
