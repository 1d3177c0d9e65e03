//! Compute devices the runner can time.
//!
//! A [`ComputeDevice`] is the small slice of a numeric library the benchmark
//! needs: random allocation, multiplication and a synchronization barrier.
//! The host engine in [`crate::tensor`] backs [`CpuDevice`]; CUDA and Metal
//! go through `candle-core` in [`CandleDevice`].

mod accel;
mod cpu;

pub use accel::CandleDevice;
pub use cpu::CpuDevice;

use crate::device::SyncPolicy;
use crate::error::Result;

pub trait ComputeDevice {
    type Matrix;

    fn sync_policy(&self) -> SyncPolicy;

    /// Allocate a `dimension x dimension` matrix of standard-normal values
    /// on this device.
    fn random_matrix(&mut self, dimension: usize) -> Result<Self::Matrix>;

    fn matmul(&mut self, lhs: &Self::Matrix, rhs: &Self::Matrix) -> Result<Self::Matrix>;

    /// Block until all queued work on the device has completed.
    fn synchronize(&mut self) -> Result<()>;
}
