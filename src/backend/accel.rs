use candle_core::{Device, Tensor};
use tracing::debug;

use crate::backend::ComputeDevice;
use crate::device::{DeviceKind, DeviceSpec, SyncPolicy};
use crate::error::{BenchmarkError, Result};
use crate::tensor::{element_count, try_buffer};

/// A device driven through `candle-core`. CUDA and Metal need the matching
/// crate feature; without it construction fails with a backend error.
pub struct CandleDevice {
    spec: DeviceSpec,
    device: Device,
}

impl CandleDevice {
    pub fn new(spec: &DeviceSpec, seed: Option<u64>) -> Result<Self> {
        let device = match spec.kind {
            DeviceKind::Cpu => Ok(Device::Cpu),
            DeviceKind::Cuda => Device::new_cuda(spec.ordinal),
            DeviceKind::Metal => Device::new_metal(spec.ordinal),
        }
        .map_err(|e| BenchmarkError::backend(spec.to_string(), e))?;

        // candle only seeds accelerator generators
        if let (Some(seed), true) = (seed, spec.kind.is_accelerator()) {
            device
                .set_seed(seed)
                .map_err(|e| BenchmarkError::backend(spec.to_string(), e))?;
        }

        debug!(device = %spec, "candle device ready");
        Ok(CandleDevice { spec: *spec, device })
    }

    fn wrap(&self, err: candle_core::Error) -> BenchmarkError {
        BenchmarkError::backend(self.spec.to_string(), err)
    }
}

impl ComputeDevice for CandleDevice {
    type Matrix = Tensor;

    fn sync_policy(&self) -> SyncPolicy {
        self.spec.sync_policy()
    }

    fn random_matrix(&mut self, dimension: usize) -> Result<Tensor> {
        if self.spec.kind == DeviceKind::Cpu {
            // candle aborts on host allocation failure; find out first
            let elements = element_count(&[dimension, dimension])?;
            drop(try_buffer(elements)?);
        }
        Tensor::randn(0f32, 1f32, (dimension, dimension), &self.device).map_err(|e| self.wrap(e))
    }

    fn matmul(&mut self, lhs: &Tensor, rhs: &Tensor) -> Result<Tensor> {
        lhs.matmul(rhs).map_err(|e| self.wrap(e))
    }

    fn synchronize(&mut self) -> Result<()> {
        self.device.synchronize().map_err(|e| self.wrap(e))
    }
}
