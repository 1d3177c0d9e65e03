use candle_core::Device;

use crate::device::{DeviceKind, DeviceSpec};

/// candle-core release this binary was built against, read from the lock file
/// at build time.
pub const CANDLE_VERSION: &str = env!("CANDLE_CORE_VERSION");

/// What the driver needs to know about the host before benchmarking.
pub trait EnvironmentProbe {
    fn library_version(&self) -> String;

    fn cuda_available(&self) -> bool;

    fn metal_available(&self) -> bool;

    /// Human-readable name of an accelerator, if it can be opened.
    fn device_name(&self, spec: &DeviceSpec) -> Option<String>;
}

/// Probe that asks `candle-core` about the machine it is running on.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl EnvironmentProbe for SystemProbe {
    fn library_version(&self) -> String {
        let mut backends = vec!["cpu"];
        if cfg!(feature = "cuda") {
            backends.push("cuda");
        }
        if cfg!(feature = "metal") {
            backends.push("metal");
        }
        format!("candle-core {} (backends: {})", CANDLE_VERSION, backends.join(", "))
    }

    // A backend being compiled in says nothing about the hardware, so both
    // checks open device 0.
    fn cuda_available(&self) -> bool {
        Device::new_cuda(0).is_ok()
    }

    fn metal_available(&self) -> bool {
        Device::new_metal(0).is_ok()
    }

    fn device_name(&self, spec: &DeviceSpec) -> Option<String> {
        let opened = match spec.kind {
            DeviceKind::Cpu => return Some("host CPU".to_string()),
            DeviceKind::Cuda => Device::new_cuda(spec.ordinal),
            DeviceKind::Metal => Device::new_metal(spec.ordinal),
        };
        match opened {
            Ok(device) => adapter_name(&device),
            Err(e) => {
                tracing::warn!(device = %spec, error = %e, "could not open device for name lookup");
                None
            }
        }
    }
}

fn adapter_name(device: &Device) -> Option<String> {
    match device {
        #[cfg(feature = "cuda")]
        Device::Cuda(cuda) => match cuda.cuda_device().name() {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!(error = %e, "driver did not report a device name");
                None
            }
        },
        #[cfg(feature = "metal")]
        Device::Metal(metal) => Some(metal.device().name().to_string()),
        _ => None,
    }
}
