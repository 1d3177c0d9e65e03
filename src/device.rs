use std::fmt;
use std::str::FromStr;

use crate::error::BenchmarkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Cpu,
    Cuda,
    Metal,
}

/// Whether timing on a device needs an explicit barrier before the clock is
/// read. Accelerators queue work asynchronously, the CPU engine blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    RequiresSync,
    NoSync,
}

impl DeviceKind {
    pub fn sync_policy(self) -> SyncPolicy {
        match self {
            DeviceKind::Cpu => SyncPolicy::NoSync,
            DeviceKind::Cuda | DeviceKind::Metal => SyncPolicy::RequiresSync,
        }
    }

    pub fn is_accelerator(self) -> bool {
        self != DeviceKind::Cpu
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::Cpu => "cpu",
            DeviceKind::Cuda => "cuda",
            DeviceKind::Metal => "metal",
        };
        f.write_str(name)
    }
}

/// A parsed device identifier such as `cpu`, `cuda:1` or `mps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSpec {
    pub kind: DeviceKind,
    pub ordinal: usize,
}

impl DeviceSpec {
    pub fn cpu() -> Self {
        DeviceSpec { kind: DeviceKind::Cpu, ordinal: 0 }
    }

    pub fn sync_policy(&self) -> SyncPolicy {
        self.kind.sync_policy()
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DeviceKind::Cpu => write!(f, "cpu"),
            kind => write!(f, "{}:{}", kind, self.ordinal),
        }
    }
}

impl FromStr for DeviceSpec {
    type Err = BenchmarkError;

    fn from_str(identifier: &str) -> Result<Self, Self::Err> {
        let unknown = || BenchmarkError::UnknownDevice(identifier.to_string());

        let (name, ordinal) = match identifier.split_once(':') {
            Some((name, index)) => (name, index.parse::<usize>().map_err(|_| unknown())?),
            None => (identifier, 0),
        };

        let kind = match name {
            "cpu" => DeviceKind::Cpu,
            "cuda" => DeviceKind::Cuda,
            "mps" | "metal" => DeviceKind::Metal,
            _ => return Err(unknown()),
        };

        // there is only one host device
        if kind == DeviceKind::Cpu && ordinal != 0 {
            return Err(unknown());
        }

        Ok(DeviceSpec { kind, ordinal })
    }
}
