pub mod backend;
pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod probe;
pub mod runner;
pub mod tensor;

pub use error::{BenchmarkError, Result};
pub use runner::Runner;
pub use tensor::Tensor;
