use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use matmul_bench::config::Args;
use matmul_bench::driver::Driver;
use matmul_bench::probe::SystemProbe;
use matmul_bench::Runner;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let runner = Runner::new(args.benchmark_config());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut driver = Driver::new(SystemProbe, runner);
    driver.run(&mut out).context("failed to write benchmark report")?;

    Ok(())
}
