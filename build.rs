use std::env;
use std::fs;
use std::path::PathBuf;

// Embeds the resolved candle-core version so the binary can report which
// numeric library it was built against.
fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let lock_file = manifest_dir.join("Cargo.lock");
    println!("cargo:rerun-if-changed={}", lock_file.display());
    println!("cargo:rerun-if-changed=Cargo.toml");

    let version = fs::read_to_string(&lock_file)
        .ok()
        .and_then(|lock| locked_version(&lock, "candle-core"))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=CANDLE_CORE_VERSION={}", version);
}

fn locked_version(lock: &str, package: &str) -> Option<String> {
    let wanted = format!("name = \"{}\"", package);
    let mut lines = lock.lines().map(str::trim);
    while let Some(line) = lines.next() {
        if line != wanted {
            continue;
        }
        let version = lines.next()?.strip_prefix("version = \"")?;
        return version.strip_suffix('"').map(str::to_string);
    }
    None
}
