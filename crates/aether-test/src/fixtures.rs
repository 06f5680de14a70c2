//! Test fixtures for common types.

use std::path::{Path, PathBuf};

use aether_bridge::BridgeConfig;
use aether_core::{DensityQuery, ScenarioWindow};
use tempfile::TempDir;

/// Interpreter used to run stub model scripts.
pub const STUB_INTERPRETER: &str = "sh";

/// A query at 400 km over the equator and prime meridian.
///
/// Converts to the model arguments `1440 400 0 180`.
#[must_use]
pub fn test_query() -> DensityQuery {
    DensityQuery::new("1440", 0.0, 0.0, 400_000.0)
}

/// A two-day scenario window in ISO-YMD format.
#[must_use]
pub fn test_window() -> ScenarioWindow {
    ScenarioWindow::new("2024-05-10T00:00:00", "2024-05-12T00:00:00")
}

/// A bridge config that runs `script` with the stub interpreter.
#[must_use]
pub fn test_bridge_config_for(script: impl Into<PathBuf>) -> BridgeConfig {
    BridgeConfig::new(STUB_INTERPRETER, script)
}

/// A bridge config pointing at a placeholder script.
///
/// Only meaningful with a non-spawning runner.
#[must_use]
pub fn test_bridge_config() -> BridgeConfig {
    test_bridge_config_for("/opt/wam/read_density.py")
}

/// Write a stub model script into `dir` and return its path.
///
/// The script runs under [`STUB_INTERPRETER`] and receives the model's
/// positional arguments as `$1`..`$6`.
///
/// # Panics
///
/// Panics if the file cannot be written.
#[must_use]
pub fn stub_model(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("stub_model.sh");
    std::fs::write(&path, body).unwrap_or_else(|e| panic!("failed to write stub model: {e}"));
    path
}

/// Write a stub model that prints `output` verbatim and exits 0.
#[must_use]
pub fn stub_model_printing(dir: &Path, output: &str) -> PathBuf {
    stub_model(dir, &format!("printf '%s' '{output}'\n"))
}

/// Write a stub model into a fresh temporary directory.
///
/// The directory is deleted when the returned [`TempDir`] drops, so keep
/// it alive for as long as the script is run.
///
/// # Panics
///
/// Panics if the directory or file cannot be created.
#[must_use]
pub fn stub_model_dir(body: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    let path = stub_model(dir.path(), body);
    (dir, path)
}
