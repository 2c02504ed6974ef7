//! Canonical locations of the input files.
//!
//! Defaults live under the workspace's `data/` directory and can be
//! overridden with `MM_DATA_PATH` and `MM_COUNTRIES_PATH`.

use std::path::{Path, PathBuf};

/// Environment variable overriding the incident CSV location.
pub const DATA_PATH_ENV: &str = "MM_DATA_PATH";

/// Environment variable overriding the country lookup CSV location.
pub const COUNTRIES_PATH_ENV: &str = "MM_COUNTRIES_PATH";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`; falls back to the
/// current directory when the manifest is not nested as expected.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Incident CSV path: `MM_DATA_PATH` or `data/MM_14_21.csv`.
#[must_use]
pub fn incidents_path() -> PathBuf {
    std::env::var(DATA_PATH_ENV).map_or_else(|_| data_dir().join("MM_14_21.csv"), PathBuf::from)
}

/// Country lookup CSV path: `MM_COUNTRIES_PATH` or `data/countries.csv`.
#[must_use]
pub fn countries_path() -> PathBuf {
    std::env::var(COUNTRIES_PATH_ENV)
        .map_or_else(|_| data_dir().join("countries.csv"), PathBuf::from)
}
