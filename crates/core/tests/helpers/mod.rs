//! Shared fixtures for integration tests.
//!
//! Header fixtures live in `tests/fixtures/headers`; tests either read one
//! directly or copy the whole set into a temp dir before scanning it.

use hooker_core::{load_units, Unit};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/headers")
}

/// Text of one header fixture.
pub fn header(name: &str) -> String {
    let path = fixture_dir().join(name);
    assert!(path.exists(), "Fixture '{name}' not found at {}", path.display());
    std::fs::read_to_string(&path).expect("Failed to read fixture")
}

/// Load fixtures by name as batch units, in the order given.
pub fn units(names: &[&str]) -> Vec<Unit> {
    let paths: Vec<PathBuf> = names.iter().map(|n| fixture_dir().join(n)).collect();
    let (units, unreadable) = load_units(&paths);
    assert!(unreadable.is_empty(), "Unreadable fixtures: {unreadable:?}");
    units
}

/// Copy every fixture into a fresh temp dir, optionally under `subdir`.
pub fn copy_fixtures(subdir: Option<&str>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dst = match subdir {
        Some(s) => temp_dir.path().join(s),
        None => temp_dir.path().to_path_buf(),
    };
    std::fs::create_dir_all(&dst).expect("Failed to create dir");
    for entry in std::fs::read_dir(fixture_dir()).expect("Failed to read dir") {
        let entry = entry.expect("Failed to read entry");
        std::fs::copy(entry.path(), dst.join(entry.file_name())).expect("Failed to copy file");
    }
    temp_dir
}
