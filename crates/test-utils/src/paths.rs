//! Path utilities for locating test data and scratch files.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns `crates/{crate_name}/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Searches for a test file.
///
/// Checks `TEST_DATA_DIR` first, then `crates/restart-codec/testdata/` and
/// the workspace-level `testdata/`.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        crate_testdata_dir("restart-codec").join(name),
        root.join("testdata").join(name),
    ]);

    candidates.into_iter().find(|p| p.exists())
}

/// A scratch directory removed when dropped.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a new scratch directory.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created; only used from tests.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create scratch directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the scratch directory (not created).
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for ScratchDir {
    fn default() -> Self {
        Self::new()
    }
}
