//! Temporary data directories backed by the real filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use csvwatch::fs::RealFileSystem;
use csvwatch::registry::Registry;

/// A temp directory that stands in for the watched folder.
///
/// The root is canonicalized so it matches the absolute paths reported by
/// the OS watcher (e.g. `/private/var/...` on macOS).
pub struct DataDir {
    _dir: TempDir,
    root: PathBuf,
}

impl DataDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().canonicalize().expect("canonicalize temp dir");
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `contents` to `rel` below the root, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// An empty registry over this directory using the real filesystem.
    pub fn registry(&self) -> Arc<Registry> {
        Arc::new(Registry::new(self.root.clone(), Arc::new(RealFileSystem)))
    }
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new()
    }
}
