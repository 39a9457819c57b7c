// src/watch/path_utils.rs

//! Path handling shared by the registry, bootstrap walk and watcher.

use std::path::Path;

use crate::fs::FileSystem;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. symlinked temp dirs on macOS), we canonicalize both
///   paths and try again.
///
/// Returns `None` if the path is not below `root`, or is `root` itself.
pub fn relative_str(fs: &dyn FileSystem, root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return non_empty(rel);
    }

    if let (Ok(root_canon), Ok(path_canon)) = (fs.canonicalize(root), fs.canonicalize(path)) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return non_empty(rel);
        }
    }

    None
}

fn non_empty(rel: &Path) -> Option<String> {
    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() { None } else { Some(s) }
}
