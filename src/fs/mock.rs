// src/fs/mock.rs

//! In-memory [`FileSystem`] for tests.

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::FileSystem;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // child names
    Symlink(PathBuf),
}

/// Upper bound on link expansions while resolving one path (like `ELOOP`).
const MAX_LINK_HOPS: usize = 40;

/// Cloning shares the underlying tree, so a test can keep a handle and
/// rewrite files after handing a clone to a `Registry`.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or overwrite) a file, creating parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        entries.insert(path.clone(), MockEntry::File(content.into()));
        if let Some(parent) = path.parent() {
            link_child(&mut entries, parent, &path);
        }
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        ensure_dir(&mut entries, &path);
    }

    /// Add a symbolic link at `path` pointing to `target` (a mock path, not
    /// relative to the link).
    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        entries.insert(path.clone(), MockEntry::Symlink(target.as_ref().to_path_buf()));
        if let Some(parent) = path.parent() {
            link_child(&mut entries, parent, &path);
        }
    }

    /// Remove a file. Its parent keeps listing it no more.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        entries.remove(path);
        if let (Some(parent), Some(name)) = (path.parent(), file_name(path)) {
            if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
                children.retain(|c| *c != name);
            }
        }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|n| n.to_str()).map(str::to_string)
}

fn ensure_dir(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if path.as_os_str().is_empty() || entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    if let Some(parent) = path.parent() {
        link_child(entries, parent, path);
    }
}

fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
    if parent.as_os_str().is_empty() {
        return;
    }
    ensure_dir(entries, parent);
    if let (Some(MockEntry::Dir(children)), Some(name)) = (entries.get_mut(parent), file_name(child)) {
        if !children.contains(&name) {
            children.push(name);
        }
    }
}

/// Follow links component by component. `None` on a link cycle.
fn resolve(entries: &HashMap<PathBuf, MockEntry>, path: &Path) -> Option<PathBuf> {
    let mut hops = 0;
    let mut resolved = PathBuf::new();
    for component in path.components() {
        resolved.push(component);
        while let Some(MockEntry::Symlink(target)) = entries.get(&resolved) {
            hops += 1;
            if hops > MAX_LINK_HOPS {
                return None;
            }
            resolved = target.clone();
        }
    }
    Some(resolved)
}

fn lookup<'a>(entries: &'a HashMap<PathBuf, MockEntry>, path: &Path) -> Option<&'a MockEntry> {
    entries.get(&resolve(entries, path)?)
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("not found: {path:?}"))
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let entries = self.entries.lock().unwrap();
        match lookup(&entries, path) {
            Some(MockEntry::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir(_)) => Err(io::Error::other(format!("is a directory: {path:?}"))),
            Some(MockEntry::Symlink(_)) | None => Err(not_found(path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        lookup(&self.entries.lock().unwrap(), path).is_some()
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(lookup(&self.entries.lock().unwrap(), path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(lookup(&self.entries.lock().unwrap(), path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        let resolved = match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => resolve(&entries, parent).map(|p| p.join(name)),
            _ => Some(path.to_path_buf()),
        };
        matches!(resolved.and_then(|p| entries.get(&p)), Some(MockEntry::Symlink(_)))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let entries = self.entries.lock().unwrap();
        match resolve(&entries, path) {
            Some(resolved) if entries.contains_key(&resolved) => Ok(resolved),
            _ => Err(not_found(path)),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = self.entries.lock().unwrap();
        match lookup(&entries, path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            Some(MockEntry::File(_)) => Err(io::Error::other(format!("not a directory: {path:?}"))),
            Some(MockEntry::Symlink(_)) | None => Err(not_found(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_files_create_parent_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("data/sub/a.csv", "x\n1\n");

        assert!(fs.is_dir(Path::new("data")));
        assert!(fs.is_dir(Path::new("data/sub")));
        assert!(fs.is_file(Path::new("data/sub/a.csv")));
        assert_eq!(
            fs.read_dir(Path::new("data")).unwrap(),
            vec![PathBuf::from("data/sub")]
        );
    }

    #[test]
    fn open_read_returns_contents_and_errors_for_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("data/a.csv", "hello");

        let mut buf = String::new();
        fs.open_read(Path::new("data/a.csv"))
            .unwrap()
            .read_to_string(&mut buf)
            .unwrap();
        assert_eq!(buf, "hello");

        assert!(fs.open_read(Path::new("data")).is_err());
        let err = fs.open_read(Path::new("data/missing.csv")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn remove_file_unlinks_from_parent() {
        let fs = MockFileSystem::new();
        fs.add_file("data/a.csv", "x");
        fs.remove_file("data/a.csv");

        assert!(!fs.exists(Path::new("data/a.csv")));
        assert!(fs.read_dir(Path::new("data")).unwrap().is_empty());
    }

    #[test]
    fn symlinks_are_followed_but_reported() {
        let fs = MockFileSystem::new();
        fs.add_file("data/a.csv", "x");
        fs.add_symlink("data/loop", "data");

        assert!(fs.is_symlink(Path::new("data/loop")));
        assert!(!fs.is_symlink(Path::new("data/a.csv")));
        assert!(fs.is_dir(Path::new("data/loop")));
        assert!(fs.is_file(Path::new("data/loop/a.csv")));
        assert!(fs.is_symlink(Path::new("data/loop/loop")));
        assert_eq!(
            fs.canonicalize(Path::new("data/loop/loop/a.csv")).unwrap(),
            PathBuf::from("data/a.csv")
        );
    }

    #[test]
    fn link_cycles_resolve_to_nothing() {
        let fs = MockFileSystem::new();
        fs.add_symlink("data/x", "data/y");
        fs.add_symlink("data/y", "data/x");

        assert!(!fs.exists(Path::new("data/x")));
        assert!(fs.canonicalize(Path::new("data/x")).is_err());
    }
}
