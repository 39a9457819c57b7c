// src/watch/bootstrap.rs

//! Initial recursive scan that seeds the registry before live watching.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::errors::{CsvwatchError, Result};
use crate::registry::{Registry, ReloadOutcome};
use crate::watch::filter::PathFilter;

/// Counts gathered during a bootstrap walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub loaded: usize,
    pub empty: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Files skipped because the filter rejected them.
    pub filtered: usize,
    /// Symlinked directories that were not descended into.
    pub skipped_links: usize,
}

/// Walk every file below the registry root and reload those accepted by
/// `filter`.
///
/// A missing or non-directory root is an error. Per-file load failures are
/// logged and counted, never returned. Symlinked directories below the root
/// are not descended into; symlinked files are loaded under the link's key.
pub fn bootstrap(registry: &Registry, filter: &dyn PathFilter) -> Result<BootstrapReport> {
    let fs = registry.fs();
    let root = registry.root();

    if !fs.exists(root) {
        return Err(CsvwatchError::Config(format!(
            "watch folder {root:?} does not exist"
        )));
    }
    if !fs.is_dir(root) {
        return Err(CsvwatchError::NotADirectory(root.to_path_buf()));
    }

    let mut report = BootstrapReport::default();
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir.as_path() == root => return Err(err.into()),
            Err(err) => {
                warn!(dir = ?dir, error = %err, "cannot list directory; skipping");
                continue;
            }
        };
        // Reverse so the stack pops subdirectories in name order.
        entries.sort();

        for path in entries.into_iter().rev() {
            if fs.is_dir(&path) {
                if fs.is_symlink(&path) {
                    debug!(path = ?path, "not following symlinked directory");
                    report.skipped_links += 1;
                } else {
                    stack.push(path);
                }
                continue;
            }
            if !fs.is_file(&path) {
                continue;
            }

            let Some(key) = registry.key_for(&path) else {
                continue;
            };
            if !filter.matches(&key) {
                debug!(key = %key, "filtered out");
                report.filtered += 1;
                continue;
            }

            match registry.reload(&path) {
                Ok(ReloadOutcome::Replaced { .. }) => report.loaded += 1,
                Ok(ReloadOutcome::Empty { .. }) => report.empty += 1,
                Ok(ReloadOutcome::Unchanged { .. }) => report.unchanged += 1,
                Err(err) => {
                    warn!(key = %key, error = %err, "failed to load file; skipping");
                    report.failed += 1;
                }
            }
        }
    }

    info!(
        root = ?root,
        loaded = report.loaded,
        empty = report.empty,
        failed = report.failed,
        skipped_links = report.skipped_links,
        "bootstrap complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::watch::filter::WatchFilter;

    fn csv_filter() -> WatchFilter {
        WatchFilter::new(r"\.csv$", &[]).unwrap()
    }

    #[test]
    fn loads_matching_files_recursively() {
        let fs = MockFileSystem::new();
        fs.add_file("data/a.csv", "id,name\n1,alice\n");
        fs.add_file("data/nested/deeper/b.csv", "x\n9\n");
        fs.add_file("data/readme.txt", "not a table");
        let reg = Registry::new("data", Arc::new(fs));

        let report = bootstrap(&reg, &csv_filter()).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(report.filtered, 1);
        assert_eq!(reg.keys(), vec!["a.csv", "nested/deeper/b.csv"]);
    }

    #[test]
    fn bad_files_are_skipped_not_fatal() {
        let fs = MockFileSystem::new();
        fs.add_file("data/good.csv", "x\n1\n");
        fs.add_file("data/ragged.csv", "x,y\n1\n");
        fs.add_file("data/empty.csv", "");
        let reg = Registry::new("data", Arc::new(fs));

        let report = bootstrap(&reg, &csv_filter()).unwrap();

        assert_eq!(report, BootstrapReport {
            loaded: 1,
            empty: 1,
            unchanged: 0,
            failed: 1,
            filtered: 0,
            skipped_links: 0,
        });
        assert_eq!(reg.keys(), vec!["good.csv"]);
    }

    #[test]
    fn excludes_apply_during_bootstrap() {
        let fs = MockFileSystem::new();
        fs.add_file("data/keep.csv", "x\n1\n");
        fs.add_file("data/tmp/skip.csv", "x\n1\n");
        let reg = Registry::new("data", Arc::new(fs));
        let filter = WatchFilter::new(r"\.csv$", &["tmp/**".to_string()]).unwrap();

        bootstrap(&reg, &filter).unwrap();
        assert_eq!(reg.keys(), vec!["keep.csv"]);
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let reg = Registry::new("nowhere", Arc::new(MockFileSystem::new()));
        let err = bootstrap(&reg, &csv_filter()).unwrap_err();
        assert!(matches!(err, CsvwatchError::Config(_)));
    }

    #[test]
    fn file_root_is_rejected() {
        let fs = MockFileSystem::new();
        fs.add_file("data.csv", "x\n1\n");
        let reg = Registry::new("data.csv", Arc::new(fs));
        let err = bootstrap(&reg, &csv_filter()).unwrap_err();
        assert!(matches!(err, CsvwatchError::NotADirectory(_)));
    }

    #[test]
    fn empty_directory_loads_nothing() {
        let fs = MockFileSystem::new();
        fs.add_dir("data");
        let reg = Registry::new("data", Arc::new(fs));
        let report = bootstrap(&reg, &csv_filter()).unwrap();
        assert_eq!(report, BootstrapReport::default());
        assert!(reg.is_empty());
    }

    #[test]
    fn symlinked_directories_are_not_descended() {
        let fs = MockFileSystem::new();
        fs.add_file("data/a.csv", "x\n1\n");
        fs.add_file("elsewhere/b.csv", "x\n2\n");
        fs.add_symlink("data/loop", "data");
        fs.add_symlink("data/again", "data");
        fs.add_symlink("data/outside", "elsewhere");
        fs.add_symlink("data/linked.csv", "elsewhere/b.csv");
        let reg = Registry::new("data", Arc::new(fs));

        let report = bootstrap(&reg, &csv_filter()).unwrap();

        assert_eq!(report.skipped_links, 3);
        assert_eq!(report.loaded, 2);
        assert_eq!(reg.keys(), vec!["a.csv", "linked.csv"]);
    }
}
