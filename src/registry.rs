// src/registry.rs

//! The dataset registry: key -> current [`Dataset`].
//!
//! Writers (bootstrap and the change detector) go through [`Registry::reload`],
//! which holds a single writer lock for the whole read/parse/swap sequence,
//! so reloads are serialized process-wide. Readers only take the map's read
//! lock long enough to clone an `Arc<Dataset>`; a dataset is never mutated
//! after it has been inserted.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::dataset::{self, Dataset};
use crate::errors::{CsvwatchError, Result};
use crate::fs::FileSystem;
use crate::watch::path_utils::relative_str;

/// What a call to [`Registry::reload`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The entry for `key` now holds a freshly parsed dataset.
    Replaced {
        key: String,
        rows: usize,
        elapsed: Duration,
    },
    /// The file had no records; any previous entry was left in place.
    Empty { key: String },
    /// Content hash matched the stored entry; nothing was parsed.
    Unchanged { key: String },
}

impl ReloadOutcome {
    pub fn key(&self) -> &str {
        match self {
            ReloadOutcome::Replaced { key, .. }
            | ReloadOutcome::Empty { key }
            | ReloadOutcome::Unchanged { key } => key,
        }
    }
}

/// State only touched while the writer lock is held.
#[derive(Debug, Default)]
struct WriterState {
    hashes: HashMap<String, blake3::Hash>,
}

#[derive(Debug)]
pub struct Registry {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    datasets: RwLock<HashMap<String, Arc<Dataset>>>,
    writer: Mutex<WriterState>,
    skip_unchanged: bool,
}

impl Registry {
    /// Create an empty registry for files below `root`.
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            fs,
            datasets: RwLock::new(HashMap::new()),
            writer: Mutex::new(WriterState::default()),
            skip_unchanged: false,
        }
    }

    /// Remember content hashes and skip reloads of unchanged files.
    pub fn with_skip_unchanged(mut self, skip_unchanged: bool) -> Self {
        self.skip_unchanged = skip_unchanged;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Registry key for `path`, if it lies below the root.
    pub fn key_for(&self, path: &Path) -> Option<String> {
        relative_str(self.fs(), &self.root, path)
    }

    /// Current dataset for `key`.
    pub fn get(&self, key: &str) -> Option<Arc<Dataset>> {
        self.read_map().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read_map().contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read_map().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Consistent point-in-time copy of every entry.
    pub fn snapshot(&self) -> BTreeMap<String, Arc<Dataset>> {
        self.read_map()
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    /// Re-read `path` and replace its entry.
    ///
    /// Read and parse errors leave the registry untouched. A file with no
    /// records is logged and leaves any previous entry in place.
    pub fn reload(&self, path: &Path) -> Result<ReloadOutcome> {
        let start = Instant::now();
        let key = self
            .key_for(path)
            .ok_or_else(|| CsvwatchError::OutsideRoot(path.to_path_buf()))?;

        let mut state = self.lock_writer();

        let (records, hash) = if self.skip_unchanged {
            let bytes = dataset::read_source(self.fs(), path)?;
            let hash = blake3::hash(&bytes);
            if state.hashes.get(&key) == Some(&hash) && self.contains(&key) {
                debug!(key = %key, "content unchanged; skipping reload");
                return Ok(ReloadOutcome::Unchanged { key });
            }
            let records = dataset::records(bytes.as_slice())
                .collect::<csv::Result<Vec<_>>>()
                .map_err(|e| dataset::loader::parse_error(path, e))?;
            (records, Some(hash))
        } else {
            (dataset::load(self.fs(), path)?, None)
        };

        let Some(dataset) = Dataset::from_records(records) else {
            warn!(key = %key, path = ?path, "file has no records; keeping previous entry");
            return Ok(ReloadOutcome::Empty { key });
        };

        let rows = dataset.len();
        self.write_map().insert(key.clone(), Arc::new(dataset));
        if let Some(hash) = hash {
            state.hashes.insert(key.clone(), hash);
        }

        let elapsed = start.elapsed();
        info!(key = %key, rows, ?elapsed, "reloaded dataset");
        Ok(ReloadOutcome::Replaced { key, rows, elapsed })
    }

    // A panicking reader or writer can't leave the map half-updated (inserts
    // are a single swap), so poisoned locks are safe to recover.
    fn read_map(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Dataset>>> {
        self.datasets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<Dataset>>> {
        self.datasets.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_writer(&self) -> MutexGuard<'_, WriterState> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
