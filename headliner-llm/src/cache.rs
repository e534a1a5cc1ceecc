//! Response cache for LLM calls
//!
//! Keys are the deterministic serialization of an `LlmRequest`; values are the
//! raw response text. Capacity is bounded and eviction is first-in-first-out:
//! when full, the oldest inserted key is dropped regardless of how recently it
//! was read.
//!
//! ## Storage format
//!
//! `FileResponseCache` keeps the whole cache in memory and rewrites the file
//! after every mutation as a JSON array of `[key, value]` pairs in insertion
//! order, so a reload restores the eviction order too.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, error, info};

/// Maximum number of entries kept unless configured otherwise
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Memoizes LLM responses by request key
pub trait ResponseCache: Send + Sync {
    /// Look up a previous response
    fn get(&self, key: &str) -> Option<String>;

    /// Store a response, evicting the oldest entry if the cache is full
    fn set(&self, key: String, response: String);

    /// Number of cached entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    fn clear(&self);
}

/// Insertion-ordered map with a hard capacity
#[derive(Debug)]
struct FifoStore {
    entries: IndexMap<String, String>,
    capacity: usize,
}

impl FifoStore {
    fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity: capacity.max(1),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    /// Returns the evicted key, if any
    fn insert(&mut self, key: String, value: String) -> Option<String> {
        // Overwrites keep their original position
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0).map(|(oldest, _)| oldest)
        } else {
            None
        };

        self.entries.insert(key, value);
        evicted
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Process-local cache, nothing touches disk
#[derive(Debug)]
pub struct MemoryResponseCache {
    store: Mutex<FifoStore>,
}

impl MemoryResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: Mutex::new(FifoStore::new(capacity)),
        }
    }
}

impl Default for MemoryResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ResponseCache for MemoryResponseCache {
    fn get(&self, key: &str) -> Option<String> {
        self.store.lock().get(key)
    }

    fn set(&self, key: String, response: String) {
        if let Some(evicted) = self.store.lock().insert(key, response) {
            debug!("Evicted oldest cache entry ({} chars of key)", evicted.len());
        }
    }

    fn len(&self) -> usize {
        self.store.lock().len()
    }

    fn clear(&self) {
        self.store.lock().clear();
    }
}

/// Disk-backed cache, reloaded at startup and rewritten on every change
#[derive(Debug)]
pub struct FileResponseCache {
    store: Mutex<FifoStore>,
    path: PathBuf,
}

impl FileResponseCache {
    /// Open the cache file at `path`
    ///
    /// A missing file starts an empty cache. An unreadable or corrupt file is
    /// logged and also starts empty; it is replaced on the next write.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut store = FifoStore::new(capacity);

        if path.exists() {
            match Self::read_entries(&path) {
                Ok(entries) => {
                    for (key, value) in entries {
                        store.insert(key, value);
                    }
                    info!("Loaded {} entries from prompt cache at {}", store.len(), path.display());
                }
                Err(e) => {
                    error!("Failed to load prompt cache from {}: {}", path.display(), e);
                }
            }
        } else {
            debug!("No prompt cache at {}, starting empty", path.display());
        }

        Self {
            store: Mutex::new(store),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<Vec<(String, String)>, std::io::Error> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(std::io::Error::other)
    }

    /// Rewrite the whole file; a temp file plus rename keeps the old copy intact on failure
    fn persist(&self, store: &FifoStore) {
        if let Err(e) = self.write_entries(store) {
            error!("Failed to save prompt cache to {}: {}", self.path.display(), e);
        }
    }

    fn write_entries(&self, store: &FifoStore) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(&store.entries.iter().collect::<Vec<_>>()).map_err(std::io::Error::other)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }
}

impl ResponseCache for FileResponseCache {
    fn get(&self, key: &str) -> Option<String> {
        self.store.lock().get(key)
    }

    fn set(&self, key: String, response: String) {
        let mut store = self.store.lock();
        if let Some(evicted) = store.insert(key, response) {
            debug!("Evicted oldest cache entry ({} chars of key)", evicted.len());
        }
        self.persist(&store);
    }

    fn len(&self) -> usize {
        self.store.lock().len()
    }

    fn clear(&self) {
        let mut store = self.store.lock();
        store.clear();
        self.persist(&store);
    }
}
