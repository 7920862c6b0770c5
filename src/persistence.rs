// File: src/persistence.rs
use crate::error::{StoreError, StoreResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A durable string key-value store, one key per preference field.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> StoreResult<()>;
}

/// Keeps every key in one JSON object on disk.
///
/// The file is read once on open. Each `set` rewrites the whole file through a
/// temp file in the same directory, so a crash never leaves a half-written file.
/// A store whose file could not be read is detached: it keeps nothing on disk
/// and every `set` fails, leaving the unreadable file alone.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    detached: bool,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => {
                let raw: BTreeMap<String, Value> =
                    serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                        path: path.display().to_string(),
                        source,
                    })?;
                raw.into_iter().map(|(key, value)| stored_text(key, value)).collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no preference file yet, starting empty");
                BTreeMap::new()
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Ok(Self {
            path,
            entries,
            detached: false,
        })
    }

    /// Like [`FileStore::open`], but never fails. A corrupt file is treated as
    /// empty and gets replaced on the next write; an unreadable one gives a
    /// detached store.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(StoreError::Corrupt { source, .. }) => {
                tracing::warn!(path = %path.display(), error = %source, "ignoring corrupt preference file");
                Self {
                    path,
                    entries: BTreeMap::new(),
                    detached: false,
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "preference file unreadable, changes will not be saved");
                Self {
                    path,
                    entries: BTreeMap::new(),
                    detached: true,
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    fn save_to_disk(&self) -> StoreResult<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };
        let parent_dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir).map_err(io_err)?;

        let temp_file = NamedTempFile::new_in(parent_dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            serde_json::to_writer_pretty(&mut writer, &self.entries).map_err(|source| {
                StoreError::Serialize {
                    key: "*".to_string(),
                    source,
                }
            })?;
            writer.flush().map_err(io_err)?;
        }
        temp_file.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        if self.detached {
            return Err(StoreError::Unavailable {
                reason: format!("{} could not be read", self.path.display()),
            });
        }
        // Unchanged values skip the disk round trip.
        if self.entries.get(key) == Some(&value) {
            return Ok(());
        }
        self.entries.insert(key.to_string(), value);
        self.save_to_disk()
    }
}

/// Every value is stored as a string holding JSON. Entries written by hand as
/// bare JSON (`"as_suppress": true`) keep their JSON text instead of sinking
/// the whole file.
fn stored_text(key: String, value: Value) -> (String, String) {
    match value {
        Value::String(text) => (key, text),
        other => {
            tracing::warn!(key = %key, "preference entry is not a string, keeping its JSON text");
            let text = other.to_string();
            (key, text)
        }
    }
}

/// An in-process store. Writes can be made to fail, to stand in for a full disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `set` returns [`StoreError::Unavailable`] and stores nothing.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seeds a raw value, bypassing any failure mode.
    pub fn with_raw(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Unavailable {
                reason: "quota exceeded".to_string(),
            });
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
