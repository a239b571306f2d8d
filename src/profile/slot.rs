//! Durable storage slots for the serialized profile document.
//!
//! A slot holds at most one UTF-8 document under one named key. Absence of
//! the key means "no active profile"; erasing removes the key entirely.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::errors::ProfileError;
use crate::validation::safe_filename;

/// Name of the slot key used by every backend unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "aetheria_profile";

const SLED_TREE: &str = "aetheria";

/// One named key in a local persistent key-value store.
pub trait ProfileSlot: Send {
    /// Current document, or `None` when the key is absent.
    fn read(&self) -> Result<Option<String>, ProfileError>;

    /// Durably replace the document. Must not return before the write is recorded.
    fn write(&mut self, document: &str) -> Result<(), ProfileError>;

    /// Remove the key. Erasing an absent key is not an error.
    fn erase(&mut self) -> Result<(), ProfileError>;

    /// Human-readable location for logs and status output.
    fn describe(&self) -> String;
}

// ============================================================================
// JSON file slot
// ============================================================================

/// `<dir>/<key>.json`, replaced atomically under an exclusive file lock.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn open(dir: impl AsRef<Path>, key: &str) -> Result<Self, ProfileError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(format!("{}.json", safe_filename(key))),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file_locked(path: &Path, content: &str) -> Result<(), ProfileError> {
        // Lock the destination so concurrent writers queue up behind us
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        lock_file.lock_exclusive()?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let base = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("profile.json");
        let mut counter = 0u32;
        let tmp_path = loop {
            let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(mut tmp) => {
                    tmp.write_all(content.as_bytes())?;
                    tmp.flush()?;
                    tmp.sync_all()?;
                    break candidate;
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    counter = counter.saturating_add(1);
                    continue;
                }
                Err(e) => return Err(ProfileError::Io(e)),
            }
        };

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ProfileError::Io(e));
        }

        // Persist the rename itself (best-effort on platforms without dir fsync)
        if let Ok(dir_file) = File::open(dir) {
            let _ = dir_file.sync_all();
        }

        drop(lock_file);
        Ok(())
    }
}

impl ProfileSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, ProfileError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim_start_matches('\0').trim().is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProfileError::Io(e)),
        }
    }

    fn write(&mut self, document: &str) -> Result<(), ProfileError> {
        Self::write_file_locked(&self.path, document)
    }

    fn erase(&mut self) -> Result<(), ProfileError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProfileError::Io(e)),
        }
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

// ============================================================================
// Sled slot
// ============================================================================

/// A single key inside a sled tree.
pub struct SledSlot {
    _db: sled::Db,
    tree: sled::Tree,
    key: String,
    location: PathBuf,
}

impl SledSlot {
    pub fn open(path: impl AsRef<Path>, key: &str) -> Result<Self, ProfileError> {
        let path_ref = path.as_ref();
        fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let tree = db.open_tree(SLED_TREE)?;
        Ok(Self {
            _db: db,
            tree,
            key: key.to_string(),
            location: path_ref.to_path_buf(),
        })
    }
}

impl ProfileSlot for SledSlot {
    fn read(&self) -> Result<Option<String>, ProfileError> {
        let Some(bytes) = self.tree.get(self.key.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(String::from_utf8(bytes.to_vec())?))
    }

    fn write(&mut self, document: &str) -> Result<(), ProfileError> {
        self.tree.insert(self.key.as_bytes(), document.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn erase(&mut self) -> Result<(), ProfileError> {
        self.tree.remove(self.key.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sled:{}#{}", self.location.display(), self.key)
    }
}

// ============================================================================
// In-memory slot
// ============================================================================

/// Process-local slot. Clones share the same document, so a test can keep a
/// handle and inspect what the store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    document: Arc<Mutex<Option<String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        let slot = Self::default();
        *slot.guard() = Some(document.into());
        slot
    }

    /// Current stored document.
    pub fn contents(&self) -> Option<String> {
        self.guard().clone()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.document.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProfileSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, ProfileError> {
        Ok(self.guard().clone())
    }

    fn write(&mut self, document: &str) -> Result<(), ProfileError> {
        *self.guard() = Some(document.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn erase(&mut self) -> Result<(), ProfileError> {
        *self.guard() = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
