use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

use crate::store::error::{Result, StoreError};

/// How long to sleep between lock attempts
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// Generic load/save of JSON documents in a single directory.
///
/// Writes go through a temp file in the same directory followed by a rename,
/// so a reader never observes a partially written document. Writers are
/// serialized per document by an exclusive lock on a `.lock` sidecar; the
/// lock covers the external scan parser as well, which writes into the same
/// directory from another process.
pub struct DocumentStore {
    dir: PathBuf,
    lock_timeout: Duration,
}

/// Outcome of a raw document read. `Missing` covers only an absent file;
/// a file that is present but unreadable, empty, or unparsable is
/// `Invalid`.
pub enum DocumentRead<T> {
    Found(T),
    Missing,
    Invalid,
}

struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>, lock_timeout_ms: u64) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout: Duration::from_millis(lock_timeout_ms),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of a named document
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn lock_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json.lock"))
    }

    /// Read a document without a default, distinguishing the failure modes.
    /// The scan progress monitor needs `Invalid` to report an error state
    /// instead of silently starting over.
    pub fn read_document<T: DeserializeOwned>(&self, name: &str) -> DocumentRead<T> {
        let path = self.path(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return DocumentRead::Missing,
            Err(_) => return DocumentRead::Invalid,
        };

        match serde_json::from_str(&contents) {
            Ok(value) => DocumentRead::Found(value),
            Err(_) => DocumentRead::Invalid,
        }
    }

    /// Lenient read: a missing, empty, or corrupt document yields `default`.
    /// Corruption is logged but never surfaced; the store starts over from
    /// the default rather than wedging every request on a bad file.
    pub fn load<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        match self.read_document(name) {
            DocumentRead::Found(value) => value,
            DocumentRead::Missing => default,
            DocumentRead::Invalid => {
                tracing::warn!(
                    "Document {} is unreadable or corrupt, using default",
                    self.path(name).display()
                );
                default
            }
        }
    }

    /// Atomically replace a document: serialize to a temp file in the same
    /// directory, then rename over the final path while holding the
    /// exclusive write lock.
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let _lock = self.acquire_lock(name)?;

        let path = self.path(name);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        serde_json::to_writer_pretty(&mut tmp, value)?;

        tmp.persist(&path).map_err(|e| StoreError::Write {
            path,
            source: e.error,
        })?;

        Ok(())
    }

    fn acquire_lock(&self, name: &str) -> Result<LockGuard> {
        let lock_path = self.lock_path(name);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| StoreError::Write {
                path: lock_path.clone(),
                source,
            })?;

        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(LockGuard { file }),
                Err(_) if start.elapsed() < self.lock_timeout => {
                    std::thread::sleep(LOCK_RETRY_INTERVAL);
                }
                Err(_) => return Err(StoreError::LockTimeout { path: lock_path }),
            }
        }
    }
}
