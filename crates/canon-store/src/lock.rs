//! Per-vocabulary exclusive lock.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use canon_model::{CanonError, Result, Vocabulary};

/// Exclusive hold on one vocabulary's store files.
///
/// Backed by an OS advisory lock on `<vocabulary>.lock`, so it excludes
/// other processes as well as other handles in this process. Released when
/// dropped, including on error paths.
#[derive(Debug)]
pub struct VocabularyLock {
    vocabulary: Vocabulary,
    path: PathBuf,
    file: File,
}

impl VocabularyLock {
    /// Block until the lock at `path` is acquired.
    pub(crate) fn acquire(vocabulary: Vocabulary, path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| CanonError::io("open lock", &path, e))?;
        file.lock_exclusive()
            .map_err(|e| CanonError::io("lock", &path, e))?;
        tracing::trace!(%vocabulary, path = %path.display(), "acquired vocabulary lock");
        Ok(Self {
            vocabulary,
            path,
            file,
        })
    }

    /// Acquire without blocking. Returns `None` if another holder exists.
    pub(crate) fn try_acquire(vocabulary: Vocabulary, path: PathBuf) -> Result<Option<Self>> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| CanonError::io("open lock", &path, e))?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self {
                vocabulary,
                path,
                file,
            })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(CanonError::io("lock", &path, e)),
        }
    }

    pub fn vocabulary(&self) -> Vocabulary {
        self.vocabulary
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for VocabularyLock {
    fn drop(&mut self) {
        if let Err(error) = self.file.unlock() {
            tracing::warn!(path = %self.path.display(), %error, "failed to release vocabulary lock");
        }
    }
}
