//! Directory-backed mapping store.

use std::fs;
use std::path::{Path, PathBuf};

use canon_model::{CanonError, MappingRecord, Result, ReviewQueue, Vocabulary};

use crate::io::{read_json, write_json_atomic};
use crate::lock::VocabularyLock;

/// Handle on a mappings directory holding one record per vocabulary.
///
/// Reads and writes require a [`VocabularyLock`] for the vocabulary, so a
/// load-decide-save cycle can never interleave with another writer.
#[derive(Debug, Clone)]
pub struct MappingStore {
    base_dir: PathBuf,
}

impl MappingStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .map_err(|e| CanonError::io("create directory", &base_dir, e))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the mapping record for a vocabulary.
    pub fn record_path(&self, vocabulary: Vocabulary) -> PathBuf {
        self.base_dir
            .join(format!("{}_mappings.json", vocabulary.id()))
    }

    /// Path of the review-queue sidecar for a vocabulary.
    pub fn queue_path(&self, vocabulary: Vocabulary) -> PathBuf {
        self.base_dir.join(format!("{}_pending.json", vocabulary.id()))
    }

    fn lock_path(&self, vocabulary: Vocabulary) -> PathBuf {
        self.base_dir.join(format!("{}.lock", vocabulary.id()))
    }

    /// Block until this process holds the vocabulary exclusively.
    pub fn lock(&self, vocabulary: Vocabulary) -> Result<VocabularyLock> {
        VocabularyLock::acquire(vocabulary, self.lock_path(vocabulary))
    }

    /// Acquire the vocabulary lock if nobody else holds it.
    pub fn try_lock(&self, vocabulary: Vocabulary) -> Result<Option<VocabularyLock>> {
        VocabularyLock::try_acquire(vocabulary, self.lock_path(vocabulary))
    }

    /// Whether a record file exists for the vocabulary.
    pub fn exists(&self, vocabulary: Vocabulary) -> bool {
        self.record_path(vocabulary).exists()
    }

    /// Load the mapping record, or an empty one if none was saved yet.
    ///
    /// Fails with [`CanonError::CorruptStore`] when a mapping targets an
    /// unregistered canonical form. The record is not repaired.
    pub fn load(&self, lock: &VocabularyLock) -> Result<MappingRecord> {
        let path = self.record_path(lock.vocabulary());
        let Some(record) = read_json::<MappingRecord>(&path)? else {
            tracing::info!(vocabulary = %lock.vocabulary(), path = %path.display(), "no mapping store found, starting empty");
            return Ok(MappingRecord::new());
        };

        if let Some((variant, canonical)) = record.dangling_mapping() {
            tracing::error!(
                vocabulary = %lock.vocabulary(),
                path = %path.display(),
                variant,
                canonical,
                "mapping store violates referential invariant"
            );
            return Err(CanonError::CorruptStore {
                path,
                variant: variant.to_string(),
                canonical: canonical.to_string(),
            });
        }

        tracing::info!(
            vocabulary = %lock.vocabulary(),
            mappings = record.mapping_count(),
            canonical = record.canonical_count(),
            "loaded mapping store"
        );
        Ok(record)
    }

    /// Atomically replace the mapping record.
    pub fn save(&self, lock: &VocabularyLock, record: &MappingRecord) -> Result<()> {
        let path = self.record_path(lock.vocabulary());
        write_json_atomic(&path, record)?;
        tracing::info!(
            vocabulary = %lock.vocabulary(),
            mappings = record.mapping_count(),
            canonical = record.canonical_count(),
            "saved mapping store"
        );
        Ok(())
    }

    /// Load the review queue, or an empty one if none was saved yet.
    pub fn load_queue(&self, lock: &VocabularyLock) -> Result<ReviewQueue> {
        let path = self.queue_path(lock.vocabulary());
        Ok(read_json::<ReviewQueue>(&path)?.unwrap_or_default())
    }

    /// Atomically replace the review queue.
    pub fn save_queue(&self, lock: &VocabularyLock, queue: &ReviewQueue) -> Result<()> {
        write_json_atomic(&self.queue_path(lock.vocabulary()), queue)?;
        tracing::debug!(vocabulary = %lock.vocabulary(), pending = queue.len(), "saved review queue");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_names_follow_vocabulary_ids() {
        let dir = tempdir().unwrap();
        let store = MappingStore::open(dir.path()).unwrap();
        assert!(
            store
                .record_path(Vocabulary::Company)
                .ends_with("company_mappings.json")
        );
        assert!(
            store
                .queue_path(Vocabulary::Template)
                .ends_with("template_pending.json")
        );
    }

    #[test]
    fn try_lock_fails_while_held() {
        let dir = tempdir().unwrap();
        let store = MappingStore::open(dir.path()).unwrap();

        let held = store.lock(Vocabulary::Company).unwrap();
        assert!(store.try_lock(Vocabulary::Company).unwrap().is_none());
        // Vocabularies never share a lock.
        assert!(store.try_lock(Vocabulary::Category).unwrap().is_some());

        drop(held);
        assert!(store.try_lock(Vocabulary::Company).unwrap().is_some());
    }
}
