//! Locked, persistent normalization sessions.

use tracing::{info, warn};

use canon_model::{
    MappingRecord, MatchStatus, Normalization, PendingReview, Result, ReviewDecision, ReviewId,
    ReviewQueue, Vocabulary,
};
use canon_store::{MappingStore, VocabularyLock};

use crate::config::CanonConfig;
use crate::matcher::ScoredForm;
use crate::normalizer::{Decision, Normalizer, Resolution};

/// Exclusive, loaded view of one vocabulary.
///
/// Holds the vocabulary lock from [`VocabularySession::open`] until drop.
/// Every mutation is made on a copy that replaces the live state only after
/// it has been written, so a failed save leaves the session as it was.
#[derive(Debug)]
pub struct VocabularySession<'s> {
    store: &'s MappingStore,
    lock: VocabularyLock,
    normalizer: Normalizer,
    record: MappingRecord,
    queue: ReviewQueue,
}

impl<'s> VocabularySession<'s> {
    /// Lock the normalizer's vocabulary and load its record and queue.
    ///
    /// Queue entries whose variant already resolves to a canonical form are
    /// dropped and the queue rewritten.
    pub fn open(store: &'s MappingStore, normalizer: Normalizer) -> Result<Self> {
        let vocabulary = normalizer.vocabulary();
        let lock = store.lock(vocabulary)?;
        let record = store.load(&lock)?;
        let mut queue = store.load_queue(&lock)?;

        let pruned = normalizer.prune_stale(&record, &mut queue);
        if !pruned.is_empty() {
            warn!(
                vocabulary = %vocabulary,
                pruned = pruned.len(),
                "dropped pending reviews whose variants already resolve"
            );
            store.save_queue(&lock, &queue)?;
        }

        Ok(Self {
            store,
            lock,
            normalizer,
            record,
            queue,
        })
    }

    pub fn vocabulary(&self) -> Vocabulary {
        self.lock.vocabulary()
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn record(&self) -> &MappingRecord {
        &self.record
    }

    /// Canonical forms, sorted.
    pub fn canonical_forms(&self) -> Vec<String> {
        self.record.canonical_forms().map(String::from).collect()
    }

    /// Pending reviews in arrival order.
    pub fn pending_reviews(&self) -> &[PendingReview] {
        self.queue.entries()
    }

    /// Alternatives for a variant, best first.
    pub fn suggestions(&self, variant: &str, limit: usize) -> Vec<ScoredForm> {
        self.normalizer.suggestions(&self.record, variant, limit)
    }

    /// Normalize one candidate, persisting any mapping or queue change
    /// before returning.
    pub fn normalize(&mut self, candidate: &str) -> Result<Normalization> {
        let decision = self.normalizer.decide(&self.record, &self.queue, candidate);
        let status = decision.status();

        let mut record = self.record.clone();
        let mut queue = self.queue.clone();
        let created_review = matches!(decision, Decision::Review { .. });
        let outcome = self.normalizer.apply(&mut record, &mut queue, decision)?;

        self.commit(
            status.mutates_record().then_some(record),
            created_review.then_some(queue),
        )?;
        Ok(outcome)
    }

    /// Normalize many candidates with a single flush at the end.
    ///
    /// Outcomes are in input order. On error nothing is persisted and the
    /// session is unchanged.
    pub fn normalize_batch<'c, I>(&mut self, candidates: I) -> Result<Vec<Normalization>>
    where
        I: IntoIterator<Item = &'c str>,
    {
        let mut record = self.record.clone();
        let mut queue = self.queue.clone();
        let mut record_changed = false;
        let mut queue_changed = false;

        let mut outcomes = Vec::new();
        for candidate in candidates {
            let decision = self.normalizer.decide(&record, &queue, candidate);
            queue_changed |= matches!(decision, Decision::Review { .. });
            let outcome = self.normalizer.apply(&mut record, &mut queue, decision)?;
            record_changed |= outcome.status.mutates_record();
            outcomes.push(outcome);
        }

        self.commit(
            record_changed.then_some(record),
            queue_changed.then_some(queue),
        )?;
        info!(
            vocabulary = %self.vocabulary(),
            candidates = outcomes.len(),
            auto_matched = count(&outcomes, MatchStatus::AutoMatched),
            pending = count(&outcomes, MatchStatus::PendingReview),
            new_entities = count(&outcomes, MatchStatus::NewEntity),
            "batch normalized"
        );
        Ok(outcomes)
    }

    /// Apply an operator decision to a queued review.
    pub fn resolve_pending(
        &mut self,
        id: ReviewId,
        decision: ReviewDecision,
    ) -> Result<Resolution> {
        let mut record = self.record.clone();
        let mut queue = self.queue.clone();
        let resolution = self
            .normalizer
            .resolve(&mut record, &mut queue, id, decision)?;
        self.commit(Some(record), Some(queue))?;
        Ok(resolution)
    }

    /// Record first: a crash between the two writes leaves a stale queue
    /// entry, which the next open prunes.
    fn commit(&mut self, record: Option<MappingRecord>, queue: Option<ReviewQueue>) -> Result<()> {
        if let Some(record) = record {
            self.store.save(&self.lock, &record)?;
            self.record = record;
        }
        if let Some(queue) = queue {
            self.store.save_queue(&self.lock, &queue)?;
            self.queue = queue;
        }
        Ok(())
    }
}

fn count(outcomes: &[Normalization], status: MatchStatus) -> usize {
    outcomes.iter().filter(|o| o.status == status).count()
}

/// Counts for one vocabulary, as reported by [`Workspace::summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularySummary {
    pub vocabulary: Vocabulary,
    pub canonical_forms: usize,
    pub mappings: usize,
    pub pending_reviews: usize,
}

/// A mappings directory plus the configuration of every vocabulary.
///
/// This is the explicit handle that replaces process-wide state: two
/// workspaces over different directories never share anything.
#[derive(Debug, Clone)]
pub struct Workspace {
    store: MappingStore,
    config: CanonConfig,
}

impl Workspace {
    /// Open the store at `config.mappings_dir`.
    pub fn open(config: CanonConfig) -> Result<Self> {
        let store = MappingStore::open(&config.mappings_dir)?;
        Ok(Self { store, config })
    }

    pub fn with_store(store: MappingStore, config: CanonConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    pub fn config(&self) -> &CanonConfig {
        &self.config
    }

    pub fn normalizer(&self, vocabulary: Vocabulary) -> Result<Normalizer> {
        Normalizer::new(vocabulary, self.config.vocabulary(vocabulary))
    }

    /// Lock and load a vocabulary.
    pub fn session(&self, vocabulary: Vocabulary) -> Result<VocabularySession<'_>> {
        VocabularySession::open(&self.store, self.normalizer(vocabulary)?)
    }

    pub fn normalize(&self, vocabulary: Vocabulary, candidate: &str) -> Result<Normalization> {
        self.session(vocabulary)?.normalize(candidate)
    }

    pub fn list_canonical_forms(&self, vocabulary: Vocabulary) -> Result<Vec<String>> {
        Ok(self.session(vocabulary)?.canonical_forms())
    }

    pub fn list_pending_reviews(&self, vocabulary: Vocabulary) -> Result<Vec<PendingReview>> {
        Ok(self.session(vocabulary)?.pending_reviews().to_vec())
    }

    pub fn resolve_pending(
        &self,
        vocabulary: Vocabulary,
        id: ReviewId,
        decision: ReviewDecision,
    ) -> Result<Resolution> {
        self.session(vocabulary)?.resolve_pending(id, decision)
    }

    /// Current mapping record of a vocabulary.
    pub fn mappings(&self, vocabulary: Vocabulary) -> Result<MappingRecord> {
        Ok(self.session(vocabulary)?.record().clone())
    }

    /// Load a vocabulary and report its size. Fails on a corrupt store.
    pub fn summary(&self, vocabulary: Vocabulary) -> Result<VocabularySummary> {
        let session = self.session(vocabulary)?;
        Ok(VocabularySummary {
            vocabulary,
            canonical_forms: session.record().canonical_count(),
            mappings: session.record().mapping_count(),
            pending_reviews: session.pending_reviews().len(),
        })
    }
}
