//! Queue of moderate-confidence candidates awaiting review.
//!
//! Entries are keyed by variant: a variant is queued at most once, and
//! re-submitting it returns the existing entry untouched.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::record::MappingRecord;
use crate::review::{PendingReview, ReviewId};
use crate::vocabulary::Vocabulary;

const FIRST_ID: u64 = 1;

fn first_id() -> u64 {
    FIRST_ID
}

/// Pending reviews for one vocabulary, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewQueue {
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default)]
    entries: Vec<PendingReview>,
}

impl Default for ReviewQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewQueue {
    pub fn new() -> Self {
        Self {
            next_id: FIRST_ID,
            entries: Vec::new(),
        }
    }

    /// Queue a suggestion unless the variant is already waiting.
    ///
    /// Returns the entry that now represents `variant` and whether it was
    /// newly created.
    pub fn enqueue(
        &mut self,
        vocabulary: Vocabulary,
        variant: &str,
        suggested_canonical: &str,
        confidence: f64,
    ) -> (&PendingReview, bool) {
        if let Some(index) = self.position_of_variant(variant) {
            return (&self.entries[index], false);
        }
        let id = ReviewId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(PendingReview {
            id,
            vocabulary,
            variant: variant.to_string(),
            suggested_canonical: suggested_canonical.to_string(),
            confidence,
            queued_at: Utc::now(),
        });
        let last = self.entries.len() - 1;
        (&self.entries[last], true)
    }

    pub fn get(&self, id: ReviewId) -> Option<&PendingReview> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn find_variant(&self, variant: &str) -> Option<&PendingReview> {
        self.position_of_variant(variant).map(|i| &self.entries[i])
    }

    /// Remove and return an entry.
    pub fn remove(&mut self, id: ReviewId) -> Option<PendingReview> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Drop entries whose variant is already canonical or mapped.
    ///
    /// Happens when a crash lands between saving a resolution and saving
    /// the queue, or when a custom canonical form names another queued
    /// variant. Returns the dropped entries.
    pub fn prune_resolved(&mut self, record: &MappingRecord) -> Vec<PendingReview> {
        self.prune(|entry| {
            record.is_canonical(&entry.variant) || record.mapped(&entry.variant).is_some()
        })
    }

    /// Drop entries for which `is_resolved` holds. Ids are not reused.
    pub fn prune(
        &mut self,
        is_resolved: impl FnMut(&PendingReview) -> bool,
    ) -> Vec<PendingReview> {
        let (resolved, open): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(is_resolved);
        self.entries = open;
        resolved
    }

    pub fn entries(&self) -> &[PendingReview] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position_of_variant(&self, variant: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.variant == variant)
    }
}
