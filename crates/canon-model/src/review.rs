//! Pending review entries and the decisions that resolve them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vocabulary::Vocabulary;

/// Identifier of a queued review, unique within one vocabulary's queue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReviewId(u64);

impl ReviewId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A moderate-confidence candidate waiting for a human decision.
///
/// Lives only in the review queue; the mapping record is untouched until
/// the entry is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReview {
    pub id: ReviewId,
    pub vocabulary: Vocabulary,
    /// Variant exactly as it will be keyed in `mappings`.
    pub variant: String,
    pub suggested_canonical: String,
    /// Similarity between variant and suggestion (0.0 to 1.0).
    pub confidence: f64,
    pub queued_at: DateTime<Utc>,
}

/// Operator decision for a pending review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Map the variant to the suggested canonical form.
    AcceptSuggestion,
    /// Map the variant to an operator-supplied canonical form, registering
    /// it if needed.
    AcceptCustom(String),
    /// Treat the variant as a new canonical form.
    RejectAsNew,
}

impl ReviewDecision {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AcceptSuggestion => "accept",
            Self::AcceptCustom(_) => "custom",
            Self::RejectAsNew => "new",
        }
    }
}
