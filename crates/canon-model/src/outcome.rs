use std::fmt;

use serde::{Deserialize, Serialize};

use crate::review::ReviewId;

/// How a candidate was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Already canonical, or a previously resolved variant.
    Exact,
    /// Scored at or above the auto threshold; mapping persisted.
    AutoMatched,
    /// Moderate score; interim suggestion queued for review.
    PendingReview,
    /// Low score or empty vocabulary; candidate minted as canonical.
    NewEntity,
    /// Candidate failed screening; vocabulary placeholder returned.
    Placeholder,
}

impl MatchStatus {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::AutoMatched => "auto-matched",
            Self::PendingReview => "pending review",
            Self::NewEntity => "new entity",
            Self::Placeholder => "placeholder",
        }
    }

    /// Whether this outcome wrote to the mapping record.
    #[must_use]
    pub const fn mutates_record(&self) -> bool {
        matches!(self, Self::AutoMatched | Self::NewEntity)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of normalizing one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub canonical: String,
    pub status: MatchStatus,
    /// Similarity score when fuzzy matching decided the outcome.
    pub score: Option<f64>,
    /// Queue entry backing a `PendingReview` outcome.
    pub review_id: Option<ReviewId>,
}

impl Normalization {
    pub fn exact(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            status: MatchStatus::Exact,
            score: None,
            review_id: None,
        }
    }

    pub fn placeholder(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            status: MatchStatus::Placeholder,
            score: None,
            review_id: None,
        }
    }
}
