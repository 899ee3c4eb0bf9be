//! Confidence-banded normalization of one vocabulary.
//!
//! The normalizer itself holds no state: it decides against a
//! [`MappingRecord`] and [`ReviewQueue`] passed in by the caller and mutates
//! them in [`Normalizer::apply`]. Persistence and locking live in
//! [`crate::session`].

use tracing::{debug, info};

use canon_model::{
    CanonError, MappingRecord, MatchStatus, Normalization, PendingReview, Result, ReviewDecision,
    ReviewId, ReviewQueue, Vocabulary,
};

use crate::config::{Band, Thresholds, VocabularyConfig};
use crate::matcher::{MatchEngine, ScoredForm};
use crate::screen::{Rejection, Screen};

/// What [`Normalizer::normalize`] will do with a candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Candidate failed screening.
    Placeholder {
        placeholder: String,
        reason: Rejection,
    },
    /// Already canonical or already mapped.
    Exact { canonical: String },
    /// Already waiting for review.
    Queued { review: PendingReview },
    AutoMatch {
        variant: String,
        canonical: String,
        score: f64,
    },
    Review {
        variant: String,
        suggestion: String,
        score: f64,
    },
    /// `best_score` is `None` when the vocabulary had no canonical forms.
    NewEntity {
        variant: String,
        best_score: Option<f64>,
    },
}

impl Decision {
    /// Status the decision resolves to.
    #[must_use]
    pub fn status(&self) -> MatchStatus {
        match self {
            Self::Placeholder { .. } => MatchStatus::Placeholder,
            Self::Exact { .. } => MatchStatus::Exact,
            Self::Queued { .. } | Self::Review { .. } => MatchStatus::PendingReview,
            Self::AutoMatch { .. } => MatchStatus::AutoMatched,
            Self::NewEntity { .. } => MatchStatus::NewEntity,
        }
    }
}

/// Outcome of resolving a pending review.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub review: PendingReview,
    pub decision: ReviewDecision,
    /// Canonical form the variant now maps to.
    pub canonical: String,
    /// Whether `canonical` was registered by this resolution.
    pub created: bool,
}

/// Decision algorithm for one vocabulary.
#[derive(Debug, Clone)]
pub struct Normalizer {
    vocabulary: Vocabulary,
    thresholds: Thresholds,
    engine: MatchEngine,
    screen: Screen,
}

impl Normalizer {
    /// Fails with [`CanonError::InvalidThresholdConfig`] on out-of-order
    /// thresholds and [`CanonError::InvalidPattern`] on bad screening rules.
    pub fn new(vocabulary: Vocabulary, config: &VocabularyConfig) -> Result<Self> {
        Ok(Self {
            vocabulary,
            thresholds: config.thresholds()?,
            engine: MatchEngine::new(config.comparison),
            screen: Screen::from_config(config)?,
        })
    }

    /// Normalizer with default configuration for `vocabulary`.
    pub fn with_defaults(vocabulary: Vocabulary) -> Result<Self> {
        Self::new(vocabulary, &VocabularyConfig::for_vocabulary(vocabulary))
    }

    pub fn vocabulary(&self) -> Vocabulary {
        self.vocabulary
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Decide the outcome for `candidate` without touching any state.
    pub fn decide(
        &self,
        record: &MappingRecord,
        queue: &ReviewQueue,
        candidate: &str,
    ) -> Decision {
        if let Some(reason) = self.screen.check(candidate) {
            return Decision::Placeholder {
                placeholder: self.screen.placeholder().to_string(),
                reason,
            };
        }

        let variant = candidate.trim();
        if let Some(canonical) = self.existing_canonical(record, variant) {
            return Decision::Exact {
                canonical: canonical.to_string(),
            };
        }
        if let Some(review) = queue.find_variant(variant) {
            return Decision::Queued {
                review: review.clone(),
            };
        }

        let (best, score) = self.engine.best_match(variant, record.canonical_forms());
        let Some(best) = best else {
            return Decision::NewEntity {
                variant: variant.to_string(),
                best_score: None,
            };
        };
        match self.thresholds.band(score) {
            Band::Auto => Decision::AutoMatch {
                variant: variant.to_string(),
                canonical: best.to_string(),
                score,
            },
            Band::Review => Decision::Review {
                variant: variant.to_string(),
                suggestion: best.to_string(),
                score,
            },
            Band::New => Decision::NewEntity {
                variant: variant.to_string(),
                best_score: Some(score),
            },
        }
    }

    /// Carry out a decision on the given record and queue.
    ///
    /// On error nothing has been changed.
    pub fn apply(
        &self,
        record: &mut MappingRecord,
        queue: &mut ReviewQueue,
        decision: Decision,
    ) -> Result<Normalization> {
        let outcome = match decision {
            Decision::Placeholder {
                placeholder,
                reason,
            } => {
                debug!(vocabulary = %self.vocabulary, %reason, "candidate screened out");
                Normalization::placeholder(placeholder)
            }
            Decision::Exact { canonical } => Normalization::exact(canonical),
            Decision::Queued { review } => Normalization {
                canonical: review.suggested_canonical,
                status: MatchStatus::PendingReview,
                score: Some(review.confidence),
                review_id: Some(review.id),
            },
            Decision::AutoMatch {
                variant,
                canonical,
                score,
            } => {
                record.add_mapping(&variant, &canonical)?;
                info!(
                    vocabulary = %self.vocabulary,
                    variant = %variant,
                    canonical = %canonical,
                    score,
                    "auto-matched variant"
                );
                Normalization {
                    canonical,
                    status: MatchStatus::AutoMatched,
                    score: Some(score),
                    review_id: None,
                }
            }
            Decision::Review {
                variant,
                suggestion,
                score,
            } => {
                let (entry, created) = queue.enqueue(self.vocabulary, &variant, &suggestion, score);
                if created {
                    debug!(
                        vocabulary = %self.vocabulary,
                        variant = %variant,
                        suggestion = %suggestion,
                        score,
                        review_id = %entry.id,
                        "queued for review"
                    );
                }
                Normalization {
                    canonical: entry.suggested_canonical.clone(),
                    status: MatchStatus::PendingReview,
                    score: Some(entry.confidence),
                    review_id: Some(entry.id),
                }
            }
            Decision::NewEntity {
                variant,
                best_score,
            } => {
                register_self_mapped(record, &variant)?;
                self.drop_stale(record, queue);
                info!(
                    vocabulary = %self.vocabulary,
                    canonical = %variant,
                    best_score = best_score.unwrap_or(0.0),
                    "registered new canonical form"
                );
                Normalization {
                    canonical: variant,
                    status: MatchStatus::NewEntity,
                    score: best_score,
                    review_id: None,
                }
            }
        };
        Ok(outcome)
    }

    /// Decide and apply in one step.
    pub fn normalize(
        &self,
        record: &mut MappingRecord,
        queue: &mut ReviewQueue,
        candidate: &str,
    ) -> Result<Normalization> {
        let decision = self.decide(record, queue, candidate);
        self.apply(record, queue, decision)
    }

    /// Commit an operator decision for a queued review and dequeue it.
    pub fn resolve(
        &self,
        record: &mut MappingRecord,
        queue: &mut ReviewQueue,
        id: ReviewId,
        decision: ReviewDecision,
    ) -> Result<Resolution> {
        let review = queue
            .get(id)
            .cloned()
            .ok_or(CanonError::UnknownReview {
                vocabulary: self.vocabulary,
                id,
            })?;

        // A variant resolved since it was queued keeps its mapping.
        if let Some(canonical) = self.existing_canonical(record, &review.variant) {
            let canonical = canonical.to_string();
            return Err(CanonError::StaleReview {
                vocabulary: self.vocabulary,
                id,
                variant: review.variant,
                canonical,
            });
        }

        let (canonical, created) = match &decision {
            ReviewDecision::AcceptSuggestion => {
                record.add_mapping(&review.variant, &review.suggested_canonical)?;
                (review.suggested_canonical.clone(), false)
            }
            ReviewDecision::AcceptCustom(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(CanonError::BlankCanonical);
                }
                let (canonical, created) = if let Some(existing) =
                    self.existing_canonical(record, name)
                {
                    (existing.to_string(), false)
                } else {
                    register_self_mapped(record, name)?;
                    (name.to_string(), true)
                };
                record.add_mapping(&review.variant, &canonical)?;
                (canonical, created)
            }
            ReviewDecision::RejectAsNew => {
                register_self_mapped(record, &review.variant)?;
                (review.variant.clone(), true)
            }
        };

        queue.remove(id);
        // A custom form may itself be a queued variant.
        self.drop_stale(record, queue);
        info!(
            vocabulary = %self.vocabulary,
            review_id = %id,
            variant = %review.variant,
            canonical = %canonical,
            decision = decision.label(),
            "resolved pending review"
        );
        Ok(Resolution {
            review,
            decision,
            canonical,
            created,
        })
    }

    /// Closest canonical forms for `candidate`, best first.
    pub fn suggestions(
        &self,
        record: &MappingRecord,
        candidate: &str,
        limit: usize,
    ) -> Vec<ScoredForm> {
        self.engine.rank(candidate.trim(), record.canonical_forms(), limit)
    }

    /// Remove queued reviews whose variant the record already resolves,
    /// exactly or by comparison key. Returns the removed entries.
    pub fn prune_stale(
        &self,
        record: &MappingRecord,
        queue: &mut ReviewQueue,
    ) -> Vec<PendingReview> {
        queue.prune(|entry| self.existing_canonical(record, &entry.variant).is_some())
    }

    fn drop_stale(&self, record: &MappingRecord, queue: &mut ReviewQueue) {
        for stale in self.prune_stale(record, queue) {
            debug!(
                vocabulary = %self.vocabulary,
                review_id = %stale.id,
                variant = %stale.variant,
                "dropped review resolved by another decision"
            );
        }
    }

    /// Canonical form `candidate` already resolves to, if any.
    ///
    /// Order: the form itself, its stored mapping, then a form with the same
    /// comparison key. Mapped variants win over key matches so a resolved
    /// variant always keeps its canonical form.
    fn existing_canonical<'r>(
        &self,
        record: &'r MappingRecord,
        candidate: &'r str,
    ) -> Option<&'r str> {
        if record.is_canonical(candidate) {
            return Some(candidate);
        }
        if let Some(canonical) = record.mapped(candidate) {
            return Some(canonical);
        }
        let key = self.engine.key(candidate);
        record
            .canonical_forms()
            .find(|form| self.engine.key(form) == key)
    }
}

/// Register `form` and map it to itself unless it already has a mapping.
fn register_self_mapped(record: &mut MappingRecord, form: &str) -> Result<()> {
    record.add_canonical(form);
    if record.mapped(form).is_none() {
        record.add_mapping(form, form)?;
    }
    Ok(())
}
