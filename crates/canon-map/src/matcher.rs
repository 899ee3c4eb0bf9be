//! Similarity scoring between candidates and canonical forms.
//!
//! Uses the Indel sequence ratio (`2 * matched / total length`, the classic
//! diff ratio computed over the longest common subsequence) on comparison
//! keys. The ratio is symmetric, 1.0 for identical keys and 0.0 for keys
//! sharing no characters.

use std::cmp::Ordering;

use rapidfuzz::distance::indel;

use crate::compare::ComparisonRule;

/// Sequence ratio between two already-normalized keys.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.chars(), b.chars())
}

/// A canonical form with its score against some candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredForm {
    pub canonical: String,
    pub score: f64,
}

/// Stateless scorer parameterized by a comparison rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchEngine {
    rule: ComparisonRule,
}

impl MatchEngine {
    pub fn new(rule: ComparisonRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> ComparisonRule {
        self.rule
    }

    /// Comparison key for a raw string.
    pub fn key(&self, raw: &str) -> String {
        self.rule.key(raw)
    }

    /// Score `candidate` against a single canonical form.
    pub fn score(&self, candidate: &str, canonical: &str) -> f64 {
        similarity(&self.key(candidate), &self.key(canonical))
    }

    /// Best-scoring canonical form for `candidate`.
    ///
    /// Equal top scores resolve to the lexicographically smallest form.
    /// Returns `(None, 0.0)` when there are no forms.
    pub fn best_match<'a, I>(&self, candidate: &str, forms: I) -> (Option<&'a str>, f64)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let key = self.key(candidate);
        let mut best: Option<&'a str> = None;
        let mut best_score = 0.0;

        for form in forms {
            let score = similarity(&key, &self.key(form));
            let better = match best {
                None => true,
                Some(current) => {
                    score > best_score || (score == best_score && form < current)
                }
            };
            if better {
                best = Some(form);
                best_score = score;
            }
        }

        (best, best_score)
    }

    /// Top `limit` canonical forms, highest score first.
    ///
    /// Ordering is the same as [`Self::best_match`], so the first entry is
    /// always the best match.
    pub fn rank<'a, I>(&self, candidate: &str, forms: I, limit: usize) -> Vec<ScoredForm>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let key = self.key(candidate);
        let mut scored: Vec<ScoredForm> = forms
            .into_iter()
            .map(|form| ScoredForm {
                canonical: form.to_string(),
                score: similarity(&key, &self.key(form)),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.canonical.cmp(&b.canonical))
        });
        scored.truncate(limit);
        scored
    }
}
