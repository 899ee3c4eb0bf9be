//! Batch normalization of JSON record sets.
//!
//! Records are JSON objects carrying any of the fields named by
//! [`Vocabulary::record_field`]. The input is either an array of records or
//! an object that is itself a record and/or holds arrays of records:
//!
//! ```json
//! { "tickets": [ { "company_name": "TaftElectric", "support_category": "billing" } ] }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};

use canon_model::{MatchStatus, Normalization, Result, Vocabulary};

use crate::session::Workspace;

/// Outcome counts for one vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub exact: usize,
    pub auto_matched: usize,
    pub pending_review: usize,
    pub new_entity: usize,
    pub placeholder: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: MatchStatus) {
        let slot = match status {
            MatchStatus::Exact => &mut self.exact,
            MatchStatus::AutoMatched => &mut self.auto_matched,
            MatchStatus::PendingReview => &mut self.pending_review,
            MatchStatus::NewEntity => &mut self.new_entity,
            MatchStatus::Placeholder => &mut self.placeholder,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.exact + self.auto_matched + self.pending_review + self.new_entity + self.placeholder
    }
}

/// What [`normalize_records`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    /// Records visited, including those without any normalized field.
    pub records: usize,
    /// Field rewrites per vocabulary. Repeats of a value count as they
    /// would on resubmission, so only the first occurrence of a value can be
    /// `auto_matched` or `new_entity`.
    pub vocabularies: BTreeMap<Vocabulary, StatusCounts>,
}

/// Rewrite every vocabulary field in `document` to its canonical form.
///
/// Each vocabulary is locked once and flushed once. Non-string field values
/// are left alone.
pub fn normalize_records(workspace: &Workspace, document: &mut Value) -> Result<RecordSummary> {
    let mut summary = RecordSummary::default();

    let mut candidates: BTreeMap<Vocabulary, Vec<String>> = BTreeMap::new();
    let mut seen: HashSet<(Vocabulary, String)> = HashSet::new();
    for_each_record(document, &mut |record| {
        summary.records += 1;
        for vocabulary in Vocabulary::ALL {
            if let Some(Value::String(value)) = record.get(vocabulary.record_field())
                && seen.insert((vocabulary, value.clone()))
            {
                candidates
                    .entry(vocabulary)
                    .or_default()
                    .push(value.clone());
            }
        }
    });

    let mut resolved: HashMap<(Vocabulary, String), Normalization> = HashMap::new();
    for (vocabulary, values) in candidates {
        let mut session = workspace.session(vocabulary)?;
        let outcomes = session.normalize_batch(values.iter().map(String::as_str))?;
        for (value, outcome) in values.into_iter().zip(outcomes) {
            resolved.insert((vocabulary, value), outcome);
        }
    }

    let mut counted: HashSet<(Vocabulary, String)> = HashSet::new();
    for_each_record(document, &mut |record| {
        for vocabulary in Vocabulary::ALL {
            let Some(Value::String(value)) = record.get_mut(vocabulary.record_field()) else {
                continue;
            };
            let key = (vocabulary, value.clone());
            if let Some(outcome) = resolved.get(&key) {
                let status = if counted.insert(key) {
                    outcome.status
                } else {
                    repeat_status(outcome.status)
                };
                summary
                    .vocabularies
                    .entry(vocabulary)
                    .or_default()
                    .add(status);
                value.clone_from(&outcome.canonical);
            }
        }
    });

    Ok(summary)
}

/// Status a value reports the second time it is seen in one batch.
fn repeat_status(first: MatchStatus) -> MatchStatus {
    match first {
        MatchStatus::AutoMatched | MatchStatus::NewEntity => MatchStatus::Exact,
        other => other,
    }
}

fn for_each_record(document: &mut Value, visit: &mut impl FnMut(&mut Map<String, Value>)) {
    match document {
        Value::Array(items) => {
            for item in items {
                if let Value::Object(record) = item {
                    visit(record);
                }
            }
        }
        Value::Object(root) => {
            visit(root);
            for value in root.values_mut() {
                if let Value::Array(items) = value {
                    for item in items {
                        if let Value::Object(record) = item {
                            visit(record);
                        }
                    }
                }
            }
        }
        _ => {}
    }
}
