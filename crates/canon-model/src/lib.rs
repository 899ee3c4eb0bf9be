//! Core types shared by the normalization crates.

pub mod error;
pub mod outcome;
pub mod queue;
pub mod record;
pub mod review;
pub mod vocabulary;

pub use error::{CanonError, Result};
pub use outcome::{MatchStatus, Normalization};
pub use queue::ReviewQueue;
pub use record::MappingRecord;
pub use review::{PendingReview, ReviewDecision, ReviewId};
pub use vocabulary::Vocabulary;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_in_store_layout() {
        let mut record = MappingRecord::new();
        record.add_canonical("Taft Electric Company");
        record
            .add_mapping("TaftElectric", "Taft Electric Company")
            .expect("canonical registered");

        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(
            json,
            serde_json::json!({
                "mappings": { "TaftElectric": "Taft Electric Company" },
                "standardized_entities": ["Taft Electric Company"]
            })
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&MatchStatus::AutoMatched).expect("serialize status");
        assert_eq!(json, "\"auto_matched\"");
    }
}
