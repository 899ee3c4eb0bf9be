use std::collections::BTreeMap;

use canon_map::{ComparisonRule, MatchEngine, Normalizer, similarity};
use canon_model::{MappingRecord, MatchStatus, ReviewDecision, ReviewQueue, Vocabulary};
use proptest::prelude::*;
use proptest::sample::Index;

fn candidate_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z][A-Za-z ]{0,18}",
        Just("Billing Issues".to_string()),
        Just("billing issue".to_string()),
        Just("Bill Issue".to_string()),
        Just("Password Reset".to_string()),
        Just("unknown".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn similarity_is_symmetric_and_bounded(a in "[a-z ]{0,16}", b in "[a-z ]{0,16}") {
        let forward = similarity(&a, &b);
        prop_assert_eq!(forward, similarity(&b, &a));
        prop_assert!((0.0..=1.0).contains(&forward));
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn comparison_keys_are_idempotent(raw in "[A-Za-z., ]{0,24}") {
        for rule in [ComparisonRule::Basic, ComparisonRule::StripLegalSuffix] {
            let engine = MatchEngine::new(rule);
            let key = engine.key(&raw);
            prop_assert_eq!(engine.key(&key), key);
        }
    }

    #[test]
    fn resolved_candidates_are_stable(
        candidates in prop::collection::vec(candidate_strategy(), 1..24),
    ) {
        let normalizer = Normalizer::with_defaults(Vocabulary::Category)
            .unwrap_or_else(|e| panic!("default config: {e}"));
        let mut record = MappingRecord::new();
        let mut queue = ReviewQueue::new();

        let mut first = Vec::new();
        for candidate in &candidates {
            let outcome = normalizer
                .normalize(&mut record, &mut queue, candidate)
                .unwrap_or_else(|e| panic!("normalize failed: {e}"));
            first.push(outcome);
        }
        prop_assert!(record.dangling_mapping().is_none());

        for (candidate, before) in candidates.iter().zip(&first) {
            let snapshot = record.clone();
            let again = normalizer
                .normalize(&mut record, &mut queue, candidate)
                .unwrap_or_else(|e| panic!("normalize failed: {e}"));
            prop_assert_eq!(&again.canonical, &before.canonical);
            prop_assert_eq!(&record, &snapshot);
            match before.status {
                MatchStatus::PendingReview => {
                    prop_assert_eq!(again.status, MatchStatus::PendingReview);
                    prop_assert_eq!(again.review_id, before.review_id);
                }
                MatchStatus::Placeholder => {
                    prop_assert_eq!(again.status, MatchStatus::Placeholder);
                }
                _ => prop_assert_eq!(again.status, MatchStatus::Exact),
            }
        }
    }

    #[test]
    fn resolutions_keep_resolved_candidates_stable(
        candidates in prop::collection::vec(candidate_strategy(), 1..24),
        reviews in prop::collection::vec((0u8..3, any::<Index>(), any::<Index>()), 0..8),
    ) {
        let normalizer = Normalizer::with_defaults(Vocabulary::Category)
            .unwrap_or_else(|e| panic!("default config: {e}"));
        let mut record = MappingRecord::new();
        let mut queue = ReviewQueue::new();

        // Trimmed candidate -> canonical form it must keep resolving to.
        let mut resolved: BTreeMap<String, String> = BTreeMap::new();
        for candidate in &candidates {
            let outcome = normalizer
                .normalize(&mut record, &mut queue, candidate)
                .unwrap_or_else(|e| panic!("normalize failed: {e}"));
            if matches!(
                outcome.status,
                MatchStatus::Exact | MatchStatus::AutoMatched | MatchStatus::NewEntity
            ) {
                resolved.insert(candidate.trim().to_string(), outcome.canonical);
            }
        }

        for (kind, entry, name) in &reviews {
            if queue.is_empty() {
                break;
            }
            let review = queue.entries()[entry.index(queue.len())].clone();
            let decision = match kind {
                0 => ReviewDecision::AcceptSuggestion,
                1 => ReviewDecision::RejectAsNew,
                _ => ReviewDecision::AcceptCustom(candidates[name.index(candidates.len())].clone()),
            };
            let resolution = normalizer
                .resolve(&mut record, &mut queue, review.id, decision)
                .unwrap_or_else(|e| panic!("resolve failed: {e}"));
            resolved.insert(review.variant, resolution.canonical);
            prop_assert!(record.dangling_mapping().is_none());
        }

        for candidate in &candidates {
            let Some(expected) = resolved.get(candidate.trim()) else {
                continue;
            };
            let snapshot = record.clone();
            let again = normalizer
                .normalize(&mut record, &mut queue, candidate)
                .unwrap_or_else(|e| panic!("normalize failed: {e}"));
            prop_assert_eq!(again.status, MatchStatus::Exact);
            prop_assert_eq!(&again.canonical, expected);
            prop_assert_eq!(&record, &snapshot);
        }
    }
}
