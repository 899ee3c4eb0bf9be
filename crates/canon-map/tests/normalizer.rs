use canon_map::{Normalizer, VocabularyConfig};
use canon_model::{
    CanonError, MappingRecord, MatchStatus, ReviewDecision, ReviewId, ReviewQueue, Vocabulary,
};

const TAFT: &str = "Taft Electric Company";

fn company() -> Normalizer {
    Normalizer::with_defaults(Vocabulary::Company).expect("default config is valid")
}

fn taft_record() -> MappingRecord {
    let mut record = MappingRecord::new();
    record.add_canonical(TAFT);
    record
}

fn company_with_thresholds(auto: f64, suggest: f64) -> Normalizer {
    let mut config = VocabularyConfig::for_vocabulary(Vocabulary::Company);
    config.auto_threshold = auto;
    config.suggest_threshold = suggest;
    Normalizer::new(Vocabulary::Company, &config).expect("valid thresholds")
}

#[test]
fn close_variant_is_auto_matched_and_mapped() {
    let normalizer = company();
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();

    let outcome = normalizer
        .normalize(&mut record, &mut queue, "TaftElectric")
        .unwrap();
    assert_eq!(outcome.canonical, TAFT);
    assert_eq!(outcome.status, MatchStatus::AutoMatched);
    assert!(outcome.score.unwrap() >= 0.8);
    assert_eq!(record.mapped("TaftElectric"), Some(TAFT));
    assert!(queue.is_empty());
}

#[test]
fn moderate_variant_is_queued_and_record_unchanged() {
    let normalizer = company();
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();
    let before = record.clone();

    let outcome = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Services")
        .unwrap();
    assert_eq!(outcome.canonical, TAFT);
    assert_eq!(outcome.status, MatchStatus::PendingReview);
    let score = outcome.score.unwrap();
    assert!((0.6..0.8).contains(&score), "score {score}");
    assert_eq!(record, before);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.entries()[0].variant, "Taft Electrical Services");
    assert_eq!(queue.entries()[0].suggested_canonical, TAFT);
}

#[test]
fn empty_vocabulary_mints_new_entity() {
    let normalizer = company();
    let mut record = MappingRecord::new();
    let mut queue = ReviewQueue::new();

    let outcome = normalizer
        .normalize(&mut record, &mut queue, "Acme Corp")
        .unwrap();
    assert_eq!(outcome.canonical, "Acme Corp");
    assert_eq!(outcome.status, MatchStatus::NewEntity);
    assert_eq!(outcome.score, None);
    assert!(record.is_canonical("Acme Corp"));
    assert_eq!(record.mapped("Acme Corp"), Some("Acme Corp"));
}

#[test]
fn dissimilar_candidate_is_new_entity() {
    let normalizer = company();
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();

    let outcome = normalizer
        .normalize(&mut record, &mut queue, "Acme Corp")
        .unwrap();
    assert_eq!(outcome.status, MatchStatus::NewEntity);
    assert!(outcome.score.unwrap() < 0.6);
    assert_eq!(record.canonical_count(), 2);
}

#[test]
fn new_entity_creation_is_idempotent() {
    let normalizer = company();
    let mut record = MappingRecord::new();
    let mut queue = ReviewQueue::new();

    normalizer
        .normalize(&mut record, &mut queue, "Acme Corp")
        .unwrap();
    let snapshot = record.clone();
    let again = normalizer
        .normalize(&mut record, &mut queue, "Acme Corp")
        .unwrap();
    assert_eq!(again.canonical, "Acme Corp");
    assert_eq!(again.status, MatchStatus::Exact);
    assert_eq!(record, snapshot);
}

#[test]
fn mapped_variant_is_stable() {
    let normalizer = company();
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();

    normalizer
        .normalize(&mut record, &mut queue, "TaftElectric")
        .unwrap();
    for _ in 0..3 {
        let outcome = normalizer
            .normalize(&mut record, &mut queue, "TaftElectric")
            .unwrap();
        assert_eq!(outcome.canonical, TAFT);
        assert_eq!(outcome.status, MatchStatus::Exact);
    }
    assert_eq!(record.mapping_count(), 1);
}

#[test]
fn comparison_key_match_is_exact_without_mutation() {
    let normalizer = company();
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();

    let outcome = normalizer
        .normalize(&mut record, &mut queue, "TAFT  ELECTRIC CO.")
        .unwrap();
    assert_eq!(outcome.canonical, TAFT);
    assert_eq!(outcome.status, MatchStatus::Exact);
    assert_eq!(record.mapping_count(), 0);
}

#[test]
fn resubmitting_queued_variant_returns_same_entry() {
    let normalizer = company();
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();

    let first = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Services")
        .unwrap();
    let second = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Services")
        .unwrap();
    assert_eq!(second.status, MatchStatus::PendingReview);
    assert_eq!(second.canonical, first.canonical);
    assert_eq!(second.score, first.score);
    assert_eq!(second.review_id, first.review_id);
    assert_eq!(queue.len(), 1);
}

#[test]
fn auto_threshold_is_inclusive() {
    let scorer = company();
    let score = scorer.engine().score("Taft Electrical Services", TAFT);

    let normalizer = company_with_thresholds(score, score / 2.0);
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();
    let outcome = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Services")
        .unwrap();
    assert_eq!(outcome.status, MatchStatus::AutoMatched);
}

#[test]
fn suggest_threshold_is_inclusive_and_auto_exclusive_below() {
    let scorer = company();
    let score = scorer.engine().score("Taft Electrical Services", TAFT);

    let normalizer = company_with_thresholds((score + 0.1).min(1.0), score);
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();
    let outcome = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Services")
        .unwrap();
    assert_eq!(outcome.status, MatchStatus::PendingReview);
}

#[test]
fn just_below_suggest_threshold_is_new_entity() {
    let scorer = company();
    let score = scorer.engine().score("Taft Electrical Services", TAFT);

    let normalizer = company_with_thresholds((score + 0.1).min(1.0), score + 1e-9);
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();
    let outcome = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Services")
        .unwrap();
    assert_eq!(outcome.status, MatchStatus::NewEntity);
}

#[test]
fn invalid_thresholds_fail_construction() {
    let mut config = VocabularyConfig::for_vocabulary(Vocabulary::Category);
    config.auto_threshold = 0.6;
    config.suggest_threshold = 0.8;
    let err = Normalizer::new(Vocabulary::Category, &config).unwrap_err();
    assert!(matches!(
        err,
        CanonError::InvalidThresholdConfig {
            auto, suggest
        } if auto == 0.6 && suggest == 0.8
    ));
}

#[test]
fn screened_candidate_returns_placeholder() {
    let normalizer = company();
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();
    let before = record.clone();

    for raw in ["", "N/A", "12345", "The vendor sent a wrong invoice"] {
        let outcome = normalizer.normalize(&mut record, &mut queue, raw).unwrap();
        assert_eq!(outcome.status, MatchStatus::Placeholder, "{raw:?}");
        assert_eq!(outcome.canonical, "Unknown Company");
    }
    assert_eq!(record, before);
    assert!(queue.is_empty());
}

fn queued() -> (Normalizer, MappingRecord, ReviewQueue, ReviewId) {
    let normalizer = company();
    let mut record = taft_record();
    let mut queue = ReviewQueue::new();
    let outcome = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Services")
        .unwrap();
    let id = outcome.review_id.expect("queued");
    (normalizer, record, queue, id)
}

#[test]
fn accepting_suggestion_maps_variant_and_dequeues() {
    let (normalizer, mut record, mut queue, id) = queued();

    let resolution = normalizer
        .resolve(&mut record, &mut queue, id, ReviewDecision::AcceptSuggestion)
        .unwrap();
    assert_eq!(resolution.canonical, TAFT);
    assert!(!resolution.created);
    assert_eq!(record.mapped("Taft Electrical Services"), Some(TAFT));
    assert!(queue.is_empty());

    let outcome = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Services")
        .unwrap();
    assert_eq!(outcome.status, MatchStatus::Exact);
}

#[test]
fn custom_canonical_is_created_when_missing() {
    let (normalizer, mut record, mut queue, id) = queued();

    let resolution = normalizer
        .resolve(
            &mut record,
            &mut queue,
            id,
            ReviewDecision::AcceptCustom("Taft Services Group".to_string()),
        )
        .unwrap();
    assert!(resolution.created);
    assert!(record.is_canonical("Taft Services Group"));
    assert_eq!(
        record.mapped("Taft Electrical Services"),
        Some("Taft Services Group")
    );
    assert!(record.dangling_mapping().is_none());
}

#[test]
fn custom_canonical_reuses_form_with_same_key() {
    let (normalizer, mut record, mut queue, id) = queued();

    let resolution = normalizer
        .resolve(
            &mut record,
            &mut queue,
            id,
            ReviewDecision::AcceptCustom("taft electric co".to_string()),
        )
        .unwrap();
    assert_eq!(resolution.canonical, TAFT);
    assert!(!resolution.created);
    assert_eq!(record.canonical_count(), 1);
}

#[test]
fn rejecting_makes_variant_canonical() {
    let (normalizer, mut record, mut queue, id) = queued();

    let resolution = normalizer
        .resolve(&mut record, &mut queue, id, ReviewDecision::RejectAsNew)
        .unwrap();
    assert!(resolution.created);
    assert!(record.is_canonical("Taft Electrical Services"));
    assert_eq!(
        record.mapped("Taft Electrical Services"),
        Some("Taft Electrical Services")
    );
    assert!(queue.is_empty());
}

#[test]
fn unknown_review_id_is_an_error() {
    let (normalizer, mut record, mut queue, _) = queued();
    let err = normalizer
        .resolve(
            &mut record,
            &mut queue,
            ReviewId::new(99),
            ReviewDecision::AcceptSuggestion,
        )
        .unwrap_err();
    assert!(matches!(err, CanonError::UnknownReview { .. }));
    assert_eq!(queue.len(), 1);
}

#[test]
fn blank_custom_canonical_is_rejected_and_queue_kept() {
    let (normalizer, mut record, mut queue, id) = queued();
    let before = record.clone();
    let err = normalizer
        .resolve(
            &mut record,
            &mut queue,
            id,
            ReviewDecision::AcceptCustom("   ".to_string()),
        )
        .unwrap_err();
    assert!(matches!(err, CanonError::BlankCanonical));
    assert_eq!(record, before);
    assert_eq!(queue.len(), 1);
}

#[test]
fn custom_canonical_naming_mapped_variant_keeps_its_mapping() {
    let (normalizer, mut record, mut queue, id) = queued();
    let auto = normalizer
        .normalize(&mut record, &mut queue, "TaftElectric")
        .unwrap();
    assert_eq!(auto.status, MatchStatus::AutoMatched);

    let resolution = normalizer
        .resolve(
            &mut record,
            &mut queue,
            id,
            ReviewDecision::AcceptCustom("TaftElectric".to_string()),
        )
        .unwrap();
    assert_eq!(resolution.canonical, TAFT);
    assert!(!resolution.created);
    assert!(!record.is_canonical("TaftElectric"));
    assert_eq!(record.mapped("TaftElectric"), Some(TAFT));
    assert_eq!(record.mapped("Taft Electrical Services"), Some(TAFT));

    let again = normalizer
        .normalize(&mut record, &mut queue, "TaftElectric")
        .unwrap();
    assert_eq!(again.status, MatchStatus::Exact);
    assert_eq!(again.canonical, TAFT);
}

#[test]
fn custom_canonical_naming_queued_variant_drops_its_review() {
    let (normalizer, mut record, mut queue, id) = queued();
    let other = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Supply")
        .unwrap();
    assert_eq!(other.status, MatchStatus::PendingReview);
    assert_eq!(queue.len(), 2);

    let resolution = normalizer
        .resolve(
            &mut record,
            &mut queue,
            id,
            ReviewDecision::AcceptCustom("Taft Electrical Supply".to_string()),
        )
        .unwrap();
    assert!(resolution.created);
    assert!(queue.is_empty());
    assert_eq!(
        record.mapped("Taft Electrical Supply"),
        Some("Taft Electrical Supply")
    );

    let again = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Supply")
        .unwrap();
    assert_eq!(again.status, MatchStatus::Exact);
    assert_eq!(again.canonical, "Taft Electrical Supply");
}

#[test]
fn custom_canonical_with_same_key_as_queued_variant_drops_its_review() {
    let (normalizer, mut record, mut queue, id) = queued();
    normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Supply")
        .unwrap();

    normalizer
        .resolve(
            &mut record,
            &mut queue,
            id,
            ReviewDecision::AcceptCustom("taft  electrical supply".to_string()),
        )
        .unwrap();
    assert!(queue.is_empty());

    let again = normalizer
        .normalize(&mut record, &mut queue, "Taft Electrical Supply")
        .unwrap();
    assert_eq!(again.status, MatchStatus::Exact);
    assert_eq!(again.canonical, "taft  electrical supply");
}

#[test]
fn review_of_already_mapped_variant_is_stale() {
    let (normalizer, mut record, mut queue, id) = queued();
    record
        .add_mapping("Taft Electrical Services", TAFT)
        .unwrap();
    let before = record.clone();

    for decision in [
        ReviewDecision::RejectAsNew,
        ReviewDecision::AcceptCustom("Taft Services Group".to_string()),
    ] {
        let err = normalizer
            .resolve(&mut record, &mut queue, id, decision)
            .unwrap_err();
        assert!(
            matches!(&err, CanonError::StaleReview { canonical, .. } if canonical == TAFT),
            "{err}"
        );
    }
    assert_eq!(record, before);
    assert_eq!(queue.len(), 1);
}

#[test]
fn suggestions_rank_closest_forms_first() {
    let normalizer = Normalizer::with_defaults(Vocabulary::Category).unwrap();
    let mut record = MappingRecord::new();
    for form in ["Billing Issues", "Login Problem", "Password Reset"] {
        record.add_canonical(form);
    }
    let ranked = normalizer.suggestions(&record, "Bill Issue", 2);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].canonical, "Billing Issues");
    assert!(ranked[0].score > ranked[1].score);
}
