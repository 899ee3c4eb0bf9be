use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info_span;

use canon_map::{ScoredForm, VocabularySummary, Workspace, normalize_records};
use canon_model::{CanonError, Normalization, PendingReview, ReviewId, Vocabulary};

use crate::cli::{NormalizeArgs, PendingArgs, RecordsArgs, ResolveArgs};
use crate::summary::{
    print_canonical_forms, print_check, print_normalizations, print_pending, print_record_summary,
    print_resolution,
};

pub fn run_normalize(workspace: &Workspace, args: &NormalizeArgs) -> Result<()> {
    let vocabulary = Vocabulary::from(args.vocabulary);
    let _span = info_span!("normalize", vocabulary = %vocabulary).entered();

    let mut session = workspace
        .session(vocabulary)
        .with_context(|| format!("open {vocabulary} vocabulary"))?;
    let outcomes = session
        .normalize_batch(args.candidates.iter().map(String::as_str))
        .with_context(|| format!("normalize {} values", args.candidates.len()))?;

    if args.json {
        let rows: Vec<serde_json::Value> = args
            .candidates
            .iter()
            .zip(&outcomes)
            .map(|(input, outcome)| serde_json::json!({ "input": input, "outcome": outcome }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let rows: Vec<(&str, &Normalization)> = args
            .candidates
            .iter()
            .map(String::as_str)
            .zip(&outcomes)
            .collect();
        print_normalizations(vocabulary, &rows);
    }
    Ok(())
}

pub fn run_records(workspace: &Workspace, args: &RecordsArgs) -> Result<()> {
    let _span = info_span!("records", input = %args.input.display()).entered();

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let mut document: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse {}", args.input.display()))?;

    let summary = normalize_records(workspace, &mut document).context("normalize records")?;
    let mut rendered = serde_json::to_string_pretty(&document)?;
    rendered.push('\n');

    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("write {}", path.display()))?;
            print_record_summary(&summary, false);
        }
        None => {
            io::stdout()
                .lock()
                .write_all(rendered.as_bytes())
                .context("write records to stdout")?;
            // stdout carries the records, so the table goes to stderr.
            print_record_summary(&summary, true);
        }
    }
    Ok(())
}

pub fn run_canonical(workspace: &Workspace, vocabulary: Vocabulary) -> Result<()> {
    let record = workspace
        .mappings(vocabulary)
        .with_context(|| format!("load {vocabulary} vocabulary"))?;
    print_canonical_forms(vocabulary, &record);
    Ok(())
}

pub fn run_pending(workspace: &Workspace, args: &PendingArgs) -> Result<()> {
    let vocabularies: Vec<Vocabulary> = match args.vocabulary {
        Some(arg) => vec![arg.into()],
        None => Vocabulary::ALL.to_vec(),
    };

    let mut rows: Vec<(PendingReview, Vec<ScoredForm>)> = Vec::new();
    for vocabulary in vocabularies {
        let session = workspace
            .session(vocabulary)
            .with_context(|| format!("open {vocabulary} vocabulary"))?;
        for review in session.pending_reviews() {
            let alternatives = if args.alternatives == 0 {
                Vec::new()
            } else {
                session
                    .suggestions(&review.variant, args.alternatives + 1)
                    .into_iter()
                    .filter(|form| form.canonical != review.suggested_canonical)
                    .take(args.alternatives)
                    .collect()
            };
            rows.push((review.clone(), alternatives));
        }
    }
    print_pending(&rows);
    Ok(())
}

pub fn run_resolve(workspace: &Workspace, args: &ResolveArgs) -> Result<()> {
    let vocabulary = Vocabulary::from(args.vocabulary);
    let id = ReviewId::new(args.id);
    let resolution = workspace
        .resolve_pending(vocabulary, id, args.action.clone().into())
        .with_context(|| format!("resolve {vocabulary} review {id}"))?;
    print_resolution(&resolution);
    Ok(())
}

pub fn run_mappings(workspace: &Workspace, vocabulary: Vocabulary) -> Result<()> {
    let record = workspace
        .mappings(vocabulary)
        .with_context(|| format!("load {vocabulary} vocabulary"))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Returns `false` if any store failed to load.
pub fn run_check(workspace: &Workspace) -> bool {
    let results: Vec<(Vocabulary, std::result::Result<VocabularySummary, CanonError>)> =
        Vocabulary::ALL
            .into_iter()
            .map(|vocabulary| (vocabulary, workspace.summary(vocabulary)))
            .collect();
    print_check(&results);
    results.iter().all(|(_, result)| result.is_ok())
}
