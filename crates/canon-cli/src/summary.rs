use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use canon_map::{RecordSummary, Resolution, ScoredForm, StatusCounts, VocabularySummary};
use canon_model::{
    CanonError, MappingRecord, MatchStatus, Normalization, PendingReview, Vocabulary,
};

pub fn print_normalizations(vocabulary: Vocabulary, rows: &[(&str, &Normalization)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Canonical"),
        header_cell("Status"),
        header_cell("Score"),
        header_cell("Review"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for (input, outcome) in rows {
        table.add_row(vec![
            Cell::new(input),
            Cell::new(&outcome.canonical),
            status_cell(outcome.status),
            score_cell(outcome.score),
            match outcome.review_id {
                Some(id) => Cell::new(format!("#{id}")).fg(Color::Yellow),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("Vocabulary: {}", vocabulary.label());
    println!("{table}");
}

pub fn print_record_summary(summary: &RecordSummary, to_stderr: bool) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Vocabulary"),
        header_cell("Exact"),
        header_cell("Auto"),
        header_cell("Pending"),
        header_cell("New"),
        header_cell("Placeholder"),
        header_cell("Total"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut totals = StatusCounts::default();
    for (vocabulary, counts) in &summary.vocabularies {
        add_counts(&mut totals, counts);
        table.add_row(counts_row(vocabulary_cell(*vocabulary), counts));
    }
    table.add_row(counts_row(
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        &totals,
    ));

    if to_stderr {
        eprintln!("Records: {}", summary.records);
        eprintln!("{table}");
    } else {
        println!("Records: {}", summary.records);
        println!("{table}");
    }
}

pub fn print_canonical_forms(vocabulary: Vocabulary, record: &MappingRecord) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Canonical form"), header_cell("Variants")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for form in record.canonical_forms() {
        // Self-mappings are not variants.
        let variants = record
            .mappings
            .iter()
            .filter(|(variant, canonical)| canonical.as_str() == form && variant.as_str() != form)
            .count();
        table.add_row(vec![Cell::new(form), count_cell(variants)]);
    }
    println!(
        "{}: {} canonical forms, {} mappings",
        vocabulary.label(),
        record.canonical_count(),
        record.mapping_count()
    );
    println!("{table}");
}

pub fn print_pending(rows: &[(PendingReview, Vec<ScoredForm>)]) {
    if rows.is_empty() {
        println!("No pending reviews.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Vocabulary"),
        header_cell("ID"),
        header_cell("Variant"),
        header_cell("Suggestion"),
        header_cell("Score"),
        header_cell("Queued"),
        header_cell("Alternatives"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for (review, alternatives) in rows {
        let alternatives = if alternatives.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(
                alternatives
                    .iter()
                    .map(|form| format!("{} ({:.2})", form.canonical, form.score))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        };
        table.add_row(vec![
            vocabulary_cell(review.vocabulary),
            Cell::new(review.id).add_attribute(Attribute::Bold),
            Cell::new(&review.variant),
            Cell::new(&review.suggested_canonical),
            score_cell(Some(review.confidence)),
            dim_cell(review.queued_at.format("%Y-%m-%d %H:%M")),
            alternatives,
        ]);
    }
    println!("{table}");
}

pub fn print_resolution(resolution: &Resolution) {
    let created = if resolution.created {
        " (new canonical form)"
    } else {
        ""
    };
    println!(
        "Resolved {} review #{} ({}): '{}' -> '{}'{created}",
        resolution.review.vocabulary,
        resolution.review.id,
        resolution.decision.label(),
        resolution.review.variant,
        resolution.canonical,
    );
}

pub fn print_check(results: &[(Vocabulary, Result<VocabularySummary, CanonError>)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Vocabulary"),
        header_cell("Canonical"),
        header_cell("Mappings"),
        header_cell("Pending"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (vocabulary, result) in results {
        match result {
            Ok(summary) => table.add_row(vec![
                vocabulary_cell(*vocabulary),
                Cell::new(summary.canonical_forms),
                Cell::new(summary.mappings),
                count_cell(summary.pending_reviews),
                Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold),
            ]),
            Err(error) => table.add_row(vec![
                vocabulary_cell(*vocabulary),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(error).fg(Color::Red),
            ]),
        };
    }
    println!("{table}");
    for (vocabulary, result) in results {
        if let Err(error) = result
            && let Some(hint) = error.suggestion()
        {
            eprintln!("{vocabulary}: {hint}");
        }
    }
}

fn counts_row(label: Cell, counts: &StatusCounts) -> Vec<Cell> {
    vec![
        label,
        count_cell(counts.exact),
        count_cell(counts.auto_matched),
        count_cell(counts.pending_review),
        count_cell(counts.new_entity),
        count_cell(counts.placeholder),
        Cell::new(counts.total()).add_attribute(Attribute::Bold),
    ]
}

fn add_counts(totals: &mut StatusCounts, counts: &StatusCounts) {
    totals.exact += counts.exact;
    totals.auto_matched += counts.auto_matched;
    totals.pending_review += counts.pending_review;
    totals.new_entity += counts.new_entity;
    totals.placeholder += counts.placeholder;
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: MatchStatus) -> Cell {
    let cell = Cell::new(status.label());
    match status {
        MatchStatus::Exact => cell.fg(Color::Green),
        MatchStatus::AutoMatched => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        MatchStatus::PendingReview => cell.fg(Color::Yellow).add_attribute(Attribute::Bold),
        MatchStatus::NewEntity => cell.fg(Color::Blue),
        MatchStatus::Placeholder => cell.fg(Color::DarkGrey),
    }
}

fn score_cell(score: Option<f64>) -> Cell {
    match score {
        Some(value) => Cell::new(format!("{value:.3}")),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn vocabulary_cell(vocabulary: Vocabulary) -> Cell {
    Cell::new(vocabulary.id())
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
