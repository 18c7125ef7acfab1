use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use cadvault_index::IndexStats;
use cadvault_model::{DocumentType, ItemStatus};
use cadvault_resolve::{ItemReport, SkippedRow, TestReport};

pub fn print_index_stats(root: &Path, revision_rule: &str, stats: &IndexStats) {
    println!("Library: {}", root.display());
    println!("Revision rule: {revision_rule}");
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        ("Files", stats.files),
        ("Base tokens", stats.base_tokens),
        ("Parts", stats.parts),
        ("Assemblies", stats.assemblies),
        ("Drawings", stats.drawings),
        ("Suffix tagged", stats.tagged),
        ("With revision", stats.with_revision),
    ];
    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), count_cell(count, Color::Green)]);
    }
    println!("{table}");
}

/// Per-item status table followed by totals.
///
/// `styled` is false when the report goes to a file.
pub fn render_test_report(report: &TestReport, styled: bool) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Item"),
        header_cell("Status"),
        header_cell("Part"),
        header_cell("Assembly"),
        header_cell("Drawing"),
    ]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for doc_column in 2..5 {
        align_column(&mut table, doc_column, CellAlignment::Center);
    }
    for item in &report.items {
        let mut row = vec![item_cell(&item.item), status_cell(item.status)];
        row.extend(DocumentType::ALL.into_iter().map(|doc| document_cell(item, doc)));
        table.add_row(row);
    }

    let totals = &report.totals;
    let mut totals_table = Table::new();
    totals_table.set_header(vec![
        header_cell("Items"),
        header_cell("Resolved"),
        header_cell("Ambiguous"),
        header_cell("Missing"),
        header_cell("Skipped"),
        header_cell("Files"),
    ]);
    apply_table_style(&mut totals_table);
    for column in 0..6 {
        align_column(&mut totals_table, column, CellAlignment::Right);
    }
    totals_table.add_row(vec![
        Cell::new(totals.items).add_attribute(Attribute::Bold),
        count_cell(totals.resolved, Color::Green),
        count_cell(totals.ambiguous, Color::Yellow),
        count_cell(totals.missing, Color::Red),
        count_cell(totals.skipped, Color::Yellow),
        Cell::new(totals.files),
    ]);

    if !styled {
        table.force_no_tty();
        totals_table.force_no_tty();
    }
    format!("{table}\n{totals_table}\n")
}

pub fn print_skipped(skipped: &[SkippedRow]) {
    if skipped.is_empty() {
        return;
    }
    eprintln!("Skipped rows:");
    for row in skipped {
        eprintln!("- row {}: {:?} ({})", row.row, row.item, row.reason);
    }
}

fn document_cell(item: &ItemReport, doc: DocumentType) -> Cell {
    if item.matched.contains(&doc) {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else if item.ambiguous.contains(&doc) {
        Cell::new("?").fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else if item.missing.contains(&doc) {
        Cell::new("✗").fg(Color::Red)
    } else {
        dim_cell("-")
    }
}

fn status_cell(status: ItemStatus) -> Cell {
    match status {
        ItemStatus::Resolved => Cell::new("OK").fg(Color::Green),
        ItemStatus::Ambiguous => Cell::new("AMBIGUOUS")
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
        ItemStatus::Missing => Cell::new("MISSING")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn item_cell(item: &str) -> Cell {
    Cell::new(item)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
