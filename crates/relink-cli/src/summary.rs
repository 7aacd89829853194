use std::path::PathBuf;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use relink_cli::types::{CollectionSummary, RunResult};

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input_dir.display());
    if result.dry_run {
        println!("Output: (dry run, nothing written)");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    println!("{}", summary_table(&result.collections));
    if !result.missing.is_empty() {
        eprintln!("Configured collections without input:");
        for name in &result.missing {
            eprintln!("- {name}");
        }
    }
    if !result.pass_through.is_empty() {
        eprintln!("Tables without a schema (not written):");
        for name in &result.pass_through {
            eprintln!("- {name}");
        }
    }
}

fn summary_table(collections: &[CollectionSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Collection"),
        header_cell("Input rows"),
        header_cell("Output rows"),
        header_cell("Slugs"),
        header_cell("Resolved"),
        header_cell("Fallbacks"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    for column in 1..=5 {
        align_column(&mut table, column, CellAlignment::Right);
    }

    let mut total_rows = 0usize;
    let mut total_resolved = 0usize;
    let mut total_fallbacks = 0usize;
    for summary in collections {
        total_rows += summary.output_rows;
        total_resolved += summary.stats.resolved;
        total_fallbacks += summary.stats.fallbacks;
        table.add_row(vec![
            Cell::new(&summary.collection).add_attribute(Attribute::Bold),
            Cell::new(summary.input_rows),
            Cell::new(summary.output_rows),
            Cell::new(summary.registry_entries),
            Cell::new(summary.stats.resolved),
            fallback_cell(summary.stats.fallbacks),
            output_cell(summary.output.as_ref()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("-").add_attribute(Attribute::Dim),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new("-").add_attribute(Attribute::Dim),
        Cell::new(total_resolved).add_attribute(Attribute::Bold),
        fallback_cell(total_fallbacks).add_attribute(Attribute::Bold),
        Cell::new("-").add_attribute(Attribute::Dim),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn fallback_cell(count: usize) -> Cell {
    let cell = Cell::new(count);
    if count > 0 {
        cell.fg(Color::Yellow)
    } else {
        cell
    }
}

fn output_cell(path: Option<&PathBuf>) -> Cell {
    match path.and_then(|p| p.file_name()).and_then(|n| n.to_str()) {
        Some(name) => Cell::new(name).fg(Color::Green),
        None => Cell::new("-").add_attribute(Attribute::Dim),
    }
}
