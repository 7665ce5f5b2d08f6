use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use ons_common::format_numeric;

use crate::types::{CorpusSummary, GroupTotal, ReleaseRow, VerifyReport};

pub fn print_releases(releases: &[ReleaseRow]) {
    println!("{}", releases_table(releases));
}

pub fn releases_table(releases: &[ReleaseRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("File"), header_cell("Version")]);
    apply_table_style(&mut table);
    for release in releases {
        table.add_row(vec![
            Cell::new(&release.file_name),
            Cell::new(&release.version).fg(Color::Blue),
        ]);
    }
    if releases.is_empty() {
        table.add_row(vec![dim_cell("no release workbooks"), dim_cell("-")]);
    }
    table
}

pub fn print_corpus_summary(summary: &CorpusSummary) {
    println!("Corpus: {}", summary.corpus_file);
    println!("Releases: {}", summary.releases.join(", "));
    println!("{}", corpus_table(summary));
}

pub fn corpus_table(summary: &CorpusSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dimension"),
        header_cell("Labels"),
        header_cell("First"),
        header_cell("Last"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for dim in &summary.dims {
        table.add_row(vec![
            Cell::new(&dim.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(dim.labels),
            optional_cell(dim.first.as_deref()),
            optional_cell(dim.last.as_deref()),
        ]);
    }
    table.add_row(vec![
        Cell::new("CELLS")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.cells).add_attribute(Attribute::Bold),
        Cell::new(format!("{} with values", summary.valid_cells)),
        dim_cell("-"),
    ]);
    table
}

pub fn print_group_totals(totals: &[GroupTotal]) {
    println!("{}", group_table(totals));
}

pub fn group_table(totals: &[GroupTotal]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Variable"),
        header_cell("Total"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for total in totals {
        table.add_row(vec![
            Cell::new(&total.group),
            optional_cell(total.variable.as_deref()),
            Cell::new(format_numeric(total.total)),
        ]);
    }
    table
}

pub fn print_verify_report(report: &VerifyReport) {
    println!("Corpus: {}", report.corpus_file);
    println!("{}", verify_table(report));
    if !report.current {
        println!("Sources differ from the corpus; rebuild with `build --force`.");
    }
}

pub fn verify_table(report: &VerifyReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("File"), header_cell("Status")]);
    apply_table_style(&mut table);
    let groups = [
        (&report.unchanged, "unchanged", Color::Green),
        (&report.changed, "changed", Color::Yellow),
        (&report.added, "added", Color::Yellow),
        (&report.removed, "removed", Color::Red),
    ];
    for (files, status, color) in groups {
        for file in files {
            table.add_row(vec![Cell::new(file), Cell::new(status).fg(color)]);
        }
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
