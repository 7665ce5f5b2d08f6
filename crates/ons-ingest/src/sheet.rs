//! Sheet to DataFrame conversion.
//!
//! Release tables put a title block above the header, one or two header rows,
//! data rows, and a block of notes at the bottom. [`read_sheet`] cuts a sheet
//! into a header and a body with explicit row positions, in the same way for
//! every release.
//!
//! Column naming rules:
//! - header text is trimmed and inner whitespace collapsed;
//! - with several header rows, blank cells of the upper rows repeat the value
//!   to their left (merged cells), and levels are joined with
//!   [`LEVEL_SEPARATOR`];
//! - blank names become `Unnamed: <col>` (`Unnamed: <col>_level_<k>` per level);
//! - repeated names get a `.1`, `.2`, ... suffix.

use std::collections::HashMap;

use polars::prelude::*;

use crate::error::{IngestError, Result};
use crate::workbook::{Cell, Workbook};

/// Joins the header levels of one column.
pub const LEVEL_SEPARATOR: char = '\u{1f}';

/// Row positions used to cut a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReadOptions {
    /// Zero-based header row indices, top level first.
    pub header_rows: Vec<usize>,
    /// Number of trailing rows to drop.
    pub skip_footer: usize,
    /// Column holding row labels, if any.
    pub index_column: Option<usize>,
}

impl SheetReadOptions {
    pub fn new(header_rows: Vec<usize>) -> Self {
        Self {
            header_rows,
            skip_footer: 0,
            index_column: None,
        }
    }

    pub fn with_skip_footer(mut self, skip_footer: usize) -> Self {
        self.skip_footer = skip_footer;
        self
    }

    pub fn with_index_column(mut self, index_column: Option<usize>) -> Self {
        self.index_column = index_column;
        self
    }
}

/// Row labels read from the index column.
#[derive(Debug, Clone)]
pub struct SheetIndex {
    pub name: String,
    pub values: Vec<Cell>,
}

/// A sheet cut into header and body.
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub sheet: String,
    pub index: Option<SheetIndex>,
    /// Body cells as text columns; blank cells are null.
    pub data: DataFrame,
    /// Number of header levels.
    pub levels: usize,
}

/// Splits a column name into its header levels.
pub fn column_levels(name: &str) -> Vec<&str> {
    name.split(LEVEL_SEPARATOR).collect()
}

/// Reads `sheet` from `workbook` using `options`.
pub fn read_sheet(
    workbook: &mut dyn Workbook,
    sheet: &str,
    options: &SheetReadOptions,
) -> Result<SheetTable> {
    let grid = workbook.read_grid(sheet)?;
    let last_header = options
        .header_rows
        .iter()
        .copied()
        .max()
        .ok_or_else(|| IngestError::HeaderOutOfRange {
            sheet: sheet.to_string(),
            row: 0,
            available: grid.len(),
        })?;
    if last_header >= grid.len() {
        return Err(IngestError::HeaderOutOfRange {
            sheet: sheet.to_string(),
            row: last_header,
            available: grid.len(),
        });
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let levels = options.header_rows.len();
    let header: Vec<Vec<String>> = options
        .header_rows
        .iter()
        .map(|&row| {
            (0..width)
                .map(|col| {
                    grid[row]
                        .get(col)
                        .map(|cell| normalize_header(&cell.display()))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let body = body_rows(&grid, last_header + 1, options.skip_footer);

    let index = options.index_column.map(|col| SheetIndex {
        name: header
            .iter()
            .rev()
            .map(|level| level.get(col).cloned().unwrap_or_default())
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| "index".to_string()),
        values: body.iter().map(|row| cell_at(row, col)).collect(),
    });

    let data_cols: Vec<usize> = (0..width)
        .filter(|col| Some(*col) != options.index_column)
        .collect();
    let names = column_names(&header, &data_cols);

    let mut columns = Vec::with_capacity(data_cols.len());
    for (name, &col) in names.iter().zip(&data_cols) {
        let values: Vec<Option<String>> = body
            .iter()
            .map(|row| {
                let cell = cell_at(row, col);
                if cell.is_empty() {
                    None
                } else {
                    Some(cell.display())
                }
            })
            .collect();
        columns.push(Series::new(name.as_str().into(), values).into_column());
    }
    let data = DataFrame::new(columns)?;

    tracing::debug!(
        sheet,
        rows = data.height(),
        columns = data.width(),
        levels,
        "parsed sheet"
    );

    Ok(SheetTable {
        sheet: sheet.to_string(),
        index,
        data,
        levels,
    })
}

fn cell_at(row: &[Cell], col: usize) -> Cell {
    row.get(col).cloned().unwrap_or(Cell::Empty)
}

fn normalize_header(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rows after the header, minus trailing blanks and the footer block, with
/// fully blank rows dropped.
fn body_rows(grid: &[Vec<Cell>], start: usize, skip_footer: usize) -> Vec<&[Cell]> {
    let mut end = grid.len();
    while end > start && grid[end - 1].iter().all(Cell::is_empty) {
        end -= 1;
    }
    let end = end.saturating_sub(skip_footer).max(start);
    grid[start..end]
        .iter()
        .filter(|row| !row.iter().all(Cell::is_empty))
        .map(Vec::as_slice)
        .collect()
}

fn column_names(header: &[Vec<String>], data_cols: &[usize]) -> Vec<String> {
    let levels = header.len();
    let mut filled: Vec<Vec<String>> = header.to_vec();
    // Merged cells: upper levels carry their value to the right.
    for level in filled.iter_mut().take(levels.saturating_sub(1)) {
        let mut previous = String::new();
        for &col in data_cols {
            if level[col].is_empty() {
                level[col].clone_from(&previous);
            } else {
                previous.clone_from(&level[col]);
            }
        }
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    data_cols
        .iter()
        .map(|&col| {
            let parts: Vec<String> = filled
                .iter()
                .enumerate()
                .map(|(k, level)| {
                    if !level[col].is_empty() {
                        level[col].clone()
                    } else if levels > 1 {
                        format!("Unnamed: {col}_level_{k}")
                    } else {
                        format!("Unnamed: {col}")
                    }
                })
                .collect();
            let name = parts.join(&LEVEL_SEPARATOR.to_string());
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}
