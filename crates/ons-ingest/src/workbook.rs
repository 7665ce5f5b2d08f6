//! Workbook access.
//!
//! Everything above this module sees a workbook as a set of named sheets,
//! each a rectangular-ish grid of [`Cell`]s anchored at `A1`. The `.xlsx`
//! implementation wraps `calamine`; [`MemoryWorkbook`] serves fixtures.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use chrono::{Days, NaiveDate};
use ons_common::format_numeric;

use crate::error::{IngestError, Result};

/// A raw spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

impl Cell {
    /// True for blank cells. Whitespace-only text is not blank.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Renders the cell the way it reads in a spreadsheet.
    ///
    /// Numbers drop trailing zeros and dates print as `YYYY-MM-DD`.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(value) => value.clone(),
            Self::Number(value) => format_numeric(*value),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

impl From<&str> for Cell {
    /// Builds a cell from fixture text: `""` is empty, numbers are numbers.
    fn from(value: &str) -> Self {
        if value.is_empty() {
            return Self::Empty;
        }
        match value.parse::<f64>() {
            Ok(number) if value.trim() == value => Self::Number(number),
            _ => Self::Text(value.to_string()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Converts an Excel serial day number (1900 date system) to a date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_days(Days::new(serial.floor() as u64))
}

/// A source of named sheets.
pub trait Workbook {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Reads a whole sheet. Row `0` is the first spreadsheet row and column
    /// `0` the first column, whatever the used range is.
    fn read_grid(&mut self, sheet: &str) -> Result<Vec<Vec<Cell>>>;
}

/// Opens workbooks for release files.
pub trait WorkbookLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn Workbook>>;
}

fn sheet_not_found(sheet: &str, names: &[String]) -> IngestError {
    IngestError::SheetNotFound {
        sheet: sheet.to_string(),
        available: names.join(", "),
    }
}

/// `.xlsx` workbook read through `calamine`.
pub struct XlsxWorkbook {
    path: PathBuf,
    inner: Sheets<BufReader<File>>,
}

impl XlsxWorkbook {
    pub fn open(path: &Path) -> Result<Self> {
        let inner = open_workbook_auto(path).map_err(|e| IngestError::WorkbookOpen {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn read_grid(&mut self, sheet: &str) -> Result<Vec<Vec<Cell>>> {
        let names = self.inner.sheet_names();
        if !names.iter().any(|name| name == sheet) {
            return Err(sheet_not_found(sheet, &names));
        }
        let range = self
            .inner
            .worksheet_range(sheet)
            .map_err(|e| IngestError::SheetRead {
                sheet: sheet.to_string(),
                message: e.to_string(),
            })?;

        // The used range may start below/right of A1; pad so indices stay absolute.
        let (first_row, first_col) = range.start().unwrap_or((0, 0));
        let mut grid: Vec<Vec<Cell>> = vec![Vec::new(); first_row as usize];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; first_col as usize];
            cells.extend(row.iter().map(convert_cell));
            grid.push(cells);
        }
        tracing::debug!(
            path = %self.path.display(),
            sheet,
            rows = grid.len(),
            "read worksheet"
        );
        Ok(grid)
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(value) => Cell::Text(value.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => excel_serial_to_date(value.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Empty),
        Data::DateTimeIso(value) => value
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            .map_or_else(|| Cell::Text(value.clone()), Cell::Date),
        Data::DurationIso(value) => Cell::Text(value.clone()),
    }
}

/// Opens release files as `.xlsx` workbooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxLoader;

impl WorkbookLoader for XlsxLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn Workbook>> {
        Ok(Box::new(XlsxWorkbook::open(path)?))
    }
}

/// In-memory workbook.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a sheet.
    pub fn with_sheet(mut self, name: impl Into<String>, grid: Vec<Vec<Cell>>) -> Self {
        let name = name.into();
        self.sheets.retain(|(existing, _)| *existing != name);
        self.sheets.push((name, grid));
        self
    }

    /// Adds a sheet from text rows, converting each value with `Cell::from`.
    pub fn with_text_sheet(self, name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let grid = rows
            .iter()
            .map(|row| row.iter().map(|value| Cell::from(*value)).collect())
            .collect();
        self.with_sheet(name, grid)
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_grid(&mut self, sheet: &str) -> Result<Vec<Vec<Cell>>> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| sheet_not_found(sheet, &self.sheet_names()))
    }
}

/// Serves [`MemoryWorkbook`]s keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    workbooks: HashMap<String, MemoryWorkbook>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbook(mut self, file_name: impl Into<String>, workbook: MemoryWorkbook) -> Self {
        self.workbooks.insert(file_name.into(), workbook);
        self
    }
}

impl WorkbookLoader for MemoryLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn Workbook>> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        self.workbooks
            .get(file_name)
            .cloned()
            .map(|workbook| Box::new(workbook) as Box<dyn Workbook>)
            .ok_or_else(|| IngestError::WorkbookOpen {
                path: path.to_path_buf(),
                message: "no in-memory workbook registered".to_string(),
            })
    }
}
