//! Release ingestion for ONS deaths-by-vaccination-status workbooks.
//!
//! # Features
//!
//! - **Discovery**: find release workbooks and parse their version numbers
//! - **Workbooks**: read sheets as cell grids (`calamine`, or in memory)
//! - **Sheets**: cut a grid into header levels, body and row index
//! - **Normalization**: drop repeated columns, null out suppression tokens and
//!   coerce numeric columns
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ons_ingest::{SheetReadOptions, XlsxWorkbook, clean_frame, list_release_files, read_sheet};
//!
//! let releases = list_release_files(Path::new("data"))?;
//! let mut workbook = XlsxWorkbook::open(&releases[0].path)?;
//! let options = SheetReadOptions::new(vec![3, 4]).with_skip_footer(11).with_index_column(Some(0));
//! let table = read_sheet(&mut workbook, "Table 4", &options)?;
//! let cleaned = clean_frame(&table.data)?;
//! ```

mod discovery;
mod error;
mod normalizer;
mod sheet;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{ReleaseFile, list_release_files, parse_version};

// === Workbooks ===
pub use workbook::{
    Cell, MemoryLoader, MemoryWorkbook, Workbook, WorkbookLoader, XlsxLoader, XlsxWorkbook,
    excel_serial_to_date,
};

// === Sheet Reading ===
pub use sheet::{
    LEVEL_SEPARATOR, SheetIndex, SheetReadOptions, SheetTable, column_levels, read_sheet,
};

// === Normalization ===
pub use normalizer::{
    DUPLICATE_MARKER, SENTINEL_TOKENS, clean_frame, is_duplicate_column, is_sentinel,
};
