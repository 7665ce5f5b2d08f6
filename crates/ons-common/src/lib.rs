//! Shared utilities for the ONS mortality workspace.
//!
//! This crate provides the Polars value helpers used by the ingestion and
//! transformation crates when reading spreadsheet cells out of DataFrames.

pub mod polars;

pub use polars::{any_to_string, any_to_string_non_empty, format_numeric, parse_f64};
