//! Cell normalization.
//!
//! Release tables mark suppressed or unavailable figures with short tokens
//! and repeat some header blocks. [`clean_frame`] drops the repeated columns,
//! turns the tokens into nulls and makes every fully numeric column `Float64`.

use ons_common::parse_f64;
use polars::prelude::*;

use crate::error::Result;

/// Marker appended to repeated header names by the sheet reader.
pub const DUPLICATE_MARKER: &str = ".1";

/// Cell values that stand for a missing figure.
pub const SENTINEL_TOKENS: [&str; 6] = ["x", " ", ":", "u", "<3", "<NA>"];

/// True when `value` is exactly one of [`SENTINEL_TOKENS`].
pub fn is_sentinel(value: &str) -> bool {
    SENTINEL_TOKENS.contains(&value)
}

/// True when the column name carries the duplicate marker.
pub fn is_duplicate_column(name: &str) -> bool {
    name.contains(DUPLICATE_MARKER)
}

/// Cleans a freshly read sheet body.
///
/// Columns that still hold text after sentinel removal are kept as `String`.
pub fn clean_frame(df: &DataFrame) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        if is_duplicate_column(column.name().as_str()) {
            tracing::debug!(column = %column.name(), "dropping repeated column");
            continue;
        }
        columns.push(clean_column(column)?);
    }
    Ok(DataFrame::new(columns)?)
}

fn clean_column(column: &Column) -> Result<Column> {
    let name = column.name().clone();
    let text = column.cast(&DataType::String)?;
    let values: Vec<Option<String>> = text
        .str()?
        .iter()
        .map(|value| {
            value
                .filter(|value| !is_sentinel(value))
                .map(str::to_string)
        })
        .collect();

    let numeric: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|value| match value {
            None => Some(None),
            Some(text) => parse_f64(text).map(Some),
        })
        .collect();

    Ok(match numeric {
        Some(numbers) => Series::new(name, numbers).into_column(),
        None => Series::new(name, values).into_column(),
    })
}
