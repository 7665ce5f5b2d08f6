//! Observations and frame access shared by the extraction strategies.

use chrono::NaiveDate;
use ons_common::{any_to_string_non_empty, parse_f64};
use ons_ingest::column_levels;
use ons_model::{CANONICAL_DIMS, Coord, LabeledArray};
use polars::prelude::*;

use crate::error::{Result, TransformError};

/// One non-missing cell of a release, in canonical coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub death: String,
    pub vax_status: String,
    pub age_group: String,
    pub variable: String,
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    fn into_record(self) -> (Vec<Coord>, f64) {
        (
            vec![
                Coord::from(self.death),
                Coord::from(self.vax_status),
                Coord::from(self.age_group),
                Coord::from(self.variable),
                Coord::from(self.date),
            ],
            self.value,
        )
    }
}

/// Builds the canonical array (`death, vax_status, age_group, variable, date`).
pub fn observations_to_array(observations: Vec<Observation>) -> Result<LabeledArray> {
    let records = observations.into_iter().map(Observation::into_record);
    Ok(LabeledArray::from_records(&CANONICAL_DIMS, records)?)
}

/// Looks up a column the layout requires.
pub(crate) fn require_column<'a>(df: &'a DataFrame, sheet: &str, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| TransformError::MissingColumn {
        sheet: sheet.to_string(),
        column: name.to_string(),
    })
}

/// Trimmed text of a cell, `None` when blank.
pub(crate) fn text_at(column: &Column, idx: usize) -> Option<String> {
    any_to_string_non_empty(column.get(idx).unwrap_or(AnyValue::Null))
}

/// Columns holding figures, excluding `keys`.
///
/// A column is a key when its full name or its last header level is listed.
/// Columns without a single value contribute nothing and are left out; a
/// column that still holds text after cleaning fails on its first bad cell.
pub(crate) fn value_columns<'a>(
    df: &'a DataFrame,
    sheet: &str,
    keys: &[&str],
) -> Result<Vec<&'a Column>> {
    let mut columns = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        let last_level = column_levels(name).last().copied().unwrap_or(name);
        if keys.contains(&name) || keys.contains(&last_level) {
            continue;
        }
        if column.null_count() == column.len() {
            tracing::debug!(sheet, column = name, "skipping empty column");
            continue;
        }
        if column.dtype() != &DataType::Float64 {
            return Err(non_numeric(column, sheet));
        }
        columns.push(column);
    }
    Ok(columns)
}

fn non_numeric(column: &Column, sheet: &str) -> TransformError {
    let value = (0..column.len())
        .filter_map(|idx| text_at(column, idx))
        .find(|text| parse_f64(text).is_none())
        .unwrap_or_default();
    TransformError::NonNumericColumn {
        sheet: sheet.to_string(),
        column: column.name().to_string(),
        value,
    }
}

/// Numeric cells of a `Float64` column.
pub(crate) fn numbers(column: &Column) -> Result<Vec<Option<f64>>> {
    Ok(column.f64()?.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observations_land_in_canonical_order() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let array = observations_to_array(vec![Observation {
            death: "All causes".to_string(),
            vax_status: "Unvaccinated".to_string(),
            age_group: "18-39".to_string(),
            variable: "ASMR".to_string(),
            date,
            value: 4.5,
        }])
        .unwrap();
        assert_eq!(array.dim_names(), CANONICAL_DIMS.to_vec());
        assert_eq!(array.shape(), &[1, 1, 1, 1, 1]);
        assert_eq!(array.total(), 4.5);
    }

    #[test]
    fn value_columns_skip_keys_and_empty() {
        let df = DataFrame::new(vec![
            Series::new("Month".into(), vec![Some("January")]).into_column(),
            Series::new("Number of deaths".into(), vec![Some(3.0)]).into_column(),
            Series::new("Unvaccinated\u{1f}Week number".into(), vec![Some("w1")]).into_column(),
            Series::new("ASMR".into(), vec![None::<f64>]).into_column(),
        ])
        .unwrap();
        let columns = value_columns(&df, "Table 5", &["Month", "Week number"]).unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["Number of deaths"]);
    }

    #[test]
    fn text_value_column_names_first_bad_cell() {
        let df = DataFrame::new(vec![
            Series::new("Number of deaths".into(), vec![Some("10"), None, Some("[c]")])
                .into_column(),
        ])
        .unwrap();
        let err = value_columns(&df, "Table 2", &[]).unwrap_err();
        assert!(matches!(
            err,
            TransformError::NonNumericColumn { ref column, ref value, .. }
                if column == "Number of deaths" && value == "[c]"
        ));
    }
}
