//! Releases from version 4 on.

use chrono::NaiveDate;
use ons_common::parse_f64;
use ons_ingest::{Workbook, clean_frame, read_sheet};
use ons_model::LabeledArray;
use polars::prelude::*;

use crate::error::{Result, TransformError};
use crate::extractor::{ExtractOptions, ExtractionStrategy};
use crate::harmonize::{CURRENT_VARIABLES, VAX_STATUSES};
use crate::layout::CURRENT_LAYOUT;
use crate::period::month_with_year;
use crate::reshape::{
    Observation, numbers, observations_to_array, require_column, text_at, value_columns,
};

const YEAR: &str = "Year";
const MONTH: &str = "Month";
const CAUSE_OF_DEATH: &str = "Cause of Death";
const AGE_GROUP: &str = "Age group";
const VACCINATION_STATUS: &str = "Vaccination status";

/// Long-format `Table 2`: one row per cause, age group, status and month.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentStrategy;

impl ExtractionStrategy for CurrentStrategy {
    fn name(&self) -> &'static str {
        "current"
    }

    fn extract(
        &self,
        workbook: &mut dyn Workbook,
        options: &ExtractOptions,
    ) -> Result<LabeledArray> {
        let sheet = CURRENT_LAYOUT.sheet;
        let table = read_sheet(workbook, sheet, &CURRENT_LAYOUT.read_options())?;

        // Dates come from the raw Month and Year text, before cleaning.
        let dates = row_dates(&table.data, sheet)?;
        let body = table.data.drop(YEAR)?.drop(MONTH)?;
        let cleaned = clean_frame(&body)?;

        let death_col = require_column(&cleaned, sheet, CAUSE_OF_DEATH)?;
        let age_col = require_column(&cleaned, sheet, AGE_GROUP)?;
        let status_col = require_column(&cleaned, sheet, VACCINATION_STATUS)?;

        let mut keys = Vec::with_capacity(cleaned.height());
        for (idx, date) in dates.iter().enumerate() {
            let (Some(death), Some(age), Some(status)) = (
                text_at(death_col, idx),
                text_at(age_col, idx),
                text_at(status_col, idx),
            ) else {
                keys.push(None);
                continue;
            };
            let status = VAX_STATUSES.resolve(&status, options.label_mode)?;
            keys.push(Some((death, age, status, *date)));
        }

        let mut observations = Vec::new();
        let key_columns = [CAUSE_OF_DEATH, AGE_GROUP, VACCINATION_STATUS];
        for column in value_columns(&cleaned, sheet, &key_columns)? {
            let variable = CURRENT_VARIABLES.resolve(column.name().as_str(), options.label_mode)?;
            for (key, value) in keys.iter().zip(numbers(column)?) {
                let (Some((death, age, status, date)), Some(value)) = (key, value) else {
                    continue;
                };
                observations.push(Observation {
                    death: death.clone(),
                    vax_status: status.clone(),
                    age_group: age.clone(),
                    variable: variable.clone(),
                    date: *date,
                    value,
                });
            }
        }
        tracing::debug!(sheet, cells = observations.len(), "extracted sheet");
        observations_to_array(observations)
    }
}

/// First-of-month date of every row, from the trimmed Month name and Year.
fn row_dates(df: &DataFrame, sheet: &str) -> Result<Vec<NaiveDate>> {
    let month_col = require_column(df, sheet, MONTH)?;
    let year_col = require_column(df, sheet, YEAR)?;
    (0..df.height())
        .map(|idx| {
            let month = text_at(month_col, idx).unwrap_or_default();
            let year = text_at(year_col, idx).unwrap_or_default();
            parse_f64(&year)
                .filter(|year| year.fract() == 0.0)
                .and_then(|year| month_with_year(&month, year as i32))
                .ok_or_else(|| TransformError::InvalidDate {
                    sheet: sheet.to_string(),
                    value: format!("{month} {year}").trim().to_string(),
                })
        })
        .collect()
}
