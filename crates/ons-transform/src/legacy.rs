//! Releases 0 to 3.

use std::collections::BTreeMap;

use ons_ingest::{SheetTable, Workbook, clean_frame, column_levels, read_sheet};
use ons_model::LabeledArray;

use crate::error::{Result, TransformError};
use crate::extractor::{ExtractOptions, ExtractionStrategy};
use crate::harmonize::{LEGACY_VARIABLES, VAX_STATUSES};
use crate::layout::{LayoutDescriptor, LegacyKind};
use crate::period::{index_cell_to_date, month_with_year};
use crate::reshape::{
    Observation, numbers, observations_to_array, require_column, text_at, value_columns,
};

/// Age label of releases without an age breakdown.
pub const ALL_AGES: &str = "All ages";

const WEEK_NUMBER: &str = "Week number";
const MONTH: &str = "Month";
const AGE_GROUP: &str = "Age-group";
const VACCINATION_STATUS: &str = "Vaccination status";

/// Extraction driven by a [`LayoutDescriptor`].
#[derive(Debug, Clone, Copy)]
pub struct LegacyStrategy {
    layout: &'static LayoutDescriptor,
}

impl LegacyStrategy {
    pub fn new(layout: &'static LayoutDescriptor) -> Self {
        Self { layout }
    }
}

impl ExtractionStrategy for LegacyStrategy {
    fn name(&self) -> &'static str {
        match self.layout.kind {
            LegacyKind::WideByStatus => "legacy-wide",
            LegacyKind::PivotByAgeAndStatus => "legacy-pivot",
        }
    }

    fn extract(
        &self,
        workbook: &mut dyn Workbook,
        options: &ExtractOptions,
    ) -> Result<LabeledArray> {
        let read_options = self.layout.read_options();
        let mut observations = Vec::new();
        for (sheet, death) in self.layout.sheets() {
            let table = read_sheet(workbook, &sheet, &read_options)?;
            let before = observations.len();
            match self.layout.kind {
                LegacyKind::WideByStatus => {
                    wide_observations(&table, death, options, &mut observations)?;
                }
                LegacyKind::PivotByAgeAndStatus => {
                    pivot_observations(&table, death, options, &mut observations)?;
                }
            }
            tracing::debug!(
                sheet = %sheet,
                death,
                cells = observations.len() - before,
                "extracted sheet"
            );
        }
        observations_to_array(observations)
    }
}

/// Months down the index column, `status / variable` across two header rows.
fn wide_observations(
    table: &SheetTable,
    death: &str,
    options: &ExtractOptions,
    out: &mut Vec<Observation>,
) -> Result<()> {
    let sheet = table.sheet.as_str();
    if table.levels != 2 {
        return Err(TransformError::UnexpectedHeader {
            sheet: sheet.to_string(),
            reason: format!("expected 2 header rows, found {}", table.levels),
        });
    }
    let index = table
        .index
        .as_ref()
        .ok_or_else(|| TransformError::MissingIndex {
            sheet: sheet.to_string(),
        })?;
    let dates = index
        .values
        .iter()
        .map(|cell| {
            index_cell_to_date(cell).ok_or_else(|| TransformError::InvalidDate {
                sheet: sheet.to_string(),
                value: cell.display(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let cleaned = clean_frame(&table.data)?;
    for column in value_columns(&cleaned, sheet, &[WEEK_NUMBER])? {
        let name = column.name().as_str();
        let levels = column_levels(name);
        let [status, variable] = levels.as_slice() else {
            return Err(TransformError::UnexpectedHeader {
                sheet: sheet.to_string(),
                reason: format!("column '{}' does not have 2 levels", levels.join(" / ")),
            });
        };
        let vax_status = VAX_STATUSES.resolve(status, options.label_mode)?;
        let variable = LEGACY_VARIABLES.resolve(variable, options.label_mode)?;
        for (date, value) in dates.iter().zip(numbers(column)?) {
            let Some(value) = value else { continue };
            out.push(Observation {
                death: death.to_string(),
                vax_status: vax_status.clone(),
                age_group: ALL_AGES.to_string(),
                variable: variable.clone(),
                date: *date,
                value,
            });
        }
    }
    Ok(())
}

/// Long rows keyed by Month, Age-group and Vaccination status.
///
/// Repeated keys are averaged over their non-missing values.
fn pivot_observations(
    table: &SheetTable,
    death: &str,
    options: &ExtractOptions,
    out: &mut Vec<Observation>,
) -> Result<()> {
    let sheet = table.sheet.as_str();
    let cleaned = clean_frame(&table.data)?;
    let month_col = require_column(&cleaned, sheet, MONTH)?;
    let age_col = require_column(&cleaned, sheet, AGE_GROUP)?;
    let status_col = require_column(&cleaned, sheet, VACCINATION_STATUS)?;

    let mut keys = Vec::with_capacity(cleaned.height());
    for idx in 0..cleaned.height() {
        let (Some(month), Some(age), Some(status)) = (
            text_at(month_col, idx),
            text_at(age_col, idx),
            text_at(status_col, idx),
        ) else {
            keys.push(None);
            continue;
        };
        let date = month_with_year(&month, options.fixed_year).ok_or_else(|| {
            TransformError::InvalidDate {
                sheet: sheet.to_string(),
                value: month.clone(),
            }
        })?;
        let status = VAX_STATUSES.resolve(&status, options.label_mode)?;
        keys.push(Some((date, age, status)));
    }

    for column in value_columns(&cleaned, sheet, &[MONTH, AGE_GROUP, VACCINATION_STATUS])? {
        let variable = LEGACY_VARIABLES.resolve(column.name().as_str(), options.label_mode)?;
        let mut cells: BTreeMap<_, (f64, usize)> = BTreeMap::new();
        for (key, value) in keys.iter().zip(numbers(column)?) {
            let (Some(key), Some(value)) = (key, value) else {
                continue;
            };
            let cell = cells.entry(key).or_insert((0.0, 0));
            cell.0 += value;
            cell.1 += 1;
        }
        for ((date, age, status), (sum, count)) in cells {
            out.push(Observation {
                death: death.to_string(),
                vax_status: status.clone(),
                age_group: age.clone(),
                variable: variable.clone(),
                date: *date,
                value: sum / count as f64,
            });
        }
    }
    Ok(())
}
