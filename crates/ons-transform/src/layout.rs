//! Release layouts.
//!
//! Versions 0 to 3 each shipped their own table arrangement: which sheets
//! hold the data, how many header rows, how long the notes block at the
//! bottom is and whether months sit in an index column. From version 4 on
//! the releases share a single long-format sheet.

use ons_ingest::SheetReadOptions;

use crate::error::{Result, TransformError};

pub const DEATHS_INVOLVING_COVID: &str = "Deaths involving COVID-19";
pub const NON_COVID_DEATHS: &str = "Non-COVID-19 deaths";
pub const ALL_CAUSES: &str = "All causes";

/// Death category of each sheet, by sheet position.
pub const DEATH_LABELS: [&str; 3] = [DEATHS_INVOLVING_COVID, NON_COVID_DEATHS, ALL_CAUSES];

/// First release version read with [`CURRENT_LAYOUT`].
pub const FIRST_CURRENT_VERSION: u32 = 4;

/// Table arrangement of a legacy release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKind {
    /// Months in the index column; header levels are status then variable.
    WideByStatus,
    /// Long rows with Month, Age-group and Vaccination status columns.
    PivotByAgeAndStatus,
}

/// Static description of one legacy release layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDescriptor {
    pub version: u32,
    /// `Table <n>` numbers, in death-category order.
    pub sheet_indices: &'static [u32],
    pub footer_skip: usize,
    pub header_rows: &'static [usize],
    pub index_column: Option<usize>,
    pub sheet_labels: &'static [&'static str],
    pub kind: LegacyKind,
}

impl LayoutDescriptor {
    /// Sheet names paired with their death category.
    pub fn sheets(&self) -> impl Iterator<Item = (String, &'static str)> + '_ {
        self.sheet_indices
            .iter()
            .zip(self.sheet_labels.iter())
            .map(|(index, label)| (sheet_name(*index), *label))
    }

    pub fn read_options(&self) -> SheetReadOptions {
        SheetReadOptions::new(self.header_rows.to_vec())
            .with_skip_footer(self.footer_skip)
            .with_index_column(self.index_column)
    }
}

/// Name of sheet number `index`.
pub fn sheet_name(index: u32) -> String {
    format!("Table {index}")
}

static LEGACY_LAYOUTS: [LayoutDescriptor; 4] = [
    LayoutDescriptor {
        version: 0,
        sheet_indices: &[4, 5],
        footer_skip: 11,
        header_rows: &[3, 4],
        index_column: Some(0),
        sheet_labels: &[DEATHS_INVOLVING_COVID, NON_COVID_DEATHS],
        kind: LegacyKind::WideByStatus,
    },
    LayoutDescriptor {
        version: 1,
        sheet_indices: &[1, 2],
        footer_skip: 13,
        header_rows: &[3, 4],
        index_column: Some(0),
        sheet_labels: &[DEATHS_INVOLVING_COVID, NON_COVID_DEATHS],
        kind: LegacyKind::WideByStatus,
    },
    LayoutDescriptor {
        version: 2,
        sheet_indices: &[5, 6, 7],
        footer_skip: 13,
        header_rows: &[3],
        index_column: None,
        sheet_labels: &DEATH_LABELS,
        kind: LegacyKind::PivotByAgeAndStatus,
    },
    LayoutDescriptor {
        version: 3,
        sheet_indices: &[5, 6, 7],
        footer_skip: 15,
        header_rows: &[3],
        index_column: None,
        sheet_labels: &DEATH_LABELS,
        kind: LegacyKind::PivotByAgeAndStatus,
    },
];

/// Returns the layout of legacy release `version`.
pub fn legacy_layout(version: u32) -> Result<&'static LayoutDescriptor> {
    LEGACY_LAYOUTS
        .iter()
        .find(|layout| layout.version == version)
        .ok_or(TransformError::UnknownLayout { version })
}

/// All legacy layouts, by version.
pub fn legacy_layouts() -> &'static [LayoutDescriptor] {
    &LEGACY_LAYOUTS
}

/// Single-sheet layout shared by releases from [`FIRST_CURRENT_VERSION`] on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentLayout {
    pub sheet: &'static str,
    pub header_row: usize,
    pub footer_skip: usize,
}

impl CurrentLayout {
    pub fn read_options(&self) -> SheetReadOptions {
        SheetReadOptions::new(vec![self.header_row]).with_skip_footer(self.footer_skip)
    }
}

pub const CURRENT_LAYOUT: CurrentLayout = CurrentLayout {
    sheet: "Table 2",
    header_row: 3,
    footer_skip: 0,
};
