//! Synthetic release workbooks.

#![allow(dead_code)]

use ons_ingest::{Cell, MemoryWorkbook};

pub fn row(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|value| Cell::from(*value)).collect()
}

fn title_block(title: &str) -> Vec<Vec<Cell>> {
    vec![row(&[title]), row(&["England"]), row(&[""])]
}

fn notes(count: usize) -> Vec<Vec<Cell>> {
    (0..count)
        .map(|i| vec![Cell::Text(format!("Note {i}"))])
        .collect()
}

/// One month of a wide sheet: index cell, unvaccinated and vaccinated deaths.
pub struct WideRow {
    pub month: Cell,
    pub unvaccinated: f64,
    pub vaccinated: f64,
}

impl WideRow {
    pub fn new(month: impl Into<Cell>, unvaccinated: f64, vaccinated: f64) -> Self {
        Self {
            month: month.into(),
            unvaccinated,
            vaccinated,
        }
    }
}

/// Two header rows (status over variable), months in the first column.
///
/// Unvaccinated rates are suppressed throughout; vaccinated rates are 1.5.
pub fn wide_sheet(rows: &[WideRow], footer: usize) -> Vec<Vec<Cell>> {
    let mut grid = title_block("Monthly deaths by vaccination status");
    grid.push(row(&["", "", "Unvaccinated", "", "Vaccinated", ""]));
    grid.push(row(&[
        "Month",
        "Week number",
        "Number of deaths",
        "Rate per 100,000 population",
        "Number of deaths",
        "Rate per 100,000 population",
    ]));
    for (week, data) in rows.iter().enumerate() {
        grid.push(vec![
            data.month.clone(),
            Cell::Number((week * 4 + 1) as f64),
            Cell::Number(data.unvaccinated),
            Cell::Text("x".to_string()),
            Cell::Number(data.vaccinated),
            Cell::Number(1.5),
        ]);
    }
    grid.extend(notes(footer));
    grid
}

/// Release 0 (`Table 4`, `Table 5`) or 1 (`Table 1`, `Table 2`).
pub fn wide_release(version: u32, covid: &[WideRow], non_covid: &[WideRow]) -> MemoryWorkbook {
    let (sheets, footer) = match version {
        0 => (["Table 4", "Table 5"], 11),
        1 => (["Table 1", "Table 2"], 13),
        other => panic!("release {other} is not wide"),
    };
    MemoryWorkbook::new()
        .with_sheet("Contents", vec![row(&["Contents"])])
        .with_sheet(sheets[0], wide_sheet(covid, footer))
        .with_sheet(sheets[1], wide_sheet(non_covid, footer))
}

pub const PIVOT_HEADER: [&str; 6] = [
    "Month",
    "Age-group",
    "Vaccination status",
    "Number of deaths",
    "Population",
    "Rate per 100,000 population",
];

/// Single header row of long-format rows.
pub fn pivot_sheet(header: &[&str], rows: &[&[&str]], footer: usize) -> Vec<Vec<Cell>> {
    let mut grid = title_block("Deaths by age group and vaccination status");
    grid.push(row(header));
    grid.extend(rows.iter().map(|values| row(values)));
    grid.extend(notes(footer));
    grid
}

/// Release 2 or 3: `Table 5`, `Table 6`, `Table 7` with the same rows.
pub fn pivot_release(version: u32, rows: &[&[&str]]) -> MemoryWorkbook {
    let footer = match version {
        2 => 13,
        3 => 15,
        other => panic!("release {other} is not long-format legacy"),
    };
    ["Table 5", "Table 6", "Table 7"]
        .into_iter()
        .fold(MemoryWorkbook::new(), |workbook, sheet| {
            workbook.with_sheet(sheet, pivot_sheet(&PIVOT_HEADER, rows, footer))
        })
}

pub const CURRENT_HEADER: [&str; 9] = [
    "Year",
    "Month",
    "Cause of Death",
    "Age group",
    "Vaccination status",
    "Count of deaths",
    "Person-years",
    "Age-standardised mortality rate / 100,000 person-years",
    "Lower 95% confidence limit",
];

/// Release 4 onwards: one `Table 2` sheet, no notes below the data.
pub fn current_release(header: &[&str], rows: &[&[&str]]) -> MemoryWorkbook {
    let mut grid = title_block("Deaths occurring between 1 January 2021 and 31 May 2022");
    grid.push(row(header));
    grid.extend(rows.iter().map(|values| row(values)));
    MemoryWorkbook::new()
        .with_sheet("Table 1", vec![row(&["Summary"])])
        .with_sheet("Table 2", grid)
}

pub const CURRENT_ROWS: [&[&str]; 3] = [
    &[
        "2022",
        "January ",
        "All causes",
        "18-39",
        "Unvaccinated",
        "10",
        "500",
        "12.3",
        "10.1",
    ],
    &[
        "2022",
        "January ",
        "All causes",
        "18-39",
        "First dose, less than 21 days ago",
        "2",
        "100",
        ":",
        "x",
    ],
    &[
        "2022",
        "February",
        "Deaths involving COVID-19",
        "18-39",
        "Unvaccinated",
        "3",
        "480",
        "4.1",
        "2.0",
    ],
];

pub const PIVOT_ROWS: [&[&str]; 4] = [
    &["January", "18-39", "Unvaccinated", "5", "1000", "x"],
    &["January", "18-39", "Unvaccinated", "7", "1000", "2.5"],
    &["January", "18-39", "Ever vaccinated", "3", "2000", "1.0"],
    &[
        "February",
        "40-49",
        "21 days or more after second dose",
        "4",
        "3000",
        "u",
    ],
];
