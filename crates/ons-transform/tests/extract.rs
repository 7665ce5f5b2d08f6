//! Extraction of synthetic releases of every layout.

mod common;

use chrono::NaiveDate;
use common::{
    CURRENT_HEADER, CURRENT_ROWS, PIVOT_ROWS, WideRow, current_release, pivot_release,
    wide_release,
};
use ons_ingest::{Cell, IngestError, MemoryLoader, MemoryWorkbook, ReleaseFile};
use ons_model::{ArrayError, CANONICAL_DIMS, Coord, LabeledArray};
use ons_transform::{
    ALL_AGES, ExtractOptions, LabelMode, TransformError, extract_release, extract_workbook,
};

fn month(year: i32, month: u32) -> Coord {
    Coord::from(NaiveDate::from_ymd_opt(year, month, 1).expect("valid date"))
}

fn cell(
    array: &LabeledArray,
    death: &str,
    vax_status: &str,
    age_group: &str,
    variable: &str,
    date: Coord,
) -> f64 {
    array
        .value(&[
            ("death", Coord::from(death)),
            ("vax_status", Coord::from(vax_status)),
            ("age_group", Coord::from(age_group)),
            ("variable", Coord::from(variable)),
            ("date", date),
        ])
        .expect("cell lookup")
}

fn v0_release() -> MemoryWorkbook {
    wide_release(
        0,
        &[
            WideRow::new("Jan-2020", 120.0, 10.0),
            WideRow::new("Feb-2020", 100.0, 12.0),
        ],
        &[WideRow::new("Jan-2020", 900.0, 80.0)],
    )
}

#[test]
fn every_layout_yields_canonical_dimensions() {
    let options = ExtractOptions::default();
    let mut workbooks = vec![
        (0, v0_release()),
        (
            1,
            wide_release(
                1,
                &[WideRow::new("January 2021", 50.0, 5.0)],
                &[WideRow::new("January 2021", 400.0, 40.0)],
            ),
        ),
        (2, pivot_release(2, &PIVOT_ROWS)),
        (3, pivot_release(3, &PIVOT_ROWS)),
        (4, current_release(&CURRENT_HEADER, &CURRENT_ROWS)),
        (7, current_release(&CURRENT_HEADER, &CURRENT_ROWS)),
    ];
    for (version, workbook) in &mut workbooks {
        let array = extract_workbook(*version, workbook, &options)
            .unwrap_or_else(|e| panic!("release {version}: {e}"));
        assert_eq!(array.dim_names(), CANONICAL_DIMS.to_vec(), "release {version}");
        assert!(array.count_valid() > 0, "release {version}");
    }
}

#[test]
fn version_zero_end_to_end() {
    let array = extract_workbook(0, &mut v0_release(), &ExtractOptions::default())
        .expect("extract v0");

    assert_eq!(
        cell(
            &array,
            "Deaths involving COVID-19",
            "Vaccinated",
            ALL_AGES,
            "Number of deaths",
            month(2020, 1),
        ),
        10.0
    );
    assert_eq!(
        cell(
            &array,
            "Non-COVID-19 deaths",
            "Unvaccinated",
            ALL_AGES,
            "Number of deaths",
            month(2020, 1),
        ),
        900.0
    );
    // Rate labels are harmonized; the suppressed unvaccinated rate is missing.
    assert_eq!(
        cell(
            &array,
            "Deaths involving COVID-19",
            "Vaccinated",
            ALL_AGES,
            "ASMR",
            month(2020, 2),
        ),
        1.5
    );
    assert!(
        cell(
            &array,
            "Deaths involving COVID-19",
            "Unvaccinated",
            ALL_AGES,
            "ASMR",
            month(2020, 1),
        )
        .is_nan()
    );
    // Week numbers are not a variable.
    let variables = array.labels("variable").expect("variable labels");
    assert_eq!(
        variables,
        &[Coord::from("ASMR"), Coord::from("Number of deaths")]
    );
    // Only the COVID sheet has February.
    assert!(
        cell(
            &array,
            "Non-COVID-19 deaths",
            "Vaccinated",
            ALL_AGES,
            "Number of deaths",
            month(2020, 2),
        )
        .is_nan()
    );
}

#[test]
fn version_one_accepts_date_cells_in_index() {
    let workbook = wide_release(
        1,
        &[WideRow::new(
            NaiveDate::from_ymd_opt(2021, 3, 1).expect("date"),
            40.0,
            4.0,
        )],
        &[WideRow::new("March 2021", 300.0, 30.0)],
    );
    let array =
        extract_workbook(1, &mut workbook.clone(), &ExtractOptions::default()).expect("extract v1");
    assert_eq!(array.labels("date").expect("dates"), &[month(2021, 3)]);
    assert_eq!(array.labels("age_group").expect("ages"), &[Coord::from(ALL_AGES)]);
}

#[test]
fn pivot_releases_average_repeated_keys_and_use_fixed_year() {
    let array = extract_workbook(2, &mut pivot_release(2, &PIVOT_ROWS), &ExtractOptions::default())
        .expect("extract v2");

    assert_eq!(
        array.labels("death").expect("deaths"),
        &[
            Coord::from("All causes"),
            Coord::from("Deaths involving COVID-19"),
            Coord::from("Non-COVID-19 deaths"),
        ]
    );
    assert_eq!(
        cell(&array, "All causes", "Unvaccinated", "18-39", "Number of deaths", month(2021, 1)),
        6.0
    );
    // Only the non-missing rate counts towards the mean.
    assert_eq!(
        cell(&array, "All causes", "Unvaccinated", "18-39", "ASMR", month(2021, 1)),
        2.5
    );
    assert_eq!(
        cell(
            &array,
            "Non-COVID-19 deaths",
            "Second dose, at least 21 days ago",
            "40-49",
            "Population",
            month(2021, 2),
        ),
        3000.0
    );

    let shifted = extract_workbook(
        3,
        &mut pivot_release(3, &PIVOT_ROWS),
        &ExtractOptions::default().with_fixed_year(2022),
    )
    .expect("extract v3");
    assert_eq!(
        shifted.labels("date").expect("dates"),
        &[month(2022, 1), month(2022, 2)]
    );
}

#[test]
fn current_release_harmonizes_variables() {
    let array = extract_workbook(
        4,
        &mut current_release(&CURRENT_HEADER, &CURRENT_ROWS),
        &ExtractOptions::default(),
    )
    .expect("extract v4");

    assert_eq!(
        array.labels("variable").expect("variables"),
        &[
            Coord::from("ASMR"),
            Coord::from("Lower confidence limit"),
            Coord::from("Number of deaths"),
            Coord::from("Person-years"),
        ]
    );
    assert_eq!(
        cell(&array, "All causes", "Unvaccinated", "18-39", "Number of deaths", month(2022, 1)),
        10.0
    );
    assert_eq!(
        cell(
            &array,
            "Deaths involving COVID-19",
            "Unvaccinated",
            "18-39",
            "ASMR",
            month(2022, 2),
        ),
        4.1
    );
    assert!(
        cell(
            &array,
            "All causes",
            "First dose, less than 21 days ago",
            "18-39",
            "ASMR",
            month(2022, 1),
        )
        .is_nan()
    );
}

#[test]
fn strict_mode_rejects_unknown_status_and_lenient_keeps_it() {
    let rows: [&[&str]; 1] = [&[
        "2022",
        "March",
        "All causes",
        "18-39",
        "Fifth dose, at least 21 days ago",
        "1",
        "10",
        "2.0",
        "1.0",
    ]];
    let err = extract_workbook(
        5,
        &mut current_release(&CURRENT_HEADER, &rows),
        &ExtractOptions::default(),
    )
    .expect_err("strict");
    assert!(matches!(err, TransformError::UnrecognizedLabel { .. }));

    let array = extract_workbook(
        5,
        &mut current_release(&CURRENT_HEADER, &rows),
        &ExtractOptions::default().with_label_mode(LabelMode::Lenient),
    )
    .expect("lenient");
    assert_eq!(
        array.labels("vax_status").expect("statuses"),
        &[Coord::from("Fifth dose, at least 21 days ago")]
    );
}

#[test]
fn missing_year_column_is_reported() {
    let header: Vec<&str> = CURRENT_HEADER.iter().copied().filter(|h| *h != "Year").collect();
    let rows: [&[&str]; 1] = [&[
        "January",
        "All causes",
        "18-39",
        "Unvaccinated",
        "1",
        "2",
        "3",
        "4",
    ]];
    let err = extract_workbook(
        4,
        &mut current_release(&header, &rows),
        &ExtractOptions::default(),
    )
    .expect_err("missing Year");
    assert!(matches!(
        err,
        TransformError::MissingColumn { ref column, .. } if column == "Year"
    ));
}

#[test]
fn unreadable_month_label_is_reported() {
    let mut workbook = wide_release(0, &[WideRow::new("Total", 1.0, 1.0)], &[]);
    let err = extract_workbook(0, &mut workbook, &ExtractOptions::default())
        .expect_err("bad month");
    assert!(matches!(
        err,
        TransformError::InvalidDate { ref value, .. } if value == "Total"
    ));
}

#[test]
fn repeated_rows_are_duplicate_coordinates() {
    let rows = [CURRENT_ROWS[0], CURRENT_ROWS[0]];
    let err = extract_workbook(
        4,
        &mut current_release(&CURRENT_HEADER, &rows),
        &ExtractOptions::default(),
    )
    .expect_err("duplicates");
    assert!(matches!(
        err,
        TransformError::Array(ArrayError::DuplicateCoordinate { .. })
    ));
}

#[test]
fn stray_token_in_wide_release_fails_extraction() {
    let mut covid = common::wide_sheet(
        &[
            WideRow::new("Jan-2020", 120.0, 10.0),
            WideRow::new("Feb-2020", 100.0, 12.0),
        ],
        11,
    );
    // Unvaccinated deaths of February.
    covid[6][2] = Cell::Text("[c]".to_string());
    let mut workbook = MemoryWorkbook::new()
        .with_sheet("Table 4", covid)
        .with_sheet(
            "Table 5",
            common::wide_sheet(&[WideRow::new("Jan-2020", 900.0, 80.0)], 11),
        );

    let err = extract_workbook(0, &mut workbook, &ExtractOptions::default())
        .expect_err("text in a value column");
    assert!(matches!(
        err,
        TransformError::NonNumericColumn { ref sheet, ref column, ref value }
            if sheet == "Table 4" && column.ends_with("Number of deaths") && value == "[c]"
    ));
}

#[test]
fn stray_token_in_current_release_fails_extraction() {
    let rows: [&[&str]; 2] = [
        &[
            "2022",
            "January",
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
            "February",
            "All causes",
            "18-39",
            "Unvaccinated",
            "[c]",
            "480",
            "4.1",
            "2.0",
        ],
    ];
    let err = extract_workbook(
        4,
        &mut current_release(&CURRENT_HEADER, &rows),
        &ExtractOptions::default(),
    )
    .expect_err("text in a value column");
    assert!(matches!(
        err,
        TransformError::NonNumericColumn { ref column, ref value, .. }
            if column == "Count of deaths" && value == "[c]"
    ));
}

#[test]
fn missing_sheet_is_an_ingest_error() {
    let workbook = MemoryWorkbook::new()
        .with_sheet("Table 4", common::wide_sheet(&[WideRow::new("Jan-2020", 1.0, 1.0)], 11));
    let err = extract_workbook(0, &mut workbook.clone(), &ExtractOptions::default())
        .expect_err("no Table 5");
    assert!(matches!(
        err,
        TransformError::Ingest(IngestError::SheetNotFound { ref sheet, .. }) if sheet == "Table 5"
    ));
}

#[test]
fn extract_release_opens_through_loader() {
    let release = ReleaseFile::from_path(std::path::Path::new("data/deaths_v0.xlsx"))
        .expect("release");
    let loader = MemoryLoader::new().with_workbook("deaths_v0.xlsx", v0_release());
    let array =
        extract_release(&release, &loader, &ExtractOptions::default()).expect("extract release");
    assert_eq!(array.dim_names(), CANONICAL_DIMS.to_vec());

    let unknown = ReleaseFile::from_path(std::path::Path::new("data/other_v1.xlsx"))
        .expect("release");
    let err = extract_release(&unknown, &loader, &ExtractOptions::default())
        .expect_err("no workbook");
    assert!(matches!(
        err,
        TransformError::Ingest(IngestError::WorkbookOpen { .. })
    ));
}
