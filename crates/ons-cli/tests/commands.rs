//! Command layer against an in-memory pair of releases.

use std::fs;

use ons_cli::commands::{build_summary, grouped_totals, verify_report};
use ons_cli::summary::{corpus_table, group_table};
use ons_cli::types::GroupTotal;
use ons_core::{AssemblerConfig, CorpusAssembler};
use ons_ingest::{MemoryLoader, MemoryWorkbook};
use ons_transform::{GroupingMode, VACCINATED_ANY};
use tempfile::{TempDir, tempdir};

fn release_workbook(status: &str, deaths: &str) -> MemoryWorkbook {
    let rows: [&[&str]; 6] = [
        &["Deaths by vaccination status, England"],
        &[""],
        &[""],
        &[
            "Year",
            "Month",
            "Cause of Death",
            "Age group",
            "Vaccination status",
            "Count of deaths",
            "Age-standardised mortality rate / 100,000 person-years",
        ],
        &["2022", "January", "All causes", "18-39", "Unvaccinated", deaths, "30.5"],
        &["2022", "January", "All causes", "18-39", status, "4", "12.0"],
    ];
    MemoryWorkbook::new().with_text_sheet("Table 2", &rows)
}

fn setup() -> (TempDir, CorpusAssembler) {
    let root = tempdir().unwrap();
    let loader = MemoryLoader::new()
        .with_workbook(
            "deaths_v4.xlsx",
            release_workbook("First dose, less than 21 days ago", "10"),
        )
        .with_workbook(
            "deaths_v5.xlsx",
            release_workbook("Second dose, at least 21 days ago", "12"),
        );
    let assembler = CorpusAssembler::new(AssemblerConfig::with_root(root.path()))
        .unwrap()
        .with_loader(loader);
    for name in ["deaths_v4.xlsx", "deaths_v5.xlsx"] {
        fs::write(assembler.config().data_dir.join(name), name.as_bytes()).unwrap();
    }
    (root, assembler)
}

fn total(totals: &[GroupTotal], group: &str) -> f64 {
    totals
        .iter()
        .find(|total| total.group == group)
        .map(|total| total.total)
        .unwrap_or_else(|| panic!("no group {group}"))
}

#[test]
fn build_summary_lists_every_dimension() {
    let (_root, assembler) = setup();
    let summary = build_summary(&assembler, false).unwrap();

    assert_eq!(summary.releases, vec!["v4", "v5"]);
    assert_eq!(summary.shape, vec![2, 1, 3, 1, 2, 1]);
    assert_eq!(summary.cells, 12);
    assert_eq!(summary.valid_cells, 8);
    insta::assert_snapshot!(serde_json::to_string_pretty(&summary.dims).unwrap(), @r#"
    [
      {
        "name": "version",
        "labels": 2,
        "first": "v4",
        "last": "v5"
      },
      {
        "name": "death",
        "labels": 1,
        "first": "All causes",
        "last": "All causes"
      },
      {
        "name": "vax_status",
        "labels": 3,
        "first": "First dose, less than 21 days ago",
        "last": "Unvaccinated"
      },
      {
        "name": "age_group",
        "labels": 1,
        "first": "18-39",
        "last": "18-39"
      },
      {
        "name": "variable",
        "labels": 2,
        "first": "ASMR",
        "last": "Number of deaths"
      },
      {
        "name": "date",
        "labels": 1,
        "first": "2022-01-01",
        "last": "2022-01-01"
      }
    ]
    "#);

    let rendered = corpus_table(&summary).to_string();
    assert!(rendered.contains("vax_status"));
    assert!(rendered.contains("8 with values"));
}

#[test]
fn binary_totals_count_deaths_only() {
    let (_root, assembler) = setup();
    let totals = grouped_totals(&assembler, GroupingMode::Binary).unwrap();

    assert_eq!(totals.len(), 2);
    assert_eq!(total(&totals, "Unvaccinated"), 22.0);
    assert_eq!(total(&totals, VACCINATED_ANY), 8.0);
    assert!(
        totals
            .iter()
            .all(|total| total.variable.as_deref() == Some("Number of deaths"))
    );
    assert!(group_table(&totals).to_string().contains(VACCINATED_ANY));
}

#[test]
fn dose_totals_keep_empty_groups() {
    let (_root, assembler) = setup();
    let totals = grouped_totals(&assembler, GroupingMode::Doses).unwrap();

    assert_eq!(totals.len(), 5);
    assert_eq!(total(&totals, "Vaccinated 1 dose"), 4.0);
    assert_eq!(total(&totals, "Vaccinated 2 doses"), 4.0);
    assert_eq!(total(&totals, "Vaccinated 3 doses"), 0.0);
    assert_eq!(total(&totals, "Vaccinated 4 doses"), 0.0);
}

#[test]
fn verify_after_build_is_current() {
    let (_root, assembler) = setup();
    assert!(verify_report(&assembler).is_err());

    build_summary(&assembler, false).unwrap();
    let report = verify_report(&assembler).unwrap();
    assert!(report.current);
    assert_eq!(report.unchanged, vec!["deaths_v4.xlsx", "deaths_v5.xlsx"]);
}
