//! Corpus assembly against a temporary data directory.
//!
//! Release files on disk hold placeholder bytes (they are only hashed); the
//! workbooks themselves come from a `MemoryLoader` keyed by file name.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use ons_core::{AssemblerConfig, CorpusAssembler, CorpusError};
use ons_ingest::{MemoryLoader, MemoryWorkbook};
use ons_model::{CANONICAL_DIMS, Coord, LabeledArray, VERSION};
use ons_transform::TransformError;
use tempfile::{TempDir, tempdir};

const HEADER: &[&str] = &[
    "Year",
    "Month",
    "Cause of Death",
    "Age group",
    "Vaccination status",
    "Count of deaths",
];

fn release_workbook(status: &str, deaths: &str) -> MemoryWorkbook {
    let rows: [&[&str]; 6] = [
        &["Deaths by vaccination status, England"],
        &["Office for National Statistics"],
        &[""],
        HEADER,
        &["2022", "January", "All causes", "18-39", "Unvaccinated", deaths],
        &["2022", "January", "All causes", "18-39", status, "4"],
    ];
    MemoryWorkbook::new()
        .with_text_sheet("Table 1", &[&["Contents"]])
        .with_text_sheet("Table 2", &rows)
}

fn loader() -> MemoryLoader {
    MemoryLoader::new()
        .with_workbook(
            "deaths_v4.xlsx",
            release_workbook("First dose, less than 21 days ago", "10"),
        )
        .with_workbook(
            "deaths_v5.xlsx",
            release_workbook("Second dose, at least 21 days ago", "12"),
        )
}

fn setup() -> (TempDir, CorpusAssembler) {
    let root = tempdir().unwrap();
    let assembler = CorpusAssembler::new(AssemblerConfig::with_root(root.path()))
        .unwrap()
        .with_loader(loader());
    for name in ["deaths_v4.xlsx", "deaths_v5.xlsx"] {
        fs::write(assembler.config().data_dir.join(name), name.as_bytes()).unwrap();
    }
    (root, assembler)
}

fn cell(array: &LabeledArray, version: &str, status: &str) -> f64 {
    array
        .value(&[
            (VERSION, Coord::from(version)),
            ("death", Coord::from("All causes")),
            ("vax_status", Coord::from(status)),
            ("age_group", Coord::from("18-39")),
            ("variable", Coord::from("Number of deaths")),
            (
                "date",
                Coord::from(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()),
            ),
        ])
        .unwrap()
}

fn bits(array: &LabeledArray) -> Vec<u64> {
    array
        .to_row_major_vec()
        .into_iter()
        .map(f64::to_bits)
        .collect()
}

#[test]
fn new_creates_directories() {
    let (root, _assembler) = setup();
    assert!(root.path().join("data").is_dir());
    assert!(root.path().join("graph").is_dir());
}

#[test]
fn list_skips_lock_files_and_corpus() {
    let (_root, assembler) = setup();
    let data_dir = &assembler.config().data_dir;
    fs::write(data_dir.join("~$deaths_v4.xlsx"), b"lock").unwrap();
    fs::write(data_dir.join("ONS_dataset.nc"), b"corpus").unwrap();

    let names: Vec<String> = assembler
        .list_datasets()
        .unwrap()
        .into_iter()
        .map(|release| release.file_name)
        .collect();
    assert_eq!(names, vec!["deaths_v4.xlsx", "deaths_v5.xlsx"]);
}

#[test]
fn corpus_stacks_releases_along_version() {
    let (_root, assembler) = setup();
    let files = assembler.list_datasets().unwrap();
    let corpus = assembler.build(&files).unwrap();

    let mut expected = vec![VERSION];
    expected.extend(CANONICAL_DIMS);
    assert_eq!(corpus.dim_names(), expected);
    assert_eq!(
        corpus.labels(VERSION).unwrap(),
        &[Coord::from("v4"), Coord::from("v5")]
    );
    assert_eq!(cell(&corpus, "v4", "Unvaccinated"), 10.0);
    assert_eq!(cell(&corpus, "v5", "Unvaccinated"), 12.0);
    // Statuses are outer-joined; v4 has no second-dose row.
    assert!(cell(&corpus, "v4", "Second dose, at least 21 days ago").is_nan());
    assert!(!assembler.corpus_path().exists());
}

#[test]
fn second_build_without_force_leaves_file_untouched() {
    let (_root, assembler) = setup();
    let files = assembler.list_datasets().unwrap();
    let path = assembler.corpus_path();

    let built = assembler.build_or_load(&files, false).unwrap();
    let bytes = fs::read(&path).unwrap();
    let modified = fs::metadata(&path).unwrap().modified().unwrap();

    let loaded = assembler.build_or_load(&files, false).unwrap();
    assert_eq!(fs::read(&path).unwrap(), bytes);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
    assert_eq!(loaded.dims(), built.dims());
    assert_eq!(bits(&loaded), bits(&built));
}

#[test]
fn forced_build_reads_releases_again() {
    let (root, assembler) = setup();
    let files = assembler.list_datasets().unwrap();
    assembler.build_or_load(&files, false).unwrap();

    let revised = MemoryLoader::new()
        .with_workbook(
            "deaths_v4.xlsx",
            release_workbook("First dose, less than 21 days ago", "99"),
        )
        .with_workbook(
            "deaths_v5.xlsx",
            release_workbook("Second dose, at least 21 days ago", "12"),
        );
    let assembler = CorpusAssembler::new(AssemblerConfig::with_root(root.path()))
        .unwrap()
        .with_loader(revised);

    let stale = assembler.build_or_load(&files, false).unwrap();
    assert_eq!(cell(&stale, "v4", "Unvaccinated"), 10.0);
    let rebuilt = assembler.build_or_load(&files, true).unwrap();
    assert_eq!(cell(&rebuilt, "v4", "Unvaccinated"), 99.0);
    let reloaded = assembler.build_or_load(&files, false).unwrap();
    assert_eq!(cell(&reloaded, "v4", "Unvaccinated"), 99.0);
}

#[test]
fn failed_extraction_names_the_release_and_writes_nothing() {
    let (_root, assembler) = setup();
    let data_dir = assembler.config().data_dir.clone();
    fs::write(data_dir.join("deaths_v6.xlsx"), b"no workbook").unwrap();
    let files = assembler.list_datasets().unwrap();

    let err = assembler.build_or_load(&files, false).unwrap_err();
    match err {
        CorpusError::Extract { file, source } => {
            assert_eq!(file, "deaths_v6.xlsx");
            assert!(matches!(source, TransformError::Ingest(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!assembler.corpus_path().exists());
}

#[test]
fn verify_reports_changed_added_and_removed_releases() {
    let (_root, assembler) = setup();
    let files = assembler.list_datasets().unwrap();
    assert!(matches!(
        assembler.verify_sources(&files),
        Err(CorpusError::CorpusMissing { .. })
    ));

    assembler.build_or_load(&files, false).unwrap();
    let status = assembler.verify_sources(&files).unwrap();
    assert!(status.is_current());
    assert_eq!(status.unchanged.len(), 2);

    let data_dir: &Path = &assembler.config().data_dir;
    fs::write(data_dir.join("deaths_v4.xlsx"), b"revised release").unwrap();
    fs::remove_file(data_dir.join("deaths_v5.xlsx")).unwrap();
    fs::write(data_dir.join("deaths_v6.xlsx"), b"new release").unwrap();

    let status = assembler
        .verify_sources(&assembler.list_datasets().unwrap())
        .unwrap();
    assert!(!status.is_current());
    assert_eq!(status.changed, vec!["deaths_v4.xlsx"]);
    assert_eq!(status.added, vec!["deaths_v6.xlsx"]);
    assert_eq!(status.removed, vec!["deaths_v5.xlsx"]);
    assert!(status.unchanged.is_empty());
}
