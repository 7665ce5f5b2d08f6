use anyhow::{Context, Result};
use ons_core::{AssemblerConfig, CorpusAssembler};
use ons_transform::{GroupingMode, group_vax_status};
use tracing::info_span;

use crate::cli::{BuildArgs, GroupArgs};
use crate::types::{CorpusSummary, GroupTotal, ReleaseRow, VerifyReport, group_totals};

fn assembler(config: AssemblerConfig) -> Result<CorpusAssembler> {
    let data_dir = config.data_dir.clone();
    CorpusAssembler::new(config)
        .with_context(|| format!("prepare data directory {}", data_dir.display()))
}

pub fn run_list(config: AssemblerConfig) -> Result<Vec<ReleaseRow>> {
    let assembler = assembler(config)?;
    let releases = assembler.list_datasets().context("list releases")?;
    Ok(releases.iter().map(ReleaseRow::from).collect())
}

pub fn run_build(config: AssemblerConfig, args: &BuildArgs) -> Result<CorpusSummary> {
    let assembler = assembler(config.with_extract_options(args.extract.options()))?;
    build_summary(&assembler, args.force)
}

/// Builds or loads the corpus of `assembler` and summarizes it.
pub fn build_summary(assembler: &CorpusAssembler, force: bool) -> Result<CorpusSummary> {
    let span = info_span!("build", force);
    let _guard = span.enter();
    let files = assembler.list_datasets().context("list releases")?;
    let corpus = assembler
        .build_or_load(&files, force)
        .context("assemble corpus")?;
    Ok(CorpusSummary::from_array(&corpus, &assembler.corpus_path()))
}

pub fn run_group(config: AssemblerConfig, args: &GroupArgs) -> Result<Vec<GroupTotal>> {
    let assembler = assembler(config.with_extract_options(args.extract.options()))?;
    let mode = if args.binary {
        GroupingMode::Binary
    } else {
        GroupingMode::Doses
    };
    grouped_totals(&assembler, mode)
}

/// Groups the vaccination statuses of the corpus and totals each group.
pub fn grouped_totals(
    assembler: &CorpusAssembler,
    mode: GroupingMode,
) -> Result<Vec<GroupTotal>> {
    let files = assembler.list_datasets().context("list releases")?;
    let corpus = assembler
        .build_or_load(&files, false)
        .context("assemble corpus")?;
    let grouped = group_vax_status(&corpus, mode).context("group vaccination statuses")?;
    group_totals(&grouped).context("total groups")
}

pub fn run_verify(config: AssemblerConfig) -> Result<VerifyReport> {
    let assembler = assembler(config)?;
    verify_report(&assembler)
}

/// Compares the recorded release hashes with the data directory.
pub fn verify_report(assembler: &CorpusAssembler) -> Result<VerifyReport> {
    let files = assembler.list_datasets().context("list releases")?;
    let status = assembler
        .verify_sources(&files)
        .context("verify release sources")?;
    Ok(VerifyReport::new(status, &assembler.corpus_path()))
}
