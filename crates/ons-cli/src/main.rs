//! ONS mortality corpus CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use ons_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use ons_cli::commands::{run_build, run_group, run_list, run_verify};
use ons_cli::logging::{LogConfig, LogFormat, init_logging};
use ons_cli::summary::{
    print_corpus_summary, print_group_totals, print_releases, print_verify_report,
};
use ons_core::CorpusError;
use serde::Serialize;
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let config = cli.assembler_config();
    let outcome = match &cli.command {
        Command::List => run_list(config).map(|releases| {
            print_releases(&releases);
            0
        }),
        Command::Build(args) => run_build(config, args).and_then(|summary| {
            if args.json {
                print_json(&summary)?;
            } else {
                print_corpus_summary(&summary);
            }
            Ok(0)
        }),
        Command::Group(args) => run_group(config, args).and_then(|totals| {
            if args.json {
                print_json(&totals)?;
            } else {
                print_group_totals(&totals);
            }
            Ok(0)
        }),
        Command::Verify(args) => run_verify(config).and_then(|report| {
            if args.json {
                print_json(&report)?;
            } else {
                print_verify_report(&report);
            }
            Ok(if report.current { 0 } else { 1 })
        }),
    };
    let exit_code = match outcome {
        Ok(code) => code,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_error(error: &anyhow::Error) {
    eprintln!("error: {error:#}");
    if let Some(CorpusError::Persistence(persistence)) = error.downcast_ref::<CorpusError>() {
        eprintln!("{}", persistence.user_message());
        if let Some(hint) = persistence.suggestion() {
            eprintln!("hint: {hint}");
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
