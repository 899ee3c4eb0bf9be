//! `canon` command-line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use canon_cli::logging::{LogConfig, LogFormat, init_logging};
use canon_cli::settings::open_workspace;
use canon_model::CanonError;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_canonical, run_check, run_mappings, run_normalize, run_pending, run_records, run_resolve,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let workspace = match open_workspace(&cli.config, cli.mappings_dir.clone()) {
        Ok(workspace) => workspace,
        Err(error) => return report(&error),
    };
    let result = match &cli.command {
        Command::Normalize(args) => run_normalize(&workspace, args),
        Command::Records(args) => run_records(&workspace, args),
        Command::Canonical(args) => run_canonical(&workspace, args.vocabulary.into()),
        Command::Pending(args) => run_pending(&workspace, args),
        Command::Resolve(args) => run_resolve(&workspace, args),
        Command::Mappings(args) => run_mappings(&workspace, args.vocabulary.into()),
        Command::Check => return if run_check(&workspace) { 0 } else { 1 },
    };
    match result {
        Ok(()) => 0,
        Err(error) => report(&error),
    }
}

fn report(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    if let Some(hint) = error
        .downcast_ref::<CanonError>()
        .and_then(CanonError::suggestion)
    {
        eprintln!("hint: {hint}");
    }
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default().with_level(cli.verbosity.tracing_level_filter());
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
    config = config
        .with_format(match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        })
        .with_log_file(cli.log_file.clone());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
