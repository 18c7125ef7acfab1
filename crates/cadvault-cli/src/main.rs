//! Vault resolver CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

use cadvault_cli::config::VaultConfig;
use cadvault_cli::logging::{LogConfig, LogFormat, init_logging};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LibraryArgs, LogFormatArg, LogLevelArg};
use crate::commands::{run_index, run_resolve};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Index(args) => match load_config(&cli, &args.library) {
            Ok(config) => match run_index(&config) {
                Ok(()) => 0,
                Err(error) => report_error(&error),
            },
            Err(error) => report_error(&error),
        },
        Command::Resolve(args) => match load_config(&cli, &args.library) {
            Ok(mut config) => {
                if let Some(threads) = args.threads {
                    config.threads = threads;
                }
                match run_resolve(args, &config) {
                    Ok(code) => code,
                    Err(error) => report_error(&error),
                }
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

/// Config file, then environment, then flags.
fn load_config(cli: &Cli, library: &LibraryArgs) -> anyhow::Result<VaultConfig> {
    let mut config = VaultConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    library.apply(&mut config);
    Ok(config)
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
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
