//! CLI argument definitions for the vault resolver.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use cadvault_cli::config::VaultConfig;
use cadvault_index::RevisionRuleConfig;

#[derive(Parser)]
#[command(
    name = "cadvault",
    version,
    about = "Resolve parts lists to CAD vault files",
    long_about = "Resolve parts-list items to the part, assembly and drawing files \
                  in a CAD vault library.\n\n\
                  The library is indexed once per run. Ambiguous and missing files \
                  are reported, never guessed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Config file (default: ./cadvault.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan the library and print index statistics.
    Index(IndexArgs),

    /// Resolve a parts list against the library.
    Resolve(ResolveArgs),
}

/// Library options shared by every subcommand.
#[derive(Args)]
pub struct LibraryArgs {
    /// Library root to scan (overrides config and CADVAULT_LIBRARY_ROOT).
    #[arg(long = "library-root", value_name = "DIR")]
    pub library_root: Option<PathBuf>,

    /// Follow symbolic links while scanning.
    #[arg(long = "follow-links")]
    pub follow_links: bool,

    /// How revision codes are read from filenames.
    #[arg(long = "revision-rule", value_enum, conflicts_with = "revision_pattern")]
    pub revision_rule: Option<RevisionRuleArg>,

    /// Regex with a named `rev` group matched at the end of filename stems.
    #[arg(long = "revision-pattern", value_name = "REGEX")]
    pub revision_pattern: Option<String>,
}

impl LibraryArgs {
    /// Apply these flags over a loaded configuration.
    pub fn apply(&self, config: &mut VaultConfig) {
        if let Some(root) = &self.library_root {
            config.library_root = root.clone();
        }
        if self.follow_links {
            config.follow_links = true;
        }
        if let Some(rule) = self.revision_rule {
            config.revision = rule.into();
        }
        if let Some(pattern) = &self.revision_pattern {
            config.revision = RevisionRuleConfig::Pattern {
                pattern: pattern.clone(),
            };
        }
    }
}

#[derive(Args)]
pub struct IndexArgs {
    #[command(flatten)]
    pub library: LibraryArgs,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Parts list CSV with an Item column.
    #[arg(value_name = "PARTS_CSV")]
    pub parts: PathBuf,

    #[command(flatten)]
    pub library: LibraryArgs,

    /// What to produce.
    #[arg(long = "mode", value_enum, default_value = "test")]
    pub mode: ModeArg,

    /// Write the report or job lines to a file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Resolution worker threads (0 or 1 resolves sequentially).
    #[arg(long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Exit with status 2 when any item has ambiguous or missing files.
    #[arg(long = "fail-on-unresolved")]
    pub fail_on_unresolved: bool,
}

/// Run modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Per-item status table, no jobs.
    Test,
    /// Ordered item/type/path listing, no jobs.
    Print,
    /// Render jobs as JSON lines.
    Jobs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RevisionRuleArg {
    TrailingLetter,
    LetterDigit,
    Separated,
    None,
}

impl From<RevisionRuleArg> for RevisionRuleConfig {
    fn from(arg: RevisionRuleArg) -> Self {
        match arg {
            RevisionRuleArg::TrailingLetter => Self::TrailingLetter,
            RevisionRuleArg::LetterDigit => Self::LetterDigit,
            RevisionRuleArg::Separated => Self::Separated,
            RevisionRuleArg::None => Self::None,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_flags_override_config() {
        let cli = Cli::try_parse_from([
            "cadvault",
            "resolve",
            "parts.csv",
            "--library-root",
            "/mnt/library",
            "--revision-rule",
            "letter-digit",
            "--mode",
            "jobs",
            "--threads",
            "4",
        ])
        .unwrap();
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.mode, ModeArg::Jobs);
        assert_eq!(args.threads, Some(4));

        let mut config = VaultConfig::default();
        args.library.apply(&mut config);
        assert_eq!(config.library_root, PathBuf::from("/mnt/library"));
        assert_eq!(config.revision, RevisionRuleConfig::LetterDigit);
    }

    #[test]
    fn test_rule_and_pattern_conflict() {
        let result = Cli::try_parse_from([
            "cadvault",
            "index",
            "--revision-rule",
            "none",
            "--revision-pattern",
            "(?<rev>[A-Z])$",
        ]);
        assert!(result.is_err());
    }
}
