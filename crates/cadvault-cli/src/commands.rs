use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cadvault_cli::config::VaultConfig;
use cadvault_cli::pipeline::{index_library, run_resolution};
use cadvault_resolve::{WorkList, render_print_report, write_job_lines};

use crate::cli::{ModeArg, ResolveArgs};
use crate::summary::{print_index_stats, print_skipped, render_test_report};

/// Exit status when unresolved items are treated as failure.
pub const EXIT_UNRESOLVED: i32 = 2;

pub fn run_index(config: &VaultConfig) -> Result<()> {
    let index = index_library(config, None)?;
    print_index_stats(index.root(), config.revision.label(), &index.stats());
    Ok(())
}

/// Run a resolution and return the process exit code.
pub fn run_resolve(args: &ResolveArgs, config: &VaultConfig) -> Result<i32> {
    let span = info_span!("resolve_command", parts = %args.parts.display(), mode = ?args.mode);
    let _guard = span.enter();

    let result = run_resolution(&args.parts, config, None)?;
    let worklist = WorkList::new(&result.run.results).with_skipped(&result.run.skipped);
    let report = worklist.test_view();

    match args.mode {
        ModeArg::Test => {
            let styled = args.output.is_none() && io::stdout().is_terminal();
            let text = render_test_report(&report, styled);
            write_text(args.output.as_deref(), &text)?;
        }
        ModeArg::Print => {
            let text = render_print_report(&worklist.print_view());
            write_text(args.output.as_deref(), &text)?;
        }
        ModeArg::Jobs => {
            let jobs = worklist.build();
            match args.output.as_deref() {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("create {}", path.display()))?;
                    write_job_lines(&jobs, BufWriter::new(file))
                        .with_context(|| format!("write jobs: {}", path.display()))?;
                }
                None => write_job_lines(&jobs, io::stdout().lock()).context("write jobs")?,
            }
            info!(jobs = jobs.len(), "render jobs written");
        }
    }
    print_skipped(&report.skipped);

    let totals = report.totals;
    info!(
        items = totals.items,
        resolved = totals.resolved,
        ambiguous = totals.ambiguous,
        missing = totals.missing,
        skipped = totals.skipped,
        "run summary"
    );
    if args.fail_on_unresolved && totals.has_unresolved() {
        return Ok(EXIT_UNRESOLVED);
    }
    Ok(0)
}

fn write_text(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("write report: {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("write report")?;
            stdout.flush().context("flush stdout")
        }
    }
}
