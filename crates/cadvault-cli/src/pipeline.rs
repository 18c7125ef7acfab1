//! Resolution pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Index**: Scan the library root once into an immutable index
//! 2. **Ingest**: Read the parts list
//! 3. **Resolve**: Map every row to its part, assembly and drawing files
//!
//! The index is complete before the first row is resolved.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cadvault_index::{AbortSignal, Index, IndexStats, build_index};
use cadvault_ingest::{PartsList, read_parts_csv};
use cadvault_resolve::{ResolutionRun, Resolver};

use crate::config::VaultConfig;

/// Everything a command needs to report on a finished run.
#[derive(Debug)]
pub struct PipelineResult {
    pub stats: IndexStats,
    pub parts: PartsList,
    pub run: ResolutionRun,
}

// ============================================================================
// Stage 1: Index
// ============================================================================

/// Scan the configured library root.
pub fn index_library(config: &VaultConfig, abort: Option<AbortSignal>) -> Result<Index> {
    let span = info_span!("index", root = %config.library_root.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut options = config.index_options()?;
    if let Some(signal) = abort {
        options = options.with_abort(signal);
    }
    let index = build_index(&config.library_root, &options)
        .with_context(|| format!("index library: {}", config.library_root.display()))?;

    info!(
        files = index.len(),
        base_tokens = index.base_token_count(),
        duration_ms = start.elapsed().as_millis(),
        "index stage complete"
    );
    Ok(index)
}

// ============================================================================
// Stage 2: Ingest
// ============================================================================

pub fn ingest_parts(parts_path: &Path) -> Result<PartsList> {
    let span = info_span!("ingest", path = %parts_path.display());
    let _guard = span.enter();
    read_parts_csv(parts_path).with_context(|| format!("read parts list: {}", parts_path.display()))
}

// ============================================================================
// Stage 3: Resolve
// ============================================================================

pub fn resolve_parts(index: &Index, parts: &PartsList, threads: usize) -> ResolutionRun {
    let span = info_span!("resolve", rows = parts.len(), threads);
    let _guard = span.enter();
    let rows: Vec<_> = parts.rows.iter().map(|row| (row.row, &row.record)).collect();
    Resolver::new(index).resolve_rows(&rows, threads)
}

/// Run all three stages for one parts list.
pub fn run_resolution(
    parts_path: &Path,
    config: &VaultConfig,
    abort: Option<AbortSignal>,
) -> Result<PipelineResult> {
    let index = index_library(config, abort)?;
    let parts = ingest_parts(parts_path)?;
    let run = resolve_parts(&index, &parts, config.threads);
    Ok(PipelineResult {
        stats: index.stats(),
        parts,
        run,
    })
}
