//! Normalization run with explicit stages.
//!
//! 1. **Load**: discover input CSVs and group them into collections
//! 2. **Normalize**: build the slug registry, synthesize inverse
//!    relationships, project every configured collection
//! 3. **Output**: write one CSV per configured collection

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use relink_core::Normalizer;
use relink_ingest::load_collections;
use relink_model::EngineConfig;
use relink_output::{OutputOptions, write_tables};
use tracing::{info, info_span};

use crate::types::{CollectionSummary, RunResult};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub output: OutputOptions,
}

/// Loads the JSON configuration at `path`, or the built-in one.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

pub fn run_normalize(
    input_dir: &Path,
    config: &EngineConfig,
    options: &RunOptions,
) -> Result<RunResult> {
    let normalizer = Normalizer::new(config).context("validate config")?;

    let load_start = Instant::now();
    let collections = info_span!("load", input_dir = %input_dir.display())
        .in_scope(|| load_collections(input_dir))
        .context("load input tables")?;
    let input_rows: BTreeMap<String, usize> = collections
        .iter()
        .map(|c| (c.name.clone(), c.len()))
        .fold(BTreeMap::new(), |mut counts, (name, rows)| {
            *counts.entry(name).or_default() += rows;
            counts
        });
    info!(
        collections = collections.len(),
        duration_ms = load_start.elapsed().as_millis(),
        "load complete"
    );

    let normalize_start = Instant::now();
    let output = normalizer.run(collections);
    info!(
        tables = output.tables.len(),
        duration_ms = normalize_start.elapsed().as_millis(),
        "normalize complete"
    );

    let written = if options.dry_run {
        info!("dry run; skipping output");
        Vec::new()
    } else {
        info_span!("output", output_dir = %options.output_dir.display())
            .in_scope(|| write_tables(&options.output_dir, &output.tables, options.output))
            .context("write output tables")?
    };

    let collections = output
        .tables
        .iter()
        .enumerate()
        .map(|(idx, table)| CollectionSummary {
            collection: table.collection.clone(),
            input_rows: input_rows.get(&table.collection).copied().unwrap_or(0),
            output_rows: table.len(),
            registry_entries: output.registry.collection_len(&table.collection),
            stats: table.stats,
            output: written.get(idx).cloned(),
        })
        .collect();

    Ok(RunResult {
        input_dir: input_dir.to_path_buf(),
        output_dir: options.output_dir.clone(),
        collections,
        pass_through: output.pass_through,
        missing: output.missing,
        dry_run: options.dry_run,
    })
}
