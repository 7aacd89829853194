use std::path::PathBuf;

use relink_core::ResolutionStats;

#[derive(Debug)]
pub struct RunResult {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub collections: Vec<CollectionSummary>,
    /// Loaded tables with no configured schema.
    pub pass_through: Vec<String>,
    /// Configured collections with no input file.
    pub missing: Vec<String>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct CollectionSummary {
    pub collection: String,
    pub input_rows: usize,
    pub output_rows: usize,
    pub registry_entries: usize,
    pub stats: ResolutionStats,
    pub output: Option<PathBuf>,
}
