//! Two-phase normalization of a whole dataset.

use indexmap::IndexMap;
use relink_model::{Aggregation, Collection, EngineConfig, Record, Result, Schema};
use tracing::{debug, info, info_span, warn};

use crate::aggregate::apply_aggregation;
use crate::project::{ResolutionStats, project_with_stats};
use crate::registry::{SlugRegistry, build_registry};

/// Projected rows of one configured collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    pub collection: String,
    /// Kept fields followed by `slug`.
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
    pub stats: ResolutionStats,
}

impl OutputTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of one normalization run.
#[derive(Debug, Clone)]
pub struct NormalizeOutput {
    /// One table per configured collection that had input, in config order.
    pub tables: Vec<OutputTable>,
    /// The completed registry the tables were resolved against.
    pub registry: SlugRegistry,
    /// Loaded tables with no configured schema.
    pub pass_through: Vec<String>,
    /// Configured collections with no input table.
    pub missing: Vec<String>,
}

/// Validated configuration, ready to normalize any number of datasets.
#[derive(Debug, Clone)]
pub struct Normalizer {
    schemas: Vec<Schema>,
    aggregations: Vec<Aggregation>,
}

impl Normalizer {
    /// # Errors
    ///
    /// Returns the first schema or aggregation configuration error.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            schemas: config.schemas()?,
            aggregations: config.aggregations.clone(),
        })
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// Builds the registry, applies aggregations, then projects every
    /// configured collection. Tables sharing a name are concatenated.
    pub fn run(&self, collections: Vec<Collection>) -> NormalizeOutput {
        let mut collections = merge_by_name(collections);

        let registry = info_span!("build_registry").in_scope(|| {
            let registry = build_registry(&mut collections, &self.schemas);
            for aggregation in &self.aggregations {
                apply_aggregation(&mut collections, aggregation);
            }
            info!(
                collections = registry.collection_names().count(),
                aggregations = self.aggregations.len(),
                "registry built"
            );
            registry
        });

        let mut missing = Vec::new();
        let tables = info_span!("project").in_scope(|| {
            let mut tables = Vec::with_capacity(self.schemas.len());
            for schema in &self.schemas {
                let Some(collection) = collections.iter().find(|c| c.name == schema.name())
                else {
                    warn!(collection = schema.name(), "configured collection has no input table");
                    missing.push(schema.name().to_string());
                    continue;
                };
                let mut stats = ResolutionStats::default();
                let rows = collection
                    .records
                    .iter()
                    .map(|record| project_with_stats(record, schema, &registry, &mut stats))
                    .collect::<Vec<_>>();
                debug!(
                    collection = schema.name(),
                    rows = rows.len(),
                    resolved = stats.resolved,
                    fallbacks = stats.fallbacks,
                    "projected collection"
                );
                tables.push(OutputTable {
                    collection: schema.name().to_string(),
                    headers: schema.output_headers(),
                    rows,
                    stats,
                });
            }
            tables
        });

        let pass_through: Vec<String> = collections
            .iter()
            .filter(|c| !self.schemas.iter().any(|s| s.name() == c.name))
            .map(|c| c.name.clone())
            .collect();
        for name in &pass_through {
            debug!(collection = %name, "no schema configured; table passed through");
        }

        NormalizeOutput {
            tables,
            registry,
            pass_through,
            missing,
        }
    }
}

fn merge_by_name(collections: Vec<Collection>) -> Vec<Collection> {
    let mut merged: IndexMap<String, Collection> = IndexMap::new();
    for collection in collections {
        match merged.get_mut(&collection.name) {
            Some(existing) => existing.records.extend(collection.records),
            None => {
                merged.insert(collection.name.clone(), collection);
            }
        }
    }
    merged.into_values().collect()
}
