//! Engine configuration: collection schemas, reference targets and
//! synthesized inverse relationships.
//!
//! The built-in configuration describes the water-quality monitoring
//! dataset (stations, waterbodies, watersheds, organizations). A JSON file
//! with the same shape can replace it.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::record::SLUG_FIELD;
use crate::schema::{ReferenceTargets, Schema};

/// Raw per-collection schema as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Fields to emit, in output order.
    pub keep: Vec<String>,
    /// Field whose value the record's slug is derived from.
    pub slug_source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub single_ref_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multi_ref_fields: Vec<String>,
}

/// Synthesizes `target.field` by inverting `source.group_field`.
///
/// Source records are grouped on `group_field`; each group's `value_field`
/// values become the `field` of the target record whose `parent_key`
/// equals the group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Aggregation {
    pub target: String,
    pub parent_key: String,
    pub field: String,
    pub source: String,
    pub group_field: String,
    pub value_field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub collections: IndexMap<String, SchemaConfig>,
    #[serde(default)]
    pub reference_targets: IndexMap<String, String>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_water_quality()
    }
}

impl EngineConfig {
    /// Built-in configuration for the monitoring-site dataset.
    pub fn default_water_quality() -> Self {
        let mut collections = IndexMap::new();
        collections.insert(
            "Stations".to_string(),
            schema(
                &[
                    "SiteID",
                    "Site Name",
                    "Latitude",
                    "Longitude",
                    "Site Description",
                    "Monitoring Info",
                    "Waterbody",
                    "Watersheds (from Waterbody) 2",
                    "Monitoring Organization",
                    "Most Recent Ecoli Reading",
                    "Most Recent Sample Date",
                ],
                "SiteID",
                &["Waterbody", "Watersheds (from Waterbody) 2"],
                &["Monitoring Organization"],
            ),
        );
        collections.insert(
            "Waterbodies".to_string(),
            schema(
                &["Name", "Watersheds", "Monitoring Sites", "Sites"],
                "Name",
                &["Watersheds"],
                &["Monitoring Sites"],
            ),
        );
        collections.insert(
            "Watersheds".to_string(),
            schema(
                &["Name", "Waterbodies", "Monitoring Sites (from Waterbodies)", "Sites"],
                "Name",
                &[],
                &["Waterbodies", "Monitoring Sites (from Waterbodies)"],
            ),
        );
        collections.insert(
            "Organizations".to_string(),
            schema(
                &[
                    "Organization Name",
                    "Logo",
                    "Organization Website",
                    "Organization Description",
                    "Monitoring Sites",
                    "Sites",
                ],
                "Organization Name",
                &[],
                &["Monitoring Sites"],
            ),
        );

        let reference_targets = [
            ("Monitoring Organization", "Organizations"),
            ("Monitoring Sites", "Stations"),
            ("Monitoring Sites (from Waterbodies)", "Stations"),
            ("Waterbodies", "Waterbodies"),
            ("Watersheds", "Watersheds"),
            ("Sites", "Stations"),
            ("Waterbody", "Waterbodies"),
            ("Watersheds (from Waterbody) 2", "Watersheds"),
        ]
        .into_iter()
        .map(|(field, target)| (field.to_string(), target.to_string()))
        .collect();

        let aggregations = vec![
            sites_of("Organizations", "Organization Name", "Monitoring Organization"),
            sites_of("Waterbodies", "Name", "Waterbody"),
            sites_of("Watersheds", "Name", "Watersheds (from Waterbody) 2"),
            Aggregation {
                target: "Watersheds".to_string(),
                parent_key: "Name".to_string(),
                field: "Waterbodies".to_string(),
                source: "Waterbodies".to_string(),
                group_field: "Watersheds".to_string(),
                value_field: SLUG_FIELD.to_string(),
            },
        ];

        Self {
            collections,
            reference_targets,
            aggregations,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn reference_targets(&self) -> ReferenceTargets {
        self.reference_targets
            .iter()
            .map(|(field, target)| (field.clone(), target.clone()))
            .collect()
    }

    /// Builds and validates every configured schema, in configuration order.
    /// Fields filled by an aggregation are marked [`crate::schema::FieldKind::Aggregated`].
    pub fn schemas(&self) -> Result<Vec<Schema>> {
        for aggregation in &self.aggregations {
            if !self.collections.contains_key(&aggregation.target) {
                return Err(ModelError::UnknownAggregationTarget {
                    collection: aggregation.target.clone(),
                    field: aggregation.field.clone(),
                });
            }
        }
        let targets = self.reference_targets();
        let mut schemas = self
            .collections
            .iter()
            .map(|(name, config)| Schema::from_config(name, config, &targets))
            .collect::<Result<Vec<_>>>()?;
        for aggregation in &self.aggregations {
            for schema in schemas.iter_mut().filter(|s| s.name() == aggregation.target) {
                schema.mark_aggregated(&aggregation.field);
            }
        }
        Ok(schemas)
    }
}

fn schema(keep: &[&str], slug_source: &str, single: &[&str], multi: &[&str]) -> SchemaConfig {
    let owned =
        |fields: &[&str]| -> Vec<String> { fields.iter().map(|f| (*f).to_string()).collect() };
    SchemaConfig {
        keep: owned(keep),
        slug_source: slug_source.to_string(),
        single_ref_fields: owned(single),
        multi_ref_fields: owned(multi),
    }
}

fn sites_of(target: &str, parent_key: &str, group_field: &str) -> Aggregation {
    Aggregation {
        target: target.to_string(),
        parent_key: parent_key.to_string(),
        field: "Sites".to_string(),
        source: "Stations".to_string(),
        group_field: group_field.to_string(),
        value_field: SLUG_FIELD.to_string(),
    }
}
