//! Schema-driven record projection.

use relink_model::{FieldKind, Record, SLUG_FIELD, Schema};
use tracing::trace;

use crate::cell::parse_multi_value;
use crate::registry::{Resolution, SlugRegistry};
use crate::slug::slugify;

/// Separator between resolved slugs of a multi-reference field.
pub const MULTI_REF_SEPARATOR: &str = ";";

/// Counts of how references were resolved during projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// References found in the target collection's registry.
    pub resolved: usize,
    /// References slugified directly because no registry entry matched.
    pub fallbacks: usize,
    /// Output records whose own slug came out empty.
    pub empty_slugs: usize,
}

impl ResolutionStats {
    fn record(&mut self, resolution: &Resolution) {
        if resolution.is_fallback() {
            self.fallbacks += 1;
        } else {
            self.resolved += 1;
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.resolved += other.resolved;
        self.fallbacks += other.fallbacks;
        self.empty_slugs += other.empty_slugs;
    }
}

/// Projects `record` onto `schema`, resolving references via `registry`.
pub fn project(record: &Record, schema: &Schema, registry: &SlugRegistry) -> Record {
    project_with_stats(record, schema, registry, &mut ResolutionStats::default())
}

/// Like [`project`], accumulating resolution counts into `stats`.
pub fn project_with_stats(
    record: &Record,
    schema: &Schema,
    registry: &SlugRegistry,
    stats: &mut ResolutionStats,
) -> Record {
    let mut output = Record::new();
    for field in schema.fields() {
        let raw = record.value(&field.name);
        let value = match &field.kind {
            FieldKind::Plain | FieldKind::Aggregated => raw.to_string(),
            FieldKind::SingleRef { target } => {
                let reference = raw.trim();
                if reference.is_empty() {
                    String::new()
                } else {
                    resolve(registry, target.as_deref(), reference, stats)
                }
            }
            FieldKind::MultiRef { target } => parse_multi_value(raw)
                .iter()
                .map(|token| resolve(registry, target.as_deref(), token, stats))
                .filter(|slug| !slug.is_empty())
                .collect::<Vec<_>>()
                .join(MULTI_REF_SEPARATOR),
        };
        output.set(field.name.clone(), value);
    }

    let slug = slugify(record.value(schema.slug_source()));
    if slug.is_empty() {
        stats.empty_slugs += 1;
    }
    output.set(SLUG_FIELD, slug);
    output
}

fn resolve(
    registry: &SlugRegistry,
    target: Option<&str>,
    reference: &str,
    stats: &mut ResolutionStats,
) -> String {
    let resolution = registry.resolve(target, reference);
    stats.record(&resolution);
    if resolution.is_fallback() {
        trace!(
            target_collection = target.unwrap_or("unknown"),
            reference,
            slug = resolution.slug(),
            "unresolved reference slugified directly"
        );
    }
    resolution.into_slug()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_model::{Aggregation, EngineConfig, ReferenceTargets, SchemaConfig};

    fn stations_schema() -> Schema {
        let config = SchemaConfig {
            keep: vec![
                "SiteID".to_string(),
                "Site Name".to_string(),
                "Waterbody".to_string(),
                "Monitoring Organization".to_string(),
                "Mystery".to_string(),
            ],
            slug_source: "SiteID".to_string(),
            single_ref_fields: vec!["Waterbody".to_string(), "Mystery".to_string()],
            multi_ref_fields: vec!["Monitoring Organization".to_string()],
        };
        let targets: ReferenceTargets = [
            ("Waterbody", "Waterbodies"),
            ("Monitoring Organization", "Organizations"),
        ]
        .into_iter()
        .collect();
        Schema::from_config("Stations", &config, &targets).expect("schema")
    }

    fn registry() -> SlugRegistry {
        let mut registry = SlugRegistry::new();
        registry.register("Waterbodies", "Bear Creek");
        registry.register("Organizations", "Acme River Watch");
        registry.register("Organizations", "Friends of the Lake");
        registry
    }

    #[test]
    fn projects_kept_fields_and_appends_slug() {
        let record = Record::from_pairs([
            ("SiteID", "BC-01"),
            ("Site Name", "Bear Creek at Main St"),
            ("Waterbody", " Bear Creek "),
            ("Monitoring Organization", "Friends of the Lake, Acme River Watch"),
            ("Dropped", "x"),
        ]);
        let mut stats = ResolutionStats::default();
        let out = project_with_stats(&record, &stations_schema(), &registry(), &mut stats);

        let pairs: Vec<_> = out.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("SiteID", "BC-01"),
                ("Site Name", "Bear Creek at Main St"),
                ("Waterbody", "bear-creek"),
                ("Monitoring Organization", "friends-of-the-lake;acme-river-watch"),
                ("Mystery", ""),
                ("slug", "bc-01"),
            ]
        );
        assert_eq!(stats.resolved, 3);
        assert_eq!(stats.fallbacks, 0);
    }

    #[test]
    fn unresolved_references_fall_back_to_slugify() {
        let record = Record::from_pairs([
            ("SiteID", "X"),
            ("Waterbody", "Unknown Pond"),
            ("Mystery", "Bear Creek"),
            ("Monitoring Organization", r#""Smith, Jones & Co", Acme River Watch"#),
        ]);
        let mut stats = ResolutionStats::default();
        let out = project_with_stats(&record, &stations_schema(), &registry(), &mut stats);

        assert_eq!(out.value("Waterbody"), "unknown-pond");
        assert_eq!(out.value("Mystery"), "bear-creek");
        assert_eq!(
            out.value("Monitoring Organization"),
            "smith-jones-and-co;acme-river-watch"
        );
        assert_eq!(stats.fallbacks, 3);
        assert_eq!(stats.resolved, 1);
    }

    #[test]
    fn multi_ref_keeps_source_order_and_duplicates() {
        let record = Record::from_pairs([(
            "Monitoring Organization",
            "Acme River Watch, Friends of the Lake, Acme River Watch, ...",
        )]);
        let out = project(&record, &stations_schema(), &registry());
        assert_eq!(
            out.value("Monitoring Organization"),
            "acme-river-watch;friends-of-the-lake;acme-river-watch"
        );
    }

    #[test]
    fn aggregated_fields_pass_through_unparsed() {
        let config = EngineConfig {
            collections: [(
                "Watersheds".to_string(),
                SchemaConfig {
                    keep: vec!["Name".to_string(), "Waterbodies".to_string()],
                    slug_source: "Name".to_string(),
                    single_ref_fields: vec![],
                    multi_ref_fields: vec!["Waterbodies".to_string()],
                },
            )]
            .into_iter()
            .collect(),
            reference_targets: [("Waterbodies".to_string(), "Waterbodies".to_string())]
                .into_iter()
                .collect(),
            aggregations: vec![Aggregation {
                target: "Watersheds".to_string(),
                parent_key: "Name".to_string(),
                field: "Waterbodies".to_string(),
                source: "Waterbodies".to_string(),
                group_field: "Watersheds".to_string(),
                value_field: SLUG_FIELD.to_string(),
            }],
        };
        let schemas = config.schemas().expect("schemas");
        let record =
            Record::from_pairs([("Name", "Upper"), ("Waterbodies", "bear-creek; lost-lake")]);

        let mut stats = ResolutionStats::default();
        let out = project_with_stats(&record, &schemas[0], &registry(), &mut stats);

        assert_eq!(out.value("Waterbodies"), "bear-creek; lost-lake");
        assert_eq!(out.value(SLUG_FIELD), "upper");
        assert_eq!(stats, ResolutionStats::default());
    }

    #[test]
    fn missing_fields_become_empty_and_slug_is_always_present() {
        let mut stats = ResolutionStats::default();
        let out = project_with_stats(&Record::new(), &stations_schema(), &registry(), &mut stats);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|(_, v)| v.is_empty()));
        assert_eq!(out.get(SLUG_FIELD), Some(""));
        assert_eq!(stats, ResolutionStats { resolved: 0, fallbacks: 0, empty_slugs: 1 });
    }
}
