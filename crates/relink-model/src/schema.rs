//! Per-collection schemas with field kinds resolved at construction time.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::warn;

use crate::config::SchemaConfig;
use crate::error::{ModelError, Result};
use crate::record::SLUG_FIELD;

/// How a kept field is emitted during projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Raw text passed through verbatim.
    Plain,
    /// Exactly one reference into `target`.
    SingleRef { target: Option<String> },
    /// Zero or more comma-separated references into `target`.
    MultiRef { target: Option<String> },
    /// Filled by an aggregation with already-resolved slugs; passed through.
    Aggregated,
}

impl FieldKind {
    /// Collection a reference field points at. `None` for plain fields and
    /// for reference fields without a known target, whose lookups always miss.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Plain | Self::Aggregated => None,
            Self::SingleRef { target } | Self::MultiRef { target } => target.as_deref(),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::SingleRef { .. } | Self::MultiRef { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::SingleRef { .. } => "single-ref",
            Self::MultiRef { .. } => "multi-ref",
            Self::Aggregated => "aggregated",
        }
    }
}

/// Static table from reference field name to the collection it targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTargets {
    targets: IndexMap<String, String>,
}

impl ReferenceTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, collection: impl Into<String>) {
        self.targets.insert(field.into(), collection.into());
    }

    /// Collection targeted by `field`, or `None` when the field is unknown.
    pub fn target_collection_of(&self, field: &str) -> Option<&str> {
        self.targets.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.targets.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for ReferenceTargets
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut targets = Self::new();
        for (field, collection) in iter {
            targets.insert(field, collection);
        }
        targets
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
}

/// Validated schema of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    slug_source: String,
    fields: Vec<SchemaField>,
}

impl Schema {
    /// Builds a schema, deciding each kept field's kind once.
    ///
    /// # Errors
    ///
    /// Fails when the slug source is blank, a kept field repeats, a field is
    /// both a single and a multi reference, or a reference field is not kept.
    pub fn from_config(
        name: &str,
        config: &SchemaConfig,
        targets: &ReferenceTargets,
    ) -> Result<Self> {
        let slug_source = config.slug_source.trim();
        if slug_source.is_empty() {
            return Err(ModelError::EmptySlugSource {
                collection: name.to_string(),
            });
        }

        let single: BTreeSet<&str> = config.single_ref_fields.iter().map(String::as_str).collect();
        let multi: BTreeSet<&str> = config.multi_ref_fields.iter().map(String::as_str).collect();
        if let Some(field) = single.intersection(&multi).next() {
            return Err(ModelError::ConflictingFieldKind {
                collection: name.to_string(),
                field: (*field).to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for field in &config.keep {
            if !seen.insert(field.as_str()) {
                return Err(ModelError::DuplicateField {
                    collection: name.to_string(),
                    field: field.clone(),
                });
            }
        }
        if let Some(field) = single.iter().chain(&multi).find(|f| !seen.contains(*f)) {
            return Err(ModelError::RefFieldNotKept {
                collection: name.to_string(),
                field: (*field).to_string(),
            });
        }

        let fields = config
            .keep
            .iter()
            .map(|field| {
                let kind = if multi.contains(field.as_str()) {
                    FieldKind::MultiRef {
                        target: lookup_target(name, field, targets),
                    }
                } else if single.contains(field.as_str()) {
                    FieldKind::SingleRef {
                        target: lookup_target(name, field, targets),
                    }
                } else {
                    FieldKind::Plain
                };
                SchemaField {
                    name: field.clone(),
                    kind,
                }
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            slug_source: slug_source.to_string(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug_source(&self) -> &str {
        &self.slug_source
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Marks a kept field as synthesized by an aggregation, replacing any
    /// reference kind so its joined slugs are not parsed again.
    pub(crate) fn mark_aggregated(&mut self, field: &str) {
        if let Some(schema_field) = self.fields.iter_mut().find(|f| f.name == field) {
            schema_field.kind = FieldKind::Aggregated;
        }
    }

    /// Column order of projected output: kept fields, then `slug`.
    pub fn output_headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = self.fields.iter().map(|f| f.name.clone()).collect();
        if !headers.iter().any(|h| h == SLUG_FIELD) {
            headers.push(SLUG_FIELD.to_string());
        }
        headers
    }
}

fn lookup_target(collection: &str, field: &str, targets: &ReferenceTargets) -> Option<String> {
    let target = targets.target_collection_of(field).map(str::to_string);
    if target.is_none() {
        warn!(
            collection,
            field, "reference field has no target collection; values will be slugified directly"
        );
    }
    target
}
