//! Per-collection mapping from human-readable source values to slugs.

use std::collections::BTreeMap;

use relink_model::{Collection, SLUG_FIELD, Schema};
use tracing::debug;

use crate::slug::slugify;

/// Outcome of resolving one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Found in the target collection's registry.
    Registered(String),
    /// Not registered; the raw text was slugified directly.
    Fallback(String),
}

impl Resolution {
    pub fn slug(&self) -> &str {
        match self {
            Self::Registered(slug) | Self::Fallback(slug) => slug,
        }
    }

    pub fn into_slug(self) -> String {
        match self {
            Self::Registered(slug) | Self::Fallback(slug) => slug,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Collection name → (trimmed source value → slug).
///
/// When two source values of one collection produce the same slug both
/// entries are kept; when the same trimmed value is registered twice the
/// later registration wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugRegistry {
    collections: BTreeMap<String, BTreeMap<String, String>>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugifies `source_value` and records it under its trimmed form.
    pub fn register(&mut self, collection: &str, source_value: &str) -> String {
        let slug = slugify(source_value);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(source_value.trim().to_string(), slug.clone());
        slug
    }

    pub fn lookup(&self, collection: &str, source_value: &str) -> Option<&str> {
        self.collections
            .get(collection)
            .and_then(|values| values.get(source_value))
            .map(String::as_str)
    }

    /// Resolves `value` against `target`, falling back to slugifying it.
    ///
    /// A `None` target never matches.
    pub fn resolve(&self, target: Option<&str>, value: &str) -> Resolution {
        match target.and_then(|collection| self.lookup(collection, value)) {
            Some(slug) => Resolution::Registered(slug.to_string()),
            None => Resolution::Fallback(slugify(value)),
        }
    }

    pub fn collection_len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, BTreeMap::len)
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

/// Registers every schema'd collection and attaches each record's `slug`.
///
/// Records whose slug source is empty or absent get no slug and no
/// registry entry. Collections without a schema are left untouched.
pub fn build_registry(collections: &mut [Collection], schemas: &[Schema]) -> SlugRegistry {
    let mut registry = SlugRegistry::new();
    for schema in schemas {
        for collection in collections.iter_mut().filter(|c| c.name == schema.name()) {
            for record in &mut collection.records {
                let source = record.value(schema.slug_source()).to_string();
                if source.is_empty() {
                    continue;
                }
                let slug = registry.register(schema.name(), &source);
                record.set(SLUG_FIELD, slug);
            }
        }
        debug!(
            collection = schema.name(),
            entries = registry.collection_len(schema.name()),
            "registered slugs"
        );
    }
    registry
}
