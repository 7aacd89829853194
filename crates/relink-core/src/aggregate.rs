//! Inverse relationship synthesis.

use std::collections::{BTreeMap, BTreeSet};

use relink_model::{Aggregation, Collection, Record};
use tracing::{debug, warn};

/// Separator between values of an aggregated field.
pub const AGGREGATE_SEPARATOR: &str = "; ";

/// Groups `records` on `group_field`, collecting `value_field` per group.
///
/// Records with an empty or absent group key are skipped, as are empty
/// values. Each group's values are deduplicated, sorted and joined with
/// `"; "`.
pub fn aggregate<'a, I>(
    records: I,
    group_field: &str,
    value_field: &str,
) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buckets: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        let key = record.value(group_field);
        if key.is_empty() {
            continue;
        }
        let bucket = buckets.entry(key).or_default();
        let value = record.value(value_field);
        if !value.is_empty() {
            bucket.insert(value);
        }
    }
    buckets
        .into_iter()
        .map(|(key, values)| {
            let joined = values.into_iter().collect::<Vec<_>>().join(AGGREGATE_SEPARATOR);
            (key.to_string(), joined)
        })
        .collect()
}

/// Writes the aggregated `source` values into each `target` record.
///
/// Target records are matched on the trimmed value of `parent_key`; a
/// target with no matching group gets an empty field. Returns the number
/// of target records that received a non-empty value.
pub fn apply_aggregation(collections: &mut [Collection], aggregation: &Aggregation) -> usize {
    let Some(source) = collections.iter().find(|c| c.name == aggregation.source) else {
        warn!(
            source_collection = %aggregation.source,
            target_collection = %aggregation.target,
            "aggregation source collection not loaded"
        );
        return 0;
    };
    let groups = aggregate(&source.records, &aggregation.group_field, &aggregation.value_field);

    let Some(target) = collections.iter_mut().find(|c| c.name == aggregation.target) else {
        warn!(
            source_collection = %aggregation.source,
            target_collection = %aggregation.target,
            "aggregation target collection not loaded"
        );
        return 0;
    };
    let mut filled = 0usize;
    for record in &mut target.records {
        let value = groups
            .get(record.value(&aggregation.parent_key).trim())
            .cloned()
            .unwrap_or_default();
        if !value.is_empty() {
            filled += 1;
        }
        record.set(aggregation.field.clone(), value);
    }
    debug!(
        target_collection = %aggregation.target,
        field = %aggregation.field,
        groups = groups.len(),
        filled,
        "applied aggregation"
    );
    filled
}
