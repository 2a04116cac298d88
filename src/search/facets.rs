use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use crate::core::types::{FieldValue, Record, ValueKey};
use crate::query::ast::Condition;
use crate::query::matcher::RecordMatcher;

/// One option of a facet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetValue {
    pub value: FieldValue,
    pub all: usize,    // records holding this value
    pub count: usize,  // of those, records passing the conditions on other fields
}

/// Value counts of `field`, sorted by `all` descending. Ties keep the order
/// in which values were first seen.
pub fn facet_summary(records: &[Record], field: &str, conditions: &[Condition]) -> Vec<FacetValue> {
    let matcher = RecordMatcher::excluding_field(conditions, field);
    let mut buckets: Vec<FacetValue> = Vec::new();
    let mut positions: HashMap<ValueKey, usize> = HashMap::new();

    for record in records {
        let Some(value) = record.get_field(field) else {
            continue;
        };

        let pos = *positions.entry(value.facet_key()).or_insert_with(|| {
            buckets.push(FacetValue {
                value: value.clone(),
                all: 0,
                count: 0,
            });
            buckets.len() - 1
        });

        let bucket = &mut buckets[pos];
        bucket.all += 1;
        if matcher.matches(record) {
            bucket.count += 1;
        }
    }

    buckets.sort_by(|a, b| b.all.cmp(&a.all));
    buckets
}

/// Independent summaries per field, computed on the rayon pool.
pub fn facet_summaries(records: &[Record], fields: &[&str], conditions: &[Condition]) -> Vec<Vec<FacetValue>> {
    fields
        .par_iter()
        .map(|field| facet_summary(records, field, conditions))
        .collect()
}
