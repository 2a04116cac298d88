use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::warn;
use crate::core::config::CatalogConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::CatalogStats;
use crate::core::types::{EntityType, Record};
use crate::query::ast::Condition;
use crate::query::cache::{CacheStats, FacetCache};
use crate::query::matcher::RecordMatcher;
use crate::search::facets::{self, FacetValue};

/// Records of one entity type in load order, plus an id index
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub(crate) records: Vec<Record>,
    pub(crate) by_id: HashMap<String, usize>,
}

impl Collection {
    /// Indexes `records` by id. Returns the collection and the number of ids
    /// that were replaced when duplicates are tolerated.
    pub(crate) fn index(entity: &EntityType, records: Vec<Record>, reject_duplicates: bool) -> Result<(Self, usize)> {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut replaced = 0;

        for (pos, record) in records.iter().enumerate() {
            if let Some(previous) = by_id.insert(record.id.clone(), pos) {
                if reject_duplicates {
                    return Err(Error::new(
                        ErrorKind::DuplicateId,
                        format!("{} id '{}' appears at positions {} and {}", entity, record.id, previous, pos),
                    ));
                }
                warn!(entity = %entity, id = %record.id, "duplicate id, later record wins");
                replaced += 1;
            }
        }

        Ok((Collection { records, by_id }, replaced))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).map(|&pos| &self.records[pos])
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Frozen, fully linked catalog. Read-only after `CatalogBuilder::build`.
pub struct Catalog {
    collections: HashMap<EntityType, Collection>,
    types: Vec<EntityType>,
    stats: CatalogStats,
    cache: FacetCache,
}

impl Catalog {
    pub(crate) fn new(
        collections: HashMap<EntityType, Collection>,
        types: Vec<EntityType>,
        stats: CatalogStats,
        config: &CatalogConfig,
    ) -> Self {
        Catalog {
            collections,
            types,
            stats,
            cache: FacetCache::new(config.facet_cache_capacity),
        }
    }

    /// Registered types in layout order
    pub fn types(&self) -> &[EntityType] {
        &self.types
    }

    pub fn collection(&self, entity: &str) -> Result<&Collection> {
        self.collections
            .get(entity)
            .ok_or_else(|| Error::unknown_type(entity))
    }

    /// Union of keys across the collection; empty for an empty collection.
    pub fn fields(&self, entity: &str) -> Result<BTreeSet<String>> {
        let collection = self.collection(entity)?;
        Ok(collection
            .records
            .iter()
            .flat_map(|r| r.fields.keys().cloned())
            .collect())
    }

    /// Keys that never hold a list or object value.
    pub fn primitive_fields(&self, entity: &str) -> Result<BTreeSet<String>> {
        let collection = self.collection(entity)?;
        let mut primitive = BTreeSet::new();
        let mut structured = BTreeSet::new();

        for record in &collection.records {
            for (key, value) in &record.fields {
                if value.is_structured() {
                    structured.insert(key.as_str());
                } else {
                    primitive.insert(key.as_str());
                }
            }
        }

        Ok(primitive
            .difference(&structured)
            .map(|k| k.to_string())
            .collect())
    }

    pub fn count(&self, entity: &str) -> Result<usize> {
        Ok(self.collection(entity)?.len())
    }

    pub fn get(&self, entity: &str, id: &str) -> Result<Option<&Record>> {
        Ok(self.collection(entity)?.get(id))
    }

    /// Records matching every field group (AND), where conditions sharing a
    /// field are alternatives (OR). Load order is preserved.
    pub fn query(&self, entity: &str, conditions: &[Condition]) -> Result<Vec<&Record>> {
        let collection = self.collection(entity)?;
        Ok(RecordMatcher::new(conditions).filter(&collection.records))
    }

    pub fn facet_summary(&self, entity: &str, field: &str, conditions: &[Condition]) -> Result<Vec<FacetValue>> {
        let collection = self.collection(entity)?;
        Ok(facets::facet_summary(&collection.records, field, conditions))
    }

    /// Several facets of one type, computed in parallel, in `fields` order.
    pub fn facet_summaries(&self, entity: &str, fields: &[&str], conditions: &[Condition]) -> Result<Vec<Vec<FacetValue>>> {
        let collection = self.collection(entity)?;
        Ok(facets::facet_summaries(&collection.records, fields, conditions))
    }

    /// `facet_summary` through the catalog's LRU cache.
    pub fn cached_facet_summary(&self, entity: &str, field: &str, conditions: &[Condition]) -> Result<Vec<FacetValue>> {
        let collection = self.collection(entity)?;
        Ok(self.cache.get_or_compute(entity, field, conditions, || {
            facets::facet_summary(&collection.records, field, conditions)
        }))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("types", &self.types)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
