use lru::LruCache;
use parking_lot::Mutex;
use serde::{Serialize, Deserialize};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::query::ast::Condition;
use crate::search::facets::FacetValue;

/// Facet cache for avoiding recomputation
pub struct FacetCache {
    pub cache: Option<Mutex<LruCache<FacetKey, Vec<FacetValue>>>>,  // None when capacity is 0
    pub size_limit: usize,
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FacetKey {
    pub entity: String,
    pub field: String,
    pub conditions: Vec<String>,
}

impl FacetKey {
    /// Conditions on `field` never affect the summary, so they are left out;
    /// the rest are sorted because grouping is order-insensitive. Values are
    /// keyed by their exact `Debug` form, which keeps `NaN`, `inf` and `-inf`
    /// apart and never folds text into numbers.
    pub fn new(entity: &str, field: &str, conditions: &[Condition]) -> Self {
        let mut canonical: Vec<String> = conditions
            .iter()
            .filter(|c| c.field != field)
            .map(|c| format!("{:?}", c))
            .collect();
        canonical.sort();
        canonical.dedup();

        FacetKey {
            entity: entity.to_string(),
            field: field.to_string(),
            conditions: canonical,
        }
    }
}

impl FacetCache {
    pub fn new(size_limit: usize) -> Self {
        FacetCache {
            cache: NonZeroUsize::new(size_limit).map(|cap| Mutex::new(LruCache::new(cap))),
            size_limit,
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        }
    }

    pub fn get_or_compute<F>(&self, entity: &str, field: &str, conditions: &[Condition], compute: F) -> Vec<FacetValue>
    where
        F: FnOnce() -> Vec<FacetValue>,
    {
        let Some(cache) = &self.cache else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
            return compute();
        };

        let key = FacetKey::new(entity, field, conditions);
        if let Some(hit) = cache.lock().get(&key) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            return hit.clone();
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        let summary = compute();
        cache.lock().put(key, summary.clone());
        summary
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.cache.as_ref().map_or(0, |c| c.lock().len()),
            capacity: self.size_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}
