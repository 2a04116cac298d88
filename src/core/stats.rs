use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// Build report for monitoring a loaded catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub record_counts: BTreeMap<String, usize>,
    pub links: Vec<LinkStats>,

    // Anomalies tolerated during the build
    pub duplicate_ids_replaced: usize,
    pub unmatched_supplement_rows: usize,

    pub build_ms: u64,
}

/// Outcome of one relationship step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkStats {
    pub step: String,
    pub linked: usize,
    pub unresolved: usize,  // references that named a missing record
}

impl CatalogStats {
    pub fn total_records(&self) -> usize {
        self.record_counts.values().sum()
    }

    pub fn total_unresolved(&self) -> usize {
        self.links.iter().map(|l| l.unresolved).sum()
    }
}
