use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::builder::builder::CatalogBuilder;
use crate::core::config::CatalogConfig;
use crate::core::error::Result;
use crate::ingest::raw::{Annotation, RawRecord};
use crate::schema::schema::CatalogLayout;

/// File names for one entity type inside a catalog directory
#[derive(Debug, Clone)]
pub struct CatalogFiles {
    pub records: PathBuf,      // <type>.json: [RawRecord]
    pub annotations: PathBuf,  // <type>_annotations.json: { id: [Annotation] }
    pub additional: PathBuf,   // <type>_additional.json: { id: { field: value } }
}

impl CatalogFiles {
    pub fn new(dir: &Path, type_name: &str) -> Self {
        CatalogFiles {
            records: dir.join(format!("{}.json", type_name)),
            annotations: dir.join(format!("{}_annotations.json", type_name)),
            additional: dir.join(format!("{}_additional.json", type_name)),
        }
    }
}

/// Reads every declared type from `dir` into a builder. Missing files mean
/// an empty collection.
pub fn load_dir(dir: &Path, layout: CatalogLayout, config: CatalogConfig) -> Result<CatalogBuilder> {
    let mut builder = CatalogBuilder::new(layout.clone(), config)?;

    for entity in &layout.entities {
        let files = CatalogFiles::new(dir, entity.name.as_str());

        let mut records: Vec<RawRecord> = read_json(&files.records)?.unwrap_or_default();
        if let Some(annotations) = read_json::<HashMap<String, Vec<Annotation>>>(&files.annotations)? {
            attach_annotations(&mut records, annotations);
        }
        debug!(entity = %entity.name, records = records.len(), "loaded records");
        builder.add_records(entity.name.as_str(), records)?;

        if let Some(rows) = read_json::<HashMap<String, serde_json::Value>>(&files.additional)? {
            debug!(entity = %entity.name, rows = rows.len(), "loaded supplementary rows");
            builder.supplement_json(entity.name.as_str(), rows)?;
        }
    }

    Ok(builder)
}

/// Appends annotations kept in a separate id-keyed list.
pub fn attach_annotations(records: &mut [RawRecord], mut annotations: HashMap<String, Vec<Annotation>>) {
    for record in records.iter_mut() {
        if let Some(extra) = annotations.remove(&record.id) {
            record.annotations.extend(extra);
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}
