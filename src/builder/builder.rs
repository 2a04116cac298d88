use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info};
use crate::builder::enrich::{self, SupplementRows};
use crate::builder::links::{self, Collections};
use crate::core::catalog::{Catalog, Collection};
use crate::core::config::CatalogConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::CatalogStats;
use crate::core::types::{EntityType, FieldValue, Record};
use crate::ingest::normalize::normalize;
use crate::ingest::raw::RawRecord;
use crate::schema::schema::CatalogLayout;

/// Collects raw records and turns them into a linked, read-only `Catalog`.
///
/// Steps run in a fixed order in `build`: index, link steps in layout
/// order, derived link field, then supplementary rows.
pub struct CatalogBuilder {
    layout: CatalogLayout,
    config: CatalogConfig,
    staged: HashMap<EntityType, Vec<Record>>,
    supplements: Vec<(EntityType, SupplementRows)>,
}

impl CatalogBuilder {
    pub fn new(layout: CatalogLayout, config: CatalogConfig) -> Result<Self> {
        layout.validate()?;
        let staged = layout
            .entities
            .iter()
            .map(|e| (e.name.clone(), Vec::new()))
            .collect();

        Ok(CatalogBuilder {
            layout,
            config,
            staged,
            supplements: Vec::new(),
        })
    }

    pub fn layout(&self) -> &CatalogLayout {
        &self.layout
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Normalizes and stages records of one declared type.
    pub fn add_records<I>(&mut self, entity: &str, records: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let definition = self
            .layout
            .entity(entity)
            .ok_or_else(|| Error::unknown_type(entity))?;
        let parent = definition.parent.clone();

        let staged = self
            .staged
            .get_mut(entity)
            .ok_or_else(|| Error::unknown_type(entity))?;
        staged.extend(
            records
                .into_iter()
                .map(|raw| normalize(raw, parent.as_ref(), &self.config)),
        );
        Ok(self)
    }

    pub fn supplement(&mut self, entity: &str, rows: SupplementRows) -> Result<&mut Self> {
        let definition = self
            .layout
            .entity(entity)
            .ok_or_else(|| Error::unknown_type(entity))?;
        self.supplements.push((definition.name.clone(), rows));
        Ok(self)
    }

    /// Supplementary rows as decoded JSON; every row must be an object.
    pub fn supplement_json(&mut self, entity: &str, rows: HashMap<String, serde_json::Value>) -> Result<&mut Self> {
        let mut converted = SupplementRows::with_capacity(rows.len());

        for (id, row) in rows {
            let serde_json::Value::Object(map) = row else {
                return Err(Error::new(
                    ErrorKind::InvalidArgument,
                    format!("supplementary row '{}' for {} is not an object", id, entity),
                ));
            };
            let fields: BTreeMap<String, FieldValue> = map
                .into_iter()
                .filter_map(|(k, v)| FieldValue::from_json(v).map(|v| (k, v)))
                .collect();
            converted.insert(id, fields);
        }

        self.supplement(entity, converted)
    }

    pub fn build(mut self) -> Result<Catalog> {
        let started = Instant::now();
        let mut stats = CatalogStats::default();
        let types: Vec<EntityType> = self.layout.entities.iter().map(|e| e.name.clone()).collect();

        let mut collections: Collections = HashMap::with_capacity(types.len());
        for entity in &types {
            let records = self.staged.remove(entity).unwrap_or_default();
            let (collection, replaced) = Collection::index(entity, records, self.config.reject_duplicate_ids)?;
            debug!(entity = %entity, records = collection.len(), "indexed collection");
            stats.duplicate_ids_replaced += replaced;
            stats.record_counts.insert(entity.to_string(), collection.len());
            collections.insert(entity.clone(), collection);
        }

        for link in &self.layout.links {
            stats.links.push(links::apply_link(&mut collections, link)?);
        }

        if let Some(template) = &self.config.link_template {
            for (entity, collection) in collections.iter_mut() {
                enrich::apply_link_template(collection, entity, &self.config.link_field, template);
            }
        }

        let relationship_fields: HashSet<String> = types.iter().map(EntityType::id_field).collect();
        for (entity, rows) in &self.supplements {
            let collection = collections
                .get_mut(entity)
                .ok_or_else(|| Error::unknown_type(entity.as_str()))?;
            stats.unmatched_supplement_rows += enrich::apply_supplement(collection, entity, rows, &relationship_fields, &self.config);
        }

        stats.build_ms = started.elapsed().as_millis() as u64;
        info!(
            types = types.len(),
            records = stats.total_records(),
            unresolved = stats.total_unresolved(),
            build_ms = stats.build_ms,
            "catalog built"
        );

        Ok(Catalog::new(collections, types, stats, &self.config))
    }
}
