use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;
use crate::core::catalog::Collection;
use crate::core::config::CatalogConfig;
use crate::core::types::{EntityType, FieldValue};

/// Additional fields for one type, keyed by record id
pub type SupplementRows = HashMap<String, BTreeMap<String, FieldValue>>;

/// Sets `field` to `template` with `{type}` and `{id}` filled in.
pub fn apply_link_template(collection: &mut Collection, entity: &EntityType, field: &str, template: &str) {
    let with_type = template.replace("{type}", entity.as_str());
    for record in collection.records.iter_mut() {
        let url = with_type.replace("{id}", &record.id);
        record.set_field(field, FieldValue::Text(url));
    }
}

/// Merges supplementary rows onto matching records. The title key replaces
/// `name`; the investigator key becomes the description. `id` and the
/// `relationship_fields` built by linking are never overwritten. Returns the
/// number of rows whose id matched nothing.
pub fn apply_supplement(
    collection: &mut Collection,
    entity: &EntityType,
    rows: &SupplementRows,
    relationship_fields: &HashSet<String>,
    config: &CatalogConfig,
) -> usize {
    let mut unmatched = 0;

    for (id, fields) in rows {
        let Some(pos) = collection.position(id) else {
            warn!(entity = %entity, id = %id, "supplementary row matches no record");
            unmatched += 1;
            continue;
        };
        let record = &mut collection.records[pos];

        for (key, value) in fields {
            if key == "id" || relationship_fields.contains(key) {
                warn!(entity = %entity, id = %id, field = %key, "supplementary field would replace a link, skipped");
                continue;
            }
            record.set_field(key, value.clone());
        }

        if let Some(title) = fields.get(&config.supplement_title_key).and_then(FieldValue::as_text) {
            record.set_field("name", FieldValue::text(title));
        }
        if let Some(investigator) = fields
            .get(&config.supplement_investigator_key)
            .and_then(FieldValue::as_text)
        {
            record.set_field(
                "description",
                FieldValue::Text(format!("Principal investigator: {}", investigator)),
            );
        }
    }

    unmatched
}
