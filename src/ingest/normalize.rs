use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;
use crate::core::config::CatalogConfig;
use crate::core::types::{EntityType, FieldValue, Record, NO_PARENT};
use crate::ingest::raw::{Annotation, RawRecord};

/// Raw record → `Record` with `{id, name, description}`, the `{parent}_id`
/// reference and flattened annotations.
pub fn normalize(raw: RawRecord, parent: Option<&EntityType>, config: &CatalogConfig) -> Record {
    let RawRecord { id, name, description, part_of, annotations } = raw;
    let mut record = Record::new(id);

    if let Some(name) = name {
        record.set_field("name", FieldValue::Text(name));
    }
    if let Some(description) = description {
        record.set_field("description", FieldValue::Text(description));
    }

    if let Some(parent) = parent {
        let parent_id = part_of
            .into_iter()
            .next()
            .unwrap_or_else(|| NO_PARENT.to_string());
        record.set_field(&parent.id_field(), FieldValue::Text(parent_id));
    }

    for annotation in annotations {
        flatten_annotation(&mut record, annotation, config);
    }

    record
}

fn flatten_annotation(record: &mut Record, annotation: Annotation, config: &CatalogConfig) {
    let key = annotation.has_characteristic.name;
    if key == "id" {
        warn!(record = %record.id, "ignoring annotation that would replace the record id");
        return;
    }

    let Some(value) = FieldValue::from_json(annotation.has_raw_value) else {
        return;
    };

    let value = match value {
        FieldValue::Text(text) if key.contains("date") => {
            match parse_timestamp(&text, &config.date_formats) {
                Some(millis) => FieldValue::Number(millis as f64),
                None => {
                    warn!(record = %record.id, field = %key, value = %text, "unparsable date kept as text");
                    FieldValue::Text(text)
                }
            }
        }
        other => other,
    };

    record.set_field(&key, value);
}

/// Epoch milliseconds (UTC) for the first format that parses `text`.
pub fn parse_timestamp(text: &str, formats: &[String]) -> Option<i64> {
    let text = text.trim();

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.timestamp_millis())
}
