use serde::{Serialize, Deserialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Parent reference written when a record has no `part_of` entry.
pub const NO_PARENT: &str = "None";

/// Name of an entity collection (`study`, `sample`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityType(pub String);

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        EntityType(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relationship field other records use to point at this type,
    /// e.g. `project_id`.
    pub fn id_field(&self) -> String {
        format!("{}_id", self.0)
    }
}

impl From<&str> for EntityType {
    fn from(name: &str) -> Self {
        EntityType(name.to_string())
    }
}

impl Borrow<str> for EntityType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn id_list<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(ids.into_iter().map(|id| FieldValue::Text(id.into())).collect())
    }

    /// Converts a JSON value; `null` has no field representation.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FieldValue::Boolean(b)),
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::String(s) => Some(FieldValue::Text(s)),
            Value::Array(items) => Some(FieldValue::List(
                items.into_iter().filter_map(FieldValue::from_json).collect(),
            )),
            Value::Object(map) => Some(FieldValue::Object(
                map.into_iter()
                    .filter_map(|(k, v)| FieldValue::from_json(v).map(|v| (k, v)))
                    .collect(),
            )),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Lists and objects are structured; everything else is flat.
    pub fn is_structured(&self) -> bool {
        matches!(self, FieldValue::List(_) | FieldValue::Object(_))
    }

    /// Canonical identity used both for facet buckets and for `==`.
    /// Text that reads as a finite number is keyed as that number, so `3`,
    /// `3.0` and `"3.0"` are one value; booleans never equal text.
    pub fn facet_key(&self) -> ValueKey {
        match self {
            FieldValue::Boolean(b) => ValueKey::Boolean(*b),
            FieldValue::Number(n) => ValueKey::number(*n),
            FieldValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => ValueKey::number(n),
                _ => ValueKey::Text(s.clone()),
            },
            FieldValue::List(items) => ValueKey::List(items.iter().map(FieldValue::facet_key).collect()),
            FieldValue::Object(map) => ValueKey::Object(
                map.iter().map(|(k, v)| (k.clone(), v.facet_key())).collect(),
            ),
        }
    }

    /// Equality under `facet_key`.
    pub fn loose_eq(&self, other: &FieldValue) -> bool {
        self.facet_key() == other.facet_key()
    }

    /// Ordering for `<`, `>`, `<=`, `>=`. `None` when the pair is not comparable.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Number(_), FieldValue::Number(_))
            | (FieldValue::Number(_), FieldValue::Text(_))
            | (FieldValue::Text(_), FieldValue::Number(_)) => {
                self.as_number()?.partial_cmp(&other.as_number()?)
            }
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(_) | FieldValue::Object(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Hashable canonical form of a `FieldValue`, see `FieldValue::facet_key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Boolean(bool),
    Number(u64),  // f64 bits with -0.0 and NaN payloads folded
    Text(String),
    List(Vec<ValueKey>),
    Object(Vec<(String, ValueKey)>),
}

impl ValueKey {
    fn number(n: f64) -> Self {
        let n = if n == 0.0 {
            0.0
        } else if n.is_nan() {
            f64::NAN
        } else {
            n
        };
        ValueKey::Number(n.to_bits())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

/// One catalog entry. `fields` also carries `id`, `name` and `description`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), FieldValue::Text(id.clone()));
        Record { id, fields }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set_field(name, value.into());
        self
    }

    pub fn set_field(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get_field(name).and_then(FieldValue::as_text)
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    /// Text entries of a list-valued relationship field, empty when absent.
    pub fn ids(&self, name: &str) -> Vec<&str> {
        match self.get_field(name) {
            Some(FieldValue::List(items)) => items.iter().filter_map(FieldValue::as_text).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn facet_key_folds_numeric_text() {
        assert_eq!(FieldValue::Number(3.0).facet_key(), FieldValue::text("3").facet_key());
        assert_eq!(FieldValue::Number(3.0).facet_key(), FieldValue::text("3.0").facet_key());
        assert_eq!(FieldValue::Number(0.0).facet_key(), FieldValue::Number(-0.0).facet_key());
        assert_ne!(FieldValue::Number(2.5).facet_key(), FieldValue::text("2.5x").facet_key());
        assert_eq!(FieldValue::text("inf").facet_key(), ValueKey::Text("inf".to_string()));
    }

    #[test]
    fn facet_key_keeps_kinds_apart() {
        assert_ne!(FieldValue::Boolean(true).facet_key(), FieldValue::text("true").facet_key());
        assert_ne!(
            FieldValue::id_list(["a", "b"]).facet_key(),
            FieldValue::text("a,b").facet_key()
        );
        assert_ne!(
            FieldValue::id_list(["a,b"]).facet_key(),
            FieldValue::id_list(["a", "b"]).facet_key()
        );
    }

    #[test]
    fn loose_eq_coerces_numeric_text() {
        assert!(FieldValue::Number(10.0).loose_eq(&FieldValue::text("10")));
        assert!(FieldValue::Number(10.0).loose_eq(&FieldValue::text("10.0")));
        assert!(!FieldValue::Number(10.0).loose_eq(&FieldValue::text("ten")));
        assert!(!FieldValue::Boolean(true).loose_eq(&FieldValue::text("true")));
    }

    #[test]
    fn display_prints_plain_values() {
        assert_eq!(FieldValue::Number(7.0).to_string(), "7");
        assert_eq!(FieldValue::Number(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::text("soil").to_string(), "soil");
        assert_eq!(FieldValue::id_list(["a", "b"]).to_string(), r#"["a","b"]"#);
    }

    #[test]
    fn compare_rejects_mixed_structures() {
        assert_eq!(
            FieldValue::Number(1.0).compare(&FieldValue::Number(2.0)),
            Some(Ordering::Less)
        );
        assert_eq!(
            FieldValue::text("b").compare(&FieldValue::text("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(FieldValue::Boolean(true).compare(&FieldValue::Boolean(false)), None);
        assert_eq!(FieldValue::text("x").compare(&FieldValue::Number(1.0)), None);
    }

    #[test]
    fn from_json_drops_nulls() {
        assert_eq!(FieldValue::from_json(json!(null)), None);
        assert_eq!(
            FieldValue::from_json(json!(["a", null, 2])),
            Some(FieldValue::List(vec![FieldValue::text("a"), FieldValue::Number(2.0)]))
        );
    }

    #[test]
    fn record_exposes_id_as_field() {
        let record = Record::new("B1").with_field("name", "soil core");
        assert_eq!(record.text("id"), Some("B1"));
        assert_eq!(record.name(), Some("soil core"));
        assert!(record.ids("project_id").is_empty());
    }
}
