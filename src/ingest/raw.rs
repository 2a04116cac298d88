use serde::{Serialize, Deserialize};

/// Source record as it arrives from the catalog dump
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub part_of: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>) -> Self {
        RawRecord {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn part_of(mut self, parent_id: &str) -> Self {
        self.part_of.push(parent_id.to_string());
        self
    }

    pub fn annotate(mut self, characteristic: &str, value: serde_json::Value) -> Self {
        self.annotations.push(Annotation::new(characteristic, value));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub has_characteristic: Characteristic,
    #[serde(default)]
    pub has_raw_value: serde_json::Value,
}

impl Annotation {
    pub fn new(characteristic: &str, value: serde_json::Value) -> Self {
        Annotation {
            has_characteristic: Characteristic {
                name: characteristic.to_string(),
            },
            has_raw_value: value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub name: String,
}
