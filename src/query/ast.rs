use serde::{Serialize, Deserialize};
use std::fmt;
use crate::core::types::FieldValue;

/// Comparison operator of a filter condition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Eq,   // ==, membership on list fields
    Lt,   // <
    Gt,   // >
    Le,   // <=
    Ge,   // >=
    Unsupported(String),  // never matches
}

impl Operator {
    pub fn parse(op: &str) -> Self {
        match op {
            "==" => Operator::Eq,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            "<=" => Operator::Le,
            ">=" => Operator::Ge,
            other => Operator::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "==",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Unsupported(op) => op,
        }
    }
}

impl From<String> for Operator {
    fn from(op: String) -> Self {
        Operator::parse(&op)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single `(field, op, value)` predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: FieldValue,
}

impl Condition {
    pub fn new(field: &str, op: &str, value: impl Into<FieldValue>) -> Self {
        Condition {
            field: field.to_string(),
            op: Operator::parse(op),
            value: value.into(),
        }
    }

    pub fn eq(field: &str, value: impl Into<FieldValue>) -> Self {
        Condition::new(field, "==", value)
    }

    pub fn lt(field: &str, value: impl Into<FieldValue>) -> Self {
        Condition::new(field, "<", value)
    }

    pub fn gt(field: &str, value: impl Into<FieldValue>) -> Self {
        Condition::new(field, ">", value)
    }

    pub fn le(field: &str, value: impl Into<FieldValue>) -> Self {
        Condition::new(field, "<=", value)
    }

    pub fn ge(field: &str, value: impl Into<FieldValue>) -> Self {
        Condition::new(field, ">=", value)
    }
}
