use std::cmp::Ordering;
use crate::core::types::{FieldValue, Record};
use crate::query::ast::{Condition, Operator};

/// Conditions grouped by field: a record matches when every group has at
/// least one matching condition.
pub struct RecordMatcher<'a> {
    groups: Vec<(&'a str, Vec<&'a Condition>)>,
}

impl<'a> RecordMatcher<'a> {
    pub fn new(conditions: &'a [Condition]) -> Self {
        Self::grouped(conditions.iter())
    }

    /// Same grouping without conditions on `field`. Facet counts use this so
    /// that options of one facet combine as OR.
    pub fn excluding_field(conditions: &'a [Condition], field: &str) -> Self {
        Self::grouped(conditions.iter().filter(|c| c.field != field))
    }

    fn grouped(conditions: impl Iterator<Item = &'a Condition>) -> Self {
        let mut groups: Vec<(&'a str, Vec<&'a Condition>)> = Vec::new();

        for condition in conditions {
            match groups.iter_mut().find(|(field, _)| *field == condition.field) {
                Some((_, group)) => group.push(condition),
                None => groups.push((condition.field.as_str(), vec![condition])),
            }
        }

        RecordMatcher { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.groups
            .iter()
            .all(|(_, group)| group.iter().any(|c| matches_condition(record, c)))
    }

    pub fn filter<'r>(&self, records: &'r [Record]) -> Vec<&'r Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// A missing field never matches.
pub fn matches_condition(record: &Record, condition: &Condition) -> bool {
    match record.get_field(&condition.field) {
        Some(value) => evaluate(&condition.op, value, &condition.value),
        None => false,
    }
}

fn evaluate(op: &Operator, actual: &FieldValue, expected: &FieldValue) -> bool {
    match op {
        Operator::Eq => match (actual, expected) {
            (FieldValue::List(_), FieldValue::List(_)) => actual.loose_eq(expected),
            (FieldValue::List(items), _) => items.iter().any(|item| item.loose_eq(expected)),
            _ => actual.loose_eq(expected),
        },
        Operator::Lt => actual.compare(expected) == Some(Ordering::Less),
        Operator::Gt => actual.compare(expected) == Some(Ordering::Greater),
        Operator::Le => matches!(actual.compare(expected), Some(Ordering::Less | Ordering::Equal)),
        Operator::Ge => matches!(actual.compare(expected), Some(Ordering::Greater | Ordering::Equal)),
        Operator::Unsupported(_) => false,
    }
}
