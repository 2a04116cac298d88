use std::collections::{HashMap, HashSet};
use tracing::debug;
use crate::core::catalog::Collection;
use crate::core::error::{Error, Result};
use crate::core::stats::LinkStats;
use crate::core::types::{EntityType, FieldValue, NO_PARENT};
use crate::schema::schema::Link;

pub type Collections = HashMap<EntityType, Collection>;

pub fn apply_link(collections: &mut Collections, link: &Link) -> Result<LinkStats> {
    let stats = match link {
        Link::Children { parent, child } => back_populate(collections, parent, child)?,
        Link::Transitive { grandparent, parent, child } => {
            transitive_populate(collections, grandparent, parent, child)?
        }
        Link::Siblings { parent, child, sibling } => {
            sibling_populate(collections, parent, child, sibling)?
        }
    };
    debug!(step = %stats.step, linked = stats.linked, unresolved = stats.unresolved, "applied link");
    Ok(stats)
}

fn get<'a>(collections: &'a Collections, entity: &EntityType) -> Result<&'a Collection> {
    collections
        .get(entity)
        .ok_or_else(|| Error::unknown_type(entity.as_str()))
}

fn get_mut<'a>(collections: &'a mut Collections, entity: &EntityType) -> Result<&'a mut Collection> {
    collections
        .get_mut(entity)
        .ok_or_else(|| Error::unknown_type(entity.as_str()))
}

/// Each parent gets `{child}_id`: the children whose `{parent}_id` names it.
pub fn back_populate(collections: &mut Collections, parent: &EntityType, child: &EntityType) -> Result<LinkStats> {
    let parent_ref = parent.id_field();

    let references: Vec<(String, String)> = get(collections, child)?
        .records
        .iter()
        .filter_map(|c| c.text(&parent_ref).map(|p| (p.to_string(), c.id.clone())))
        .collect();

    let parents = get_mut(collections, parent)?;
    let mut lists = vec![Vec::new(); parents.len()];
    let mut seen = HashSet::new();
    let mut stats = LinkStats {
        step: format!("{} -> {}", parent, child),
        linked: 0,
        unresolved: 0,
    };

    for (parent_id, child_id) in references {
        match parents.position(&parent_id) {
            Some(pos) => {
                if seen.insert((pos, child_id.clone())) {
                    lists[pos].push(child_id);
                    stats.linked += 1;
                }
            }
            None if parent_id != NO_PARENT => stats.unresolved += 1,
            None => {}
        }
    }

    let child_field = child.id_field();
    for (record, ids) in parents.records.iter_mut().zip(lists) {
        record.set_field(&child_field, FieldValue::id_list(ids));
    }

    Ok(stats)
}

/// Each child gets `{grandparent}_id` taken from its parent, and each
/// grandparent gets `{child}_id`.
pub fn transitive_populate(
    collections: &mut Collections,
    grandparent: &EntityType,
    parent: &EntityType,
    child: &EntityType,
) -> Result<LinkStats> {
    let parent_ref = parent.id_field();
    let grandparent_ref = grandparent.id_field();

    let resolved: Vec<String> = {
        let parents = get(collections, parent)?;
        get(collections, child)?
            .records
            .iter()
            .map(|c| {
                c.text(&parent_ref)
                    .and_then(|p| parents.get(p))
                    .and_then(|p| p.text(&grandparent_ref))
                    .unwrap_or(NO_PARENT)
                    .to_string()
            })
            .collect()
    };

    let mut links = Vec::with_capacity(resolved.len());
    {
        let children = get_mut(collections, child)?;
        for (record, grandparent_id) in children.records.iter_mut().zip(resolved) {
            links.push((grandparent_id.clone(), record.id.clone()));
            record.set_field(&grandparent_ref, FieldValue::Text(grandparent_id));
        }
    }

    let grandparents = get_mut(collections, grandparent)?;
    let mut lists = vec![Vec::new(); grandparents.len()];
    let mut seen = HashSet::new();
    let mut stats = LinkStats {
        step: format!("{} -> {} -> {}", grandparent, parent, child),
        linked: 0,
        unresolved: 0,
    };

    for (grandparent_id, child_id) in links {
        match grandparents.position(&grandparent_id) {
            Some(pos) => {
                if seen.insert((pos, child_id.clone())) {
                    lists[pos].push(child_id);
                    stats.linked += 1;
                }
            }
            None if grandparent_id != NO_PARENT => stats.unresolved += 1,
            None => {}
        }
    }

    let child_field = child.id_field();
    for (record, ids) in grandparents.records.iter_mut().zip(lists) {
        record.set_field(&child_field, FieldValue::id_list(ids));
    }

    Ok(stats)
}

/// Each sibling record gets `{child}_id`: the children sharing its parent.
/// Records without a parent share nothing.
pub fn sibling_populate(
    collections: &mut Collections,
    parent: &EntityType,
    child: &EntityType,
    sibling: &EntityType,
) -> Result<LinkStats> {
    let parent_ref = parent.id_field();

    let mut by_parent: HashMap<String, Vec<String>> = HashMap::new();
    for record in &get(collections, child)?.records {
        if let Some(parent_id) = record.text(&parent_ref) {
            if parent_id != NO_PARENT {
                by_parent
                    .entry(parent_id.to_string())
                    .or_default()
                    .push(record.id.clone());
            }
        }
    }

    let child_field = child.id_field();
    let mut stats = LinkStats {
        step: format!("{} ~ {} via {}", sibling, child, parent),
        linked: 0,
        unresolved: 0,
    };

    for record in get_mut(collections, sibling)?.records.iter_mut() {
        let ids = record
            .text(&parent_ref)
            .and_then(|p| by_parent.get(p))
            .cloned()
            .unwrap_or_default();
        stats.linked += ids.len();
        record.set_field(&child_field, FieldValue::id_list(ids));
    }

    Ok(stats)
}
