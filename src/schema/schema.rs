use serde::{Serialize, Deserialize};
use std::collections::HashSet;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::EntityType;

/// Entity type declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: EntityType,
    pub parent: Option<EntityType>,  // source of `{parent}_id` during normalization
}

/// Relationship derivation step, applied in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Link {
    /// parent gets `{child}_id` from each child's `{parent}_id`
    Children { parent: EntityType, child: EntityType },
    /// child gets `{grandparent}_id` through its parent; grandparent gets `{child}_id`
    Transitive { grandparent: EntityType, parent: EntityType, child: EntityType },
    /// each `sibling` gets `{child}_id`: the children sharing its parent
    Siblings { parent: EntityType, child: EntityType, sibling: EntityType },
}

impl Link {
    fn types(&self) -> Vec<&EntityType> {
        match self {
            Link::Children { parent, child } => vec![parent, child],
            Link::Transitive { grandparent, parent, child } => vec![grandparent, parent, child],
            Link::Siblings { parent, child, sibling } => vec![parent, child, sibling],
        }
    }
}

/// Declared entity graph of a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogLayout {
    pub entities: Vec<EntityDefinition>,
    pub links: Vec<Link>,
}

impl CatalogLayout {
    pub fn new() -> Self {
        CatalogLayout {
            entities: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn add_root(mut self, name: &str) -> Self {
        self.entities.push(EntityDefinition {
            name: EntityType::from(name),
            parent: None,
        });
        self
    }

    pub fn add_child(mut self, name: &str, parent: &str) -> Self {
        self.entities.push(EntityDefinition {
            name: EntityType::from(name),
            parent: Some(EntityType::from(parent)),
        });
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn children(self, parent: &str, child: &str) -> Self {
        self.with_link(Link::Children {
            parent: parent.into(),
            child: child.into(),
        })
    }

    pub fn transitive(self, grandparent: &str, parent: &str, child: &str) -> Self {
        self.with_link(Link::Transitive {
            grandparent: grandparent.into(),
            parent: parent.into(),
            child: child.into(),
        })
    }

    pub fn siblings(self, parent: &str, child: &str, sibling: &str) -> Self {
        self.with_link(Link::Siblings {
            parent: parent.into(),
            child: child.into(),
            sibling: sibling.into(),
        })
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.iter().find(|e| e.name.as_str() == name)
    }

    pub fn parent_of(&self, name: &str) -> Option<&EntityType> {
        self.entity(name).and_then(|e| e.parent.as_ref())
    }

    pub fn validate(&self) -> Result<()> {
        let mut declared = HashSet::new();
        for entity in &self.entities {
            if !declared.insert(entity.name.as_str()) {
                return Err(Error::new(
                    ErrorKind::InvalidLayout,
                    format!("entity type '{}' declared twice", entity.name),
                ));
            }
            if entity.parent.as_ref() == Some(&entity.name) {
                return Err(Error::new(
                    ErrorKind::InvalidLayout,
                    format!("entity type '{}' cannot be its own parent", entity.name),
                ));
            }
        }

        for entity in &self.entities {
            if let Some(parent) = &entity.parent {
                if !declared.contains(parent.as_str()) {
                    return Err(Error::new(
                        ErrorKind::InvalidLayout,
                        format!("'{}' names undeclared parent '{}'", entity.name, parent),
                    ));
                }
            }
        }

        for entity in &self.entities {
            let mut seen = HashSet::new();
            let mut current = Some(&entity.name);
            while let Some(ty) = current {
                if !seen.insert(ty.as_str()) {
                    return Err(Error::new(
                        ErrorKind::InvalidLayout,
                        format!("parent chain of '{}' loops back to '{}'", entity.name, ty),
                    ));
                }
                current = self.parent_of(ty.as_str());
            }
        }

        for link in &self.links {
            for ty in link.types() {
                if !declared.contains(ty.as_str()) {
                    return Err(Error::new(
                        ErrorKind::InvalidLayout,
                        format!("link {:?} names undeclared type '{}'", link, ty),
                    ));
                }
            }
        }

        Ok(())
    }
}

impl Default for CatalogLayout {
    /// study → project → {sample, data_object}
    fn default() -> Self {
        CatalogLayout::new()
            .add_root("study")
            .add_child("project", "study")
            .add_child("sample", "project")
            .add_child("data_object", "project")
            .children("study", "project")
            .children("project", "sample")
            .children("project", "data_object")
            .transitive("study", "project", "sample")
            .transitive("study", "project", "data_object")
            .siblings("project", "sample", "data_object")
            .siblings("project", "data_object", "sample")
    }
}
