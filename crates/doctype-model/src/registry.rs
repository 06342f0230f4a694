use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldDefinition;

/// Known sub-table DocTypes and their field lists, keyed by DocType name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubTableRegistry {
    tables: BTreeMap<String, Vec<FieldDefinition>>,
}

impl SubTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, doctype: impl Into<String>, fields: Vec<FieldDefinition>) {
        self.tables.insert(doctype.into(), fields);
    }

    #[must_use]
    pub fn with_table(mut self, doctype: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        self.insert(doctype, fields);
        self
    }

    pub fn get(&self, doctype: &str) -> Option<&[FieldDefinition]> {
        self.tables.get(doctype).map(Vec::as_slice)
    }

    /// Child fields for `field`: its own nested list when present, otherwise,
    /// for table kinds, the registry entry named by its `options`.
    pub fn resolve(&self, field: &FieldDefinition) -> Option<Vec<FieldDefinition>> {
        if let Some(children) = &field.child_fields {
            return Some(children.clone());
        }
        if !field.kind.is_table() {
            return None;
        }
        let doctype = field.options.as_deref()?;
        self.get(doctype.trim()).map(<[FieldDefinition]>::to_vec)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}
