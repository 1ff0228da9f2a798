//! Mutation requests accepted by the command log
//!
//! The reconcilers never touch the document directly. Every change is one
//! of these two shapes, applied through `apply()` and recorded with its
//! inverse so it can be undone, redone or replayed.

use std::collections::BTreeMap;

use crate::model::{NodeId, Value};

/// A single document mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace a set of named fields on a node; `None` clears the field
    UpdateFields {
        node: NodeId,
        fields: BTreeMap<String, Option<Value>>,
    },

    /// Replace a list-valued field with a new list of owned children
    UpdateList {
        node: NodeId,
        field: String,
        items: Vec<NodeId>,
    },
}

impl Command {
    /// Set one field
    pub fn set_field(node: impl Into<NodeId>, field: &str, value: Option<Value>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), value);
        Command::UpdateFields {
            node: node.into(),
            fields,
        }
    }

    /// Node this command mutates
    pub fn target(&self) -> &NodeId {
        match self {
            Command::UpdateFields { node, .. } | Command::UpdateList { node, .. } => node,
        }
    }
}
