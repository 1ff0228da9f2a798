use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value::Value;

/// Identifier of a node in a document
pub type NodeId = String;

/// Field map of a node, ordered for stable serialization
pub type Fields = BTreeMap<String, Value>;

/// A typed structured node: an element, an extension container, a
/// task definition, a mapping entry, a message, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within the document
    pub id: NodeId,

    /// Structural kind, e.g. `bpmn:ServiceTask` or `zeebe:TaskDefinition`
    pub kind: String,

    /// Named fields
    #[serde(default)]
    pub fields: Fields,
}

impl Node {
    /// Create a node with the given id, kind and fields
    pub fn new(id: NodeId, kind: impl Into<String>, fields: Fields) -> Self {
        Self {
            id,
            kind: kind.into(),
            fields,
        }
    }

    /// Read a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Check the structural kind
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Name of the field through which this node owns `child`
    pub fn owning_field(&self, child: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, value)| value.owned_ids().iter().any(|id| id == child))
            .map(|(name, _)| name.as_str())
    }
}
