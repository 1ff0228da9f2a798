use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// A field value on a document node
///
/// Owned links (`Node`, `Nodes`) make the target a child of the holder.
/// `Ref` only points at another node; the target keeps its own owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    String(String),
    Node(NodeId),
    Ref(NodeId),
    Nodes(Vec<NodeId>),
}

impl Value {
    /// Scalar text, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Owned child list, if this is one
    pub fn as_nodes(&self) -> Option<&[NodeId]> {
        match self {
            Value::Nodes(ids) => Some(ids),
            _ => None,
        }
    }

    /// Empty means an empty string or an empty child list.
    ///
    /// `false` and `0` are deliberate values and count as set.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Nodes(ids) => ids.is_empty(),
            Value::Bool(_) | Value::Int(_) | Value::Node(_) | Value::Ref(_) => false,
        }
    }

    /// Ids of nodes owned through this value
    pub fn owned_ids(&self) -> &[NodeId] {
        match self {
            Value::Node(id) => std::slice::from_ref(id),
            Value::Nodes(ids) => ids,
            _ => &[],
        }
    }

    /// Ids of nodes owned or referenced through this value
    pub fn linked_ids(&self) -> &[NodeId] {
        match self {
            Value::Ref(id) => std::slice::from_ref(id),
            other => other.owned_ids(),
        }
    }
}

/// True when `value` is absent or empty
pub fn is_unset(value: Option<&Value>) -> bool {
    value.map_or(true, Value::is_empty)
}

/// Compare two optional values, treating absent and empty as equal
pub fn same_value(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a.filter(|v| !v.is_empty()), b.filter(|v| !v.is_empty())) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
