use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::errors::{Result, TmplxError};
use crate::model::kinds::{self, fields};
use crate::model::{Fields, Node, NodeId, Value};

/// In-memory document: a `bpmn:Definitions` root plus every node it reaches
///
/// Nodes live in a flat map keyed by id. Ownership is expressed by `Node` /
/// `Nodes` field values; the parent of a node is derived on demand, never
/// stored, so undoing a command cannot leave a stale parent pointer behind.
/// Not thread-safe - one reconciliation owns the document for its whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    root: NodeId,
    nodes: BTreeMap<NodeId, Node>,
}

impl Document {
    /// Create a document holding an empty definitions root
    pub fn new() -> Self {
        let root = Uuid::now_v7().to_string();
        let mut nodes = BTreeMap::new();
        nodes.insert(
            root.clone(),
            Node::new(root.clone(), kinds::DEFINITIONS, Fields::new()),
        );
        Self { root, nodes }
    }

    /// Parse a document from its JSON form
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed JSON and `NodeNotFound` when the
    /// root id does not name a node.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(json)?;
        doc.node(&doc.root)?;
        Ok(doc)
    }

    /// Render the document as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Id of the definitions root
    pub fn root(&self) -> &NodeId {
        &self.root
    }

    /// Number of nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get a node by ID
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if no node has this id.
    pub fn node(&self, id: &str) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| TmplxError::NodeNotFound {
            node_id: id.to_string(),
        })
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or_else(|| TmplxError::NodeNotFound {
            node_id: id.to_string(),
        })
    }

    pub fn kind_of(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).map(|n| n.kind.as_str())
    }

    pub fn is_kind(&self, id: &str, kind: &str) -> bool {
        self.kind_of(id) == Some(kind)
    }

    /// Generic field read; `None` for a missing node or field
    pub fn get(&self, id: &str, field: &str) -> Option<&Value> {
        self.nodes.get(id).and_then(|n| n.get(field))
    }

    pub fn get_str(&self, id: &str, field: &str) -> Option<&str> {
        self.get(id, field).and_then(Value::as_str)
    }

    /// Owned single child under `field`
    pub fn get_child(&self, id: &str, field: &str) -> Option<&NodeId> {
        match self.get(id, field) {
            Some(Value::Node(child)) => Some(child),
            _ => None,
        }
    }

    /// Non-owning reference under `field`
    pub fn get_ref(&self, id: &str, field: &str) -> Option<&NodeId> {
        match self.get(id, field) {
            Some(Value::Ref(target)) => Some(target),
            _ => None,
        }
    }

    /// Owned child list under `field`; empty when absent
    pub fn get_list(&self, id: &str, field: &str) -> &[NodeId] {
        self.get(id, field)
            .and_then(Value::as_nodes)
            .unwrap_or_default()
    }

    /// Create a detached node
    ///
    /// Creation is not a document mutation: the node becomes part of the
    /// tree only once a command links it from an attached node.
    pub fn create_node(&mut self, kind: &str, fields: Fields) -> NodeId {
        let id = Uuid::now_v7().to_string();
        self.insert_node(Node::new(id.clone(), kind, fields));
        id
    }

    /// Insert a node as-is, replacing any node with the same id
    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Create a node and append it to `parent`'s `list_field` directly
    ///
    /// This bypasses the command log and is meant for building documents
    /// (fixtures, importers), not for template reconciliation.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for an unknown parent and `FieldTypeMismatch`
    /// if `list_field` holds something other than a child list.
    pub fn insert_child(
        &mut self,
        parent: &str,
        list_field: &str,
        kind: &str,
        fields: Fields,
    ) -> Result<NodeId> {
        let mut items = match self.node(parent)?.get(list_field) {
            None => Vec::new(),
            Some(Value::Nodes(ids)) => ids.clone(),
            Some(_) => {
                return Err(TmplxError::FieldTypeMismatch {
                    node_id: parent.to_string(),
                    field: list_field.to_string(),
                    expected: "list".to_string(),
                })
            }
        };

        let id = self.create_node(kind, fields);
        items.push(id.clone());
        self.node_mut(parent)?
            .fields
            .insert(list_field.to_string(), Value::Nodes(items));
        Ok(id)
    }

    /// Ids of the root and every node it owns, directly or transitively
    ///
    /// Detached nodes (created but never linked, released by a replacement,
    /// unlinked by a prune or by undo) are not part of the document tree.
    pub fn reachable(&self) -> BTreeSet<&NodeId> {
        let mut seen = BTreeSet::new();
        let mut pending = vec![&self.root];
        while let Some(id) = pending.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if seen.insert(&node.id) {
                pending.extend(node.fields.values().flat_map(Value::owned_ids));
            }
        }
        seen
    }

    pub fn is_attached(&self, id: &str) -> bool {
        self.reachable().iter().any(|n| n.as_str() == id)
    }

    /// Owner of `id` within the document tree and the field it is owned through
    pub fn parent_of(&self, id: &str) -> Option<(&NodeId, &str)> {
        self.reachable()
            .into_iter()
            .filter_map(|owner| self.nodes.get(owner))
            .find_map(|n| n.owning_field(id).map(|field| (&n.id, field)))
    }

    /// Attached nodes holding a `Ref` to `id`, with the referencing field
    pub fn referrers(&self, id: &str) -> Vec<(NodeId, String)> {
        self.reachable()
            .into_iter()
            .filter_map(|referrer| self.nodes.get(referrer))
            .flat_map(|n| {
                n.fields.iter().filter_map(move |(field, value)| match value {
                    Value::Ref(target) if target == id => Some((n.id.clone(), field.clone())),
                    _ => None,
                })
            })
            .collect()
    }

    /// Drop every node the root no longer reaches, returning their ids
    ///
    /// Recorded commands may still link collected nodes, so undoing or
    /// redoing across a collection fails with `UnknownChild`. Collect once
    /// the history is discarded, e.g. right before saving.
    pub fn collect_garbage(&mut self) -> Vec<NodeId> {
        let keep: BTreeSet<NodeId> = self.reachable().into_iter().cloned().collect();
        let garbage: Vec<NodeId> = self
            .nodes
            .keys()
            .filter(|id| !keep.contains(*id))
            .cloned()
            .collect();
        for id in &garbage {
            self.nodes.remove(id);
        }
        if !garbage.is_empty() {
            tracing::debug!(collected = garbage.len(), remaining = self.nodes.len(), "collected detached nodes");
        }
        garbage
    }

    /// Extension container of `owner`, if one is attached
    pub fn extension_elements(&self, owner: &str) -> Option<&NodeId> {
        self.get_child(owner, fields::EXTENSION_ELEMENTS)
    }

    /// First extension of the given kind inside `owner`'s container
    pub fn find_extension(&self, owner: &str, kind: &str) -> Option<&NodeId> {
        let container = self.extension_elements(owner)?;
        self.get_list(container, fields::VALUES)
            .iter()
            .find(|id| self.is_kind(id, kind))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_of(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_new_document_has_definitions_root() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        assert!(doc.is_kind(doc.root(), kinds::DEFINITIONS));
    }

    #[test]
    fn test_get_missing_node() {
        let doc = Document::new();
        let result = doc.node("missing");
        assert!(matches!(result, Err(TmplxError::NodeNotFound { .. })));
    }

    #[test]
    fn test_insert_child_and_parent_of() {
        let mut doc = Document::new();
        let root = doc.root().clone();
        let process = doc
            .insert_child(&root, fields::ROOT_ELEMENTS, kinds::PROCESS, Fields::new())
            .unwrap();
        let task = doc
            .insert_child(
                &process,
                fields::FLOW_ELEMENTS,
                "bpmn:ServiceTask",
                Fields::new(),
            )
            .unwrap();

        assert_eq!(doc.get_list(&root, fields::ROOT_ELEMENTS), [process.clone()]);
        assert_eq!(
            doc.parent_of(&task),
            Some((&process, fields::FLOW_ELEMENTS))
        );
        assert_eq!(doc.parent_of(&root), None);
    }

    #[test]
    fn test_insert_child_rejects_scalar_field() {
        let mut doc = Document::new();
        let root = doc.root().clone();
        let id = doc.create_node("bpmn:Task", fields_of(&[("name", Value::from("x"))]));

        let result = doc.insert_child(&id, "name", "bpmn:Task", Fields::new());
        assert!(matches!(result, Err(TmplxError::FieldTypeMismatch { .. })));
        assert!(doc.get_list(&root, fields::ROOT_ELEMENTS).is_empty());
    }

    #[test]
    fn test_referrers_ignore_owned_links() {
        let mut doc = Document::new();
        let root = doc.root().clone();
        let message = doc
            .insert_child(&root, fields::ROOT_ELEMENTS, kinds::MESSAGE, Fields::new())
            .unwrap();
        let process = doc
            .insert_child(&root, fields::ROOT_ELEMENTS, kinds::PROCESS, Fields::new())
            .unwrap();
        let task = doc
            .insert_child(
                &process,
                fields::FLOW_ELEMENTS,
                kinds::RECEIVE_TASK,
                fields_of(&[(fields::MESSAGE_REF, Value::Ref(message.clone()))]),
            )
            .unwrap();

        assert_eq!(
            doc.referrers(&message),
            vec![(task, fields::MESSAGE_REF.to_string())]
        );
        assert_eq!(doc.parent_of(&message), Some((&root, fields::ROOT_ELEMENTS)));
    }

    #[test]
    fn test_detached_nodes_do_not_count_as_referrers_or_owners() {
        // GIVEN a message and a detached definition that still points at it
        let mut doc = Document::new();
        let root = doc.root().clone();
        let message = doc
            .insert_child(&root, fields::ROOT_ELEMENTS, kinds::MESSAGE, Fields::new())
            .unwrap();
        let definition = doc.create_node(
            kinds::MESSAGE_EVENT_DEFINITION,
            fields_of(&[(fields::MESSAGE_REF, Value::Ref(message.clone()))]),
        );
        let event = doc.create_node(
            "bpmn:IntermediateCatchEvent",
            fields_of(&[(
                fields::EVENT_DEFINITIONS,
                Value::Nodes(vec![definition.clone()]),
            )]),
        );

        // THEN neither shows up in lookups over the document tree
        assert!(doc.referrers(&message).is_empty());
        assert_eq!(doc.parent_of(&definition), None);
        assert!(!doc.is_attached(&event));
        assert!(doc.is_attached(&message));
    }

    #[test]
    fn test_collect_garbage_drops_unreachable_nodes() {
        let mut doc = Document::new();
        let root = doc.root().clone();
        let process = doc
            .insert_child(&root, fields::ROOT_ELEMENTS, kinds::PROCESS, Fields::new())
            .unwrap();
        let child = doc.create_node("bpmn:Task", Fields::new());
        let orphan = doc.create_node(
            kinds::EXTENSION_ELEMENTS,
            fields_of(&[(fields::VALUES, Value::Nodes(vec![child.clone()]))]),
        );

        let mut collected = doc.collect_garbage();
        collected.sort();
        let mut expected = vec![child, orphan];
        expected.sort();

        assert_eq!(collected, expected);
        assert_eq!(doc.len(), 2);
        assert!(doc.contains(&process));
        assert!(doc.collect_garbage().is_empty());
    }

    #[test]
    fn test_json_round_trip_keeps_root() {
        let doc = Document::new();
        let json = doc.to_json_pretty().unwrap();
        let parsed = Document::from_json(&json).unwrap();
        assert_eq!(parsed, doc);
    }
}
