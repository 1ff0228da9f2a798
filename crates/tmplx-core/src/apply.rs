//! Functional-boundary apply function
//!
//! `apply()` is the only place a document is mutated on behalf of the
//! template engine.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: a command is validated in full before the first
//!   field changes; on error the document is untouched
//! - **No panics**: invalid input returns typed errors
//! - **Invertible**: success yields the command that restores the previous
//!   state, which the command stack keeps for undo
//!
//! ## Example
//!
//! ```
//! use tmplx_core::{apply, Command, Document, Value};
//! use tmplx_core::model::Fields;
//!
//! let mut doc = Document::new();
//! let task = doc.create_node("bpmn:ServiceTask", Fields::new());
//!
//! let inverse = apply(&mut doc, &Command::set_field(task.clone(), "name", Some(Value::from("Ship"))))
//!     .unwrap();
//! assert_eq!(doc.get_str(&task, "name"), Some("Ship"));
//!
//! apply(&mut doc, &inverse).unwrap();
//! assert_eq!(doc.get(&task, "name"), None);
//! ```

use std::collections::BTreeMap;

use crate::commands::Command;
use crate::errors::{Result, TmplxError};
use crate::model::{NodeId, Value};
use crate::ops::Document;

/// Apply a command to a document, returning its inverse
///
/// # Errors
///
/// * `NodeNotFound` - the target node does not exist
/// * `UnknownChild` - a written value links a node that does not exist
/// * `FieldTypeMismatch` - `UpdateList` targets a field that is not a list
pub fn apply(doc: &mut Document, cmd: &Command) -> Result<Command> {
    match cmd {
        Command::UpdateFields { node, fields } => {
            validate_fields(doc, node, fields)?;

            let target = doc.node_mut(node)?;
            let mut previous = BTreeMap::new();
            for (name, value) in fields {
                let old = match value {
                    Some(v) => target.fields.insert(name.clone(), v.clone()),
                    None => target.fields.remove(name),
                };
                previous.insert(name.clone(), old);
            }

            Ok(Command::UpdateFields {
                node: node.clone(),
                fields: previous,
            })
        }

        Command::UpdateList { node, field, items } => {
            let old = match doc.node(node)?.get(field) {
                None => None,
                Some(Value::Nodes(ids)) => Some(ids.clone()),
                Some(_) => {
                    return Err(TmplxError::FieldTypeMismatch {
                        node_id: node.clone(),
                        field: field.clone(),
                        expected: "list".to_string(),
                    })
                }
            };
            ensure_known(doc, node, items)?;

            doc.node_mut(node)?
                .fields
                .insert(field.clone(), Value::Nodes(items.clone()));

            // A list that did not exist before is cleared again on undo
            let inverse = match old {
                Some(ids) => Command::UpdateList {
                    node: node.clone(),
                    field: field.clone(),
                    items: ids,
                },
                None => Command::set_field(node.clone(), field, None),
            };
            Ok(inverse)
        }
    }
}

fn validate_fields(
    doc: &Document,
    node: &NodeId,
    fields: &BTreeMap<String, Option<Value>>,
) -> Result<()> {
    doc.node(node)?;
    for value in fields.values().flatten() {
        ensure_known(doc, node, value.linked_ids())?;
    }
    Ok(())
}

fn ensure_known(doc: &Document, node: &NodeId, ids: &[NodeId]) -> Result<()> {
    match ids.iter().find(|id| !doc.contains(id)) {
        Some(missing) => Err(TmplxError::UnknownChild {
            node_id: node.clone(),
            child_id: missing.clone(),
        }),
        None => Ok(()),
    }
}
