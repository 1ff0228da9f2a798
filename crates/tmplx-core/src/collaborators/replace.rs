//! Element type replacement
//!
//! Swaps an element for a node of another kind at the same position in its
//! owner, carrying its fields, extensions and incoming references along.

use std::collections::BTreeMap;

use crate::errors::{Result, TmplxError};
use crate::model::kinds::{self, fields};
use crate::model::{Fields, NodeId, Value};
use crate::reconcile::locator::{get_message, holds_message_ref};
use crate::session::Session;
use crate::template::ElementType;

/// Replaces an element's structural variant
pub trait ElementReplacer {
    /// Replace `element` with a node matching `target`, returning the new id
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be replaced in place.
    fn replace_element(
        &self,
        session: &mut Session<'_>,
        element: &NodeId,
        target: &ElementType,
    ) -> Result<NodeId>;
}

/// Whether `element` already is of the target kind and event definition
pub fn matches_element_type(session: &Session<'_>, element: &NodeId, target: &ElementType) -> bool {
    let doc = session.doc();
    if !doc.is_kind(element, &target.value) {
        return false;
    }
    match &target.event_definition {
        None => true,
        Some(kind) => doc
            .get_list(element, fields::EVENT_DEFINITIONS)
            .iter()
            .any(|id| doc.is_kind(id, kind)),
    }
}

/// Whether an element of the target type can reference a message
pub fn references_message(target: &ElementType) -> bool {
    holds_message_ref(&target.value)
        || target.event_definition.as_deref() == Some(kinds::MESSAGE_EVENT_DEFINITION)
}

/// Builds the replacement through the command log
///
/// Scalar fields are copied at creation. Links (extension container, event
/// definitions, references) are moved with logged writes so undo hands them
/// back to the original element. An event definition of the requested kind
/// is reused when the element has one.
///
/// The element's message follows it to wherever the target keeps
/// `messageRef`: the replacement itself for receive and send tasks, a newly
/// created message event definition otherwise. A target that cannot
/// reference a message does not get one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultElementReplacer;

impl ElementReplacer for DefaultElementReplacer {
    fn replace_element(
        &self,
        session: &mut Session<'_>,
        element: &NodeId,
        target: &ElementType,
    ) -> Result<NodeId> {
        let (owner, owner_field) = session
            .doc()
            .parent_of(element)
            .map(|(owner, field)| (owner.clone(), field.to_string()))
            .ok_or_else(|| TmplxError::NotAttached {
                node_id: element.clone(),
            })?;

        let message = get_message(session.doc(), element).cloned();
        let source = session.doc().node(element)?.clone();
        let (linked, scalar): (Fields, Fields) = source
            .fields
            .into_iter()
            .partition(|(_, value)| !value.linked_ids().is_empty());

        let replacement = session.create_node(&target.value, scalar);

        let mut moved: BTreeMap<String, Option<Value>> = linked
            .iter()
            .filter(|(name, _)| {
                name.as_str() != fields::EVENT_DEFINITIONS && name.as_str() != fields::MESSAGE_REF
            })
            .map(|(name, value)| (name.clone(), Some(value.clone())))
            .collect();
        if holds_message_ref(&target.value) {
            if let Some(message) = &message {
                moved.insert(
                    fields::MESSAGE_REF.to_string(),
                    Some(Value::Ref(message.clone())),
                );
            }
        }
        if let Some(kind) = &target.event_definition {
            let definition = match source_event_definition(session, element, kind) {
                Some(existing) => existing,
                None => {
                    let mut initial = Fields::new();
                    if let (kinds::MESSAGE_EVENT_DEFINITION, Some(message)) =
                        (kind.as_str(), &message)
                    {
                        initial.insert(
                            fields::MESSAGE_REF.to_string(),
                            Value::Ref(message.clone()),
                        );
                    }
                    session.create_node(kind, initial)
                }
            };
            moved.insert(
                fields::EVENT_DEFINITIONS.to_string(),
                Some(Value::Nodes(vec![definition])),
            );
        }
        session.update_fields(&replacement, moved)?;

        let released: BTreeMap<String, Option<Value>> =
            linked.into_keys().map(|name| (name, None)).collect();
        session.update_fields(element, released)?;

        swap_in_owner(session, &owner, &owner_field, element, &replacement)?;

        for (referrer, field) in session.doc().referrers(element) {
            session.set_field(&referrer, &field, Some(Value::Ref(replacement.clone())))?;
        }

        tracing::debug!(
            element_id = %element,
            replacement_id = %replacement,
            kind = %target.value,
            "replaced element"
        );
        Ok(replacement)
    }
}

fn source_event_definition(session: &Session<'_>, element: &NodeId, kind: &str) -> Option<NodeId> {
    let doc = session.doc();
    doc.get_list(element, fields::EVENT_DEFINITIONS)
        .iter()
        .find(|id| doc.is_kind(id, kind))
        .cloned()
}

fn swap_in_owner(
    session: &mut Session<'_>,
    owner: &NodeId,
    field: &str,
    element: &NodeId,
    replacement: &NodeId,
) -> Result<()> {
    match session.doc().get(owner, field) {
        Some(Value::Nodes(items)) => {
            let items: Vec<NodeId> = items
                .iter()
                .map(|id| if id == element { replacement.clone() } else { id.clone() })
                .collect();
            session.update_list(owner, field, items)?;
        }
        _ => {
            session.set_field(owner, field, Some(Value::Node(replacement.clone())))?;
        }
    }
    Ok(())
}
