//! Structure locator
//!
//! Finds the document node that realises a binding on an element. Lookups
//! never create anything; a missing container or entry yields `None`.

use crate::model::kinds::{self, fields};
use crate::model::{NodeId, Value};
use crate::ops::Document;
use crate::template::Binding;

/// Node holding the value of `binding` on `element`
pub fn find_node<'d>(doc: &'d Document, element: &'d NodeId, binding: &Binding) -> Option<&'d NodeId> {
    match binding {
        Binding::Property { .. } => doc.contains(element).then_some(element),
        Binding::TaskDefinition { .. } | Binding::LegacyTaskDefinitionType => {
            doc.find_extension(element, kinds::TASK_DEFINITION)
        }
        Binding::CalledElement { .. } => doc.find_extension(element, kinds::CALLED_ELEMENT),
        Binding::Input { .. }
        | Binding::Output { .. }
        | Binding::TaskHeader { .. }
        | Binding::ZeebeProperty { .. } => find_entry(doc, element, binding),
        Binding::MessageProperty { .. } => get_message(doc, element),
        Binding::MessageSubscription { .. } => {
            let message = get_message(doc, element)?;
            doc.find_extension(message, kinds::SUBSCRIPTION)
        }
    }
}

/// Current value of `binding` on `element`
pub fn property_value<'d>(
    doc: &'d Document,
    element: &'d NodeId,
    binding: &Binding,
) -> Option<&'d Value> {
    let node = find_node(doc, element, binding)?;
    doc.get(node, binding.tracked_field())
}

/// Keyed-collection entry whose key field equals the binding's identity key
fn find_entry<'d>(doc: &'d Document, element: &str, binding: &Binding) -> Option<&'d NodeId> {
    let slot = binding.entry_slot()?;
    let holder = doc.find_extension(element, binding.family().extension_kind()?)?;
    doc.get_list(holder, slot.list_field)
        .iter()
        .find(|entry| doc.get_str(entry, slot.key_field) == Some(binding.identity_key()))
}

/// Node carrying the element's `messageRef`
///
/// Receive and send tasks carry it themselves; events carry it on their
/// first message event definition.
pub fn message_holder<'d>(doc: &'d Document, element: &'d NodeId) -> Option<&'d NodeId> {
    match doc.kind_of(element)? {
        kind if holds_message_ref(kind) => Some(element),
        _ => doc
            .get_list(element, fields::EVENT_DEFINITIONS)
            .iter()
            .find(|id| doc.is_kind(id, kinds::MESSAGE_EVENT_DEFINITION)),
    }
}

/// Whether elements of `kind` carry `messageRef` themselves
pub fn holds_message_ref(kind: &str) -> bool {
    matches!(kind, kinds::RECEIVE_TASK | kinds::SEND_TASK)
}

/// Message referenced by the element, if any
pub fn get_message<'d>(doc: &'d Document, element: &'d NodeId) -> Option<&'d NodeId> {
    let holder = message_holder(doc, element)?;
    doc.get_ref(holder, fields::MESSAGE_REF)
}
