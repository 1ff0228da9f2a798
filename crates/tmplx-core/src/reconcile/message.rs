//! Referenced message and its subscription
//!
//! The message is a root-level document entity the element points at through
//! `messageRef`. It is never owned by the element: this family only writes
//! fields on it, creates it when a templated value needs a home, and hands
//! removal over to the injected `MessageRemover`.

use std::collections::BTreeMap;

use crate::collaborators::MessageRemover;
use crate::errors::Result;
use crate::model::kinds::{self, fields};
use crate::model::{Fields, NodeId, Value};
use crate::session::Session;
use crate::template::{Binding, BindingKind, Family, PropertyDescriptor, Template};

use super::locator::{get_message, message_holder};
use super::matching::{dropped_properties, find_old_property};
use super::value_policy::{should_create, should_keep_value};

pub fn reconcile_message(
    session: &mut Session<'_>,
    element: &NodeId,
    old: Option<&Template>,
    new: &Template,
    remover: &dyn MessageRemover,
) -> Result<()> {
    if !new.has_family(Family::Message) {
        return remover.remove_message(session, element);
    }

    let Some(holder) = message_holder(session.doc(), element).cloned() else {
        tracing::debug!(element_id = %element, "element cannot reference a message");
        return Ok(());
    };
    let mut message = get_message(session.doc(), element).cloned();

    reconcile_message_fields(session, &holder, &mut message, old, new)?;
    reconcile_subscription(session, &holder, &mut message, old, new)?;

    if let Some(message) = &message {
        if session.doc().get_str(message, fields::MODELER_TEMPLATE) != Some(new.id.as_str()) {
            session.set_field(
                message,
                fields::MODELER_TEMPLATE,
                Some(Value::from(new.id.as_str())),
            )?;
        }
    }
    Ok(())
}

fn of_kind(
    template: &Template,
    kind: BindingKind,
) -> impl Iterator<Item = &PropertyDescriptor> {
    template
        .properties_of(Family::Message)
        .filter(move |p| p.binding.kind() == kind)
}

fn reconcile_message_fields(
    session: &mut Session<'_>,
    holder: &NodeId,
    message: &mut Option<NodeId>,
    old: Option<&Template>,
    new: &Template,
) -> Result<()> {
    for property in of_kind(new, BindingKind::MessageProperty) {
        let field = property.binding.tracked_field();
        let value = property.default_value();

        match message.clone() {
            Some(existing) => {
                let old_property = find_old_property(old, property);
                let current = session.doc().get(&existing, field);
                if !should_keep_value(current, old_property, property) {
                    session.set_field(&existing, field, value)?;
                }
            }
            None if should_create(value.as_ref(), property) => {
                let created = create_message(session, holder)?;
                session.set_field(&created, field, value)?;
                *message = Some(created);
            }
            None => {}
        }
    }

    if let Some(existing) = message.as_ref() {
        for dropped in dropped_properties(old, new, Family::Message) {
            if let Binding::MessageProperty { .. } = dropped.binding {
                session.set_field(existing, dropped.binding.tracked_field(), None)?;
            }
        }
    }
    Ok(())
}

/// Subscription fields merge into one node inside the message's container
fn reconcile_subscription(
    session: &mut Session<'_>,
    holder: &NodeId,
    message: &mut Option<NodeId>,
    old: Option<&Template>,
    new: &Template,
) -> Result<()> {
    let subscription = message
        .as_ref()
        .and_then(|m| session.doc().find_extension(m, kinds::SUBSCRIPTION))
        .cloned();

    let properties: Vec<&PropertyDescriptor> =
        of_kind(new, BindingKind::MessageSubscription).collect();

    if properties.is_empty() {
        if let (Some(message), Some(subscription)) = (message.as_ref(), subscription) {
            session.remove_extension(message, &subscription)?;
        }
        return Ok(());
    }

    let mut changes: BTreeMap<String, Option<Value>> = BTreeMap::new();
    for property in properties {
        let field = property.binding.tracked_field();
        let value = property.default_value();
        match &subscription {
            Some(existing) => {
                let old_property = find_old_property(old, property);
                let current = session.doc().get(existing, field);
                if !should_keep_value(current, old_property, property) {
                    changes.insert(field.to_string(), value);
                }
            }
            None if should_create(value.as_ref(), property) => {
                changes.insert(field.to_string(), value);
            }
            None => {}
        }
    }

    match subscription {
        Some(existing) => {
            for dropped in dropped_properties(old, new, Family::Message) {
                if let Binding::MessageSubscription { name } = &dropped.binding {
                    changes.insert(name.clone(), None);
                }
            }
            session.update_fields(&existing, changes)?;
        }
        None if !changes.is_empty() => {
            let message_id = match message.clone() {
                Some(id) => id,
                None => {
                    let id = create_message(session, holder)?;
                    *message = Some(id.clone());
                    id
                }
            };
            let initial: Fields = changes
                .into_iter()
                .filter_map(|(field, value)| value.map(|v| (field, v)))
                .collect();
            let created = session.create_node(kinds::SUBSCRIPTION, initial);
            tracing::debug!(message_id = %message_id, subscription_id = %created, "created subscription");
            session.add_extension(&message_id, created)?;
        }
        None => {}
    }
    Ok(())
}

/// Create a message under the definitions root and point `holder` at it
fn create_message(session: &mut Session<'_>, holder: &NodeId) -> Result<NodeId> {
    let message = session.create_node(kinds::MESSAGE, Fields::new());
    let root = session.doc().root().clone();

    let mut root_elements = session.doc().get_list(&root, fields::ROOT_ELEMENTS).to_vec();
    root_elements.push(message.clone());
    session.update_list(&root, fields::ROOT_ELEMENTS, root_elements)?;
    session.set_field(holder, fields::MESSAGE_REF, Some(Value::Ref(message.clone())))?;

    tracing::debug!(holder_id = %holder, message_id = %message, "created message");
    Ok(message)
}
