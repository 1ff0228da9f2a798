//! Keyed-collection families
//!
//! Input/output mappings, task headers and custom properties live as one
//! entry node per templated property inside a singleton holder. Reconciling
//! runs in two passes: every entry present today starts as a removal
//! candidate, each new-template property either claims its entry or creates
//! one, and whatever is still a candidate at the end is pruned.

use std::collections::BTreeSet;

use crate::errors::{Result, TmplxError};
use crate::model::value::is_unset;
use crate::model::{Fields, NodeId, Value};
use crate::session::Session;
use crate::template::{Family, PropertyDescriptor, Template};

use super::locator::find_node;
use super::matching::find_old_property;
use super::value_policy::{should_create, should_keep_value};

/// Reconcile one keyed-collection family on `element`
///
/// # Errors
///
/// Returns `Internal` if `family` is not a keyed-collection family, or the
/// command log's error.
pub fn reconcile_collection(
    session: &mut Session<'_>,
    element: &NodeId,
    family: Family,
    old: Option<&Template>,
    new: &Template,
) -> Result<()> {
    let holder_kind = family.extension_kind().ok_or_else(|| TmplxError::Internal {
        message: format!("family {} has no holder", family),
    })?;
    let mut holder = session.doc().find_extension(element, holder_kind).cloned();

    if !new.has_family(family) {
        if let Some(holder) = holder {
            tracing::debug!(element_id = %element, %family, "removing holder");
            session.remove_extension(element, &holder)?;
        }
        return Ok(());
    }

    let mut candidates: BTreeSet<NodeId> = match &holder {
        Some(holder) => family
            .list_fields()
            .iter()
            .flat_map(|field| session.doc().get_list(holder, field).iter().cloned())
            .collect(),
        None => BTreeSet::new(),
    };

    for property in new.properties_of(family) {
        let value = property.default_value();
        let existing = find_node(session.doc(), element, &property.binding).cloned();

        match existing {
            Some(entry) => {
                let field = property.binding.tracked_field();
                let old_property = find_old_property(old, property);
                let keep = should_keep_value(session.doc().get(&entry, field), old_property, property);
                if !keep {
                    session.set_field(&entry, field, value.clone())?;
                }

                let disposable = property.optional && is_unset(value.as_ref()) && !keep;
                if !disposable {
                    candidates.remove(&entry);
                }
            }
            None if should_create(value.as_ref(), property) => {
                let holder_id = match holder.clone() {
                    Some(id) => id,
                    None => {
                        let id = session.create_node(holder_kind, Fields::new());
                        session.add_extension(element, id.clone())?;
                        holder = Some(id.clone());
                        id
                    }
                };
                append_entry(session, &holder_id, property, value)?;
            }
            None => {}
        }
    }

    let Some(holder) = holder else {
        return Ok(());
    };
    prune(session, element, &holder, family, &candidates)
}

fn append_entry(
    session: &mut Session<'_>,
    holder: &NodeId,
    property: &PropertyDescriptor,
    value: Option<Value>,
) -> Result<()> {
    let slot = property
        .binding
        .entry_slot()
        .ok_or_else(|| TmplxError::Internal {
            message: format!("binding {:?} has no collection entry", property.binding),
        })?;

    let mut initial = Fields::new();
    initial.insert(
        slot.key_field.to_string(),
        Value::from(property.binding.identity_key()),
    );
    if let Some(value) = value {
        initial.insert(slot.value_field.to_string(), value);
    }
    let entry = session.create_node(slot.entry_kind, initial);
    tracing::trace!(holder_id = %holder, entry_id = %entry, key = property.binding.identity_key(), "appending entry");

    let mut items = session.doc().get_list(holder, slot.list_field).to_vec();
    items.push(entry);
    session.update_list(holder, slot.list_field, items)?;
    Ok(())
}

/// Drop the remaining candidates; a holder left empty goes too
fn prune(
    session: &mut Session<'_>,
    element: &NodeId,
    holder: &NodeId,
    family: Family,
    candidates: &BTreeSet<NodeId>,
) -> Result<()> {
    let mut remaining = 0;
    for field in family.list_fields() {
        let items = session.doc().get_list(holder, field);
        let kept: Vec<NodeId> = items
            .iter()
            .filter(|id| !candidates.contains(*id))
            .cloned()
            .collect();
        remaining += kept.len();

        if kept.len() == items.len() {
            continue;
        }
        tracing::debug!(
            holder_id = %holder,
            field,
            removed = items.len() - kept.len(),
            "pruning entries"
        );
        if kept.is_empty() {
            session.set_field(holder, field, None)?;
        } else {
            session.update_list(holder, field, kept)?;
        }
    }

    if remaining == 0 {
        tracing::debug!(element_id = %element, %family, "removing empty holder");
        session.remove_extension(element, holder)?;
    }
    Ok(())
}
