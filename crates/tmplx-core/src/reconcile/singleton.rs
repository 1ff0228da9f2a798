//! Singleton-structured families
//!
//! Task definition and called element collapse several template fields onto
//! one node in the element's extension container.

use crate::errors::{Result, TmplxError};
use crate::model::kinds::fields;
use crate::model::{Fields, NodeId, Value};
use crate::session::Session;
use crate::template::{Family, Template};

use super::matching::{dropped_properties, find_old_property};
use super::value_policy::should_keep_value;

/// Reconcile one singleton family on `element`
///
/// The node is created with the first field's default; later fields go
/// through the value policy. Fields dropped since the old template are
/// cleared once every new field is in place.
///
/// # Errors
///
/// Returns `Internal` if `family` is not a singleton family, or the command
/// log's error.
pub fn reconcile_singleton(
    session: &mut Session<'_>,
    element: &NodeId,
    family: Family,
    old: Option<&Template>,
    new: &Template,
) -> Result<()> {
    let kind = family.extension_kind().ok_or_else(|| TmplxError::Internal {
        message: format!("family {} has no extension node", family),
    })?;
    let mut node = session.doc().find_extension(element, kind).cloned();

    if !new.has_family(family) {
        if let Some(node) = node {
            tracing::debug!(element_id = %element, %family, "removing singleton node");
            session.remove_extension(element, &node)?;
        }
        return Ok(());
    }

    for property in new.properties_of(family) {
        let field = property.binding.tracked_field();
        let value = property.default_value();

        match node.clone() {
            None => {
                let mut initial = initial_fields(family);
                if let Some(value) = value {
                    initial.insert(field.to_string(), value);
                }
                let created = session.create_node(kind, initial);
                session.add_extension(element, created.clone())?;
                tracing::debug!(element_id = %element, %family, node_id = %created, "created singleton node");
                node = Some(created);
            }
            Some(existing) => {
                let old_property = find_old_property(old, property);
                let current = session.doc().get(&existing, field);
                if !should_keep_value(current, old_property, property) {
                    session.set_field(&existing, field, value)?;
                }
            }
        }
    }

    if let Some(node) = &node {
        for dropped in dropped_properties(old, new, family) {
            session.set_field(node, dropped.binding.tracked_field(), None)?;
        }
    }
    Ok(())
}

fn initial_fields(family: Family) -> Fields {
    let mut initial = Fields::new();
    if family == Family::CalledElement {
        initial.insert(
            fields::PROPAGATE_ALL_CHILD_VARIABLES.to_string(),
            Value::Bool(false),
        );
    }
    initial
}
