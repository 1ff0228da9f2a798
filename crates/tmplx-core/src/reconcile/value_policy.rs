//! Keep-or-apply decision for a single property
//!
//! The element's current value survives a template change only when it
//! carries information the new template would lose: a user edit made after
//! the old template applied its default, or a manual value on a field the
//! old template never managed.

use crate::model::value::{is_unset, same_value};
use crate::model::Value;
use crate::template::{PropertyDescriptor, PropertyType};

/// Whether the current value must be preserved instead of replaced with
/// the new template's default
///
/// # Arguments
/// * `current` - Value the element holds today, if any
/// * `old` - Matching property of the previous template, if any
/// * `new` - Property of the template being applied
///
/// # Returns
/// * `Hidden` - never kept
/// * `Dropdown` - kept only while it is one of the new choices
/// * matched in the old template - kept iff it moved away from the old default
/// * newly introduced - kept iff already non-empty
pub fn should_keep_value(
    current: Option<&Value>,
    old: Option<&PropertyDescriptor>,
    new: &PropertyDescriptor,
) -> bool {
    match new.property_type {
        PropertyType::Hidden => false,
        PropertyType::Dropdown => current
            .and_then(Value::as_str)
            .is_some_and(|value| new.has_choice(value)),
        _ => match old {
            Some(old) => !same_value(current, old.default_value().as_ref()),
            None => !is_unset(current),
        },
    }
}

/// Whether a missing node or entry should be created to carry `value`
///
/// Optional properties with nothing to write are left out.
pub fn should_create(value: Option<&Value>, property: &PropertyDescriptor) -> bool {
    !is_unset(value) || property.is_required()
}
