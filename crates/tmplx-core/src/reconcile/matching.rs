//! Identity matching across template versions

use crate::template::{Family, PropertyDescriptor, Template};

/// Property of the previous template with the same binding kind and key
///
/// `None` when there is no previous template or the property is new.
pub fn find_old_property<'t>(
    old: Option<&'t Template>,
    new_property: &PropertyDescriptor,
) -> Option<&'t PropertyDescriptor> {
    old?.properties
        .iter()
        .find(|p| p.binding.same_identity(&new_property.binding))
}

/// Properties of `family` the previous template had and the new one lacks
pub fn dropped_properties<'t>(
    old: Option<&'t Template>,
    new: &Template,
    family: Family,
) -> Vec<&'t PropertyDescriptor> {
    let Some(old) = old else {
        return Vec::new();
    };
    old.properties_of(family)
        .filter(|p| {
            !new
                .properties
                .iter()
                .any(|n| n.binding.same_identity(&p.binding))
        })
        .collect()
}
