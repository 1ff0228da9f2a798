use crate::errors::Result;
use crate::model::NodeId;
use crate::session::Session;
use crate::template::{Family, Template};

use super::matching::find_old_property;
use super::value_policy::should_keep_value;

/// Plain fields on the element itself
///
/// Fields the new template no longer lists are left alone: they are
/// ordinary element attributes the user may still want.
pub fn reconcile_properties(
    session: &mut Session<'_>,
    element: &NodeId,
    old: Option<&Template>,
    new: &Template,
) -> Result<()> {
    for property in new.properties_of(Family::Properties) {
        let field = property.binding.tracked_field();
        let old_property = find_old_property(old, property);
        let current = session.doc().get(element, field);

        if should_keep_value(current, old_property, property) {
            tracing::trace!(element_id = %element, field, "keeping edited value");
            continue;
        }
        session.set_field(element, field, property.default_value())?;
    }
    Ok(())
}
