//! Per-family reconcilers
//!
//! Each family turns the difference between the old and new template into
//! commands on the session. Families run in [`FAMILY_ORDER`]; later ones can
//! observe what earlier ones (and the element type swap) did to the tree.

pub mod collection;
pub mod locator;
pub mod matching;
pub mod message;
pub mod properties;
pub mod singleton;
pub mod value_policy;

use crate::collaborators::MessageRemover;
use crate::errors::Result;
use crate::model::NodeId;
use crate::session::Session;
use crate::template::{Family, FamilyShape, Template};

pub use locator::{find_node, get_message, message_holder, property_value};
pub use matching::{dropped_properties, find_old_property};
pub use value_policy::{should_create, should_keep_value};

/// Order in which the handler runs the families
pub const FAMILY_ORDER: [Family; 7] = [
    Family::Properties,
    Family::TaskDefinition,
    Family::IoMapping,
    Family::TaskHeaders,
    Family::ZeebeProperties,
    Family::Message,
    Family::CalledElement,
];

/// Reconcile one family of `new` on `element`
///
/// # Errors
///
/// Returns the command log's error.
pub fn reconcile_family(
    session: &mut Session<'_>,
    element: &NodeId,
    family: Family,
    old: Option<&Template>,
    new: &Template,
    remover: &dyn MessageRemover,
) -> Result<()> {
    tracing::trace!(element_id = %element, %family, "reconciling family");
    match family.shape() {
        FamilyShape::Plain => properties::reconcile_properties(session, element, old, new),
        FamilyShape::Singleton => singleton::reconcile_singleton(session, element, family, old, new),
        FamilyShape::KeyedCollection => {
            collection::reconcile_collection(session, element, family, old, new)
        }
        FamilyShape::SideDocument => message::reconcile_message(session, element, old, new, remover),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_family_order_covers_every_family_once() {
        let unique: HashSet<Family> = FAMILY_ORDER.iter().copied().collect();
        assert_eq!(unique.len(), FAMILY_ORDER.len());
        assert_eq!(FAMILY_ORDER[0], Family::Properties);
        assert_eq!(FAMILY_ORDER[5], Family::Message);
        assert_eq!(FAMILY_ORDER[6], Family::CalledElement);
    }
}
