//! Change-template handler
//!
//! Sequences one template change on one element:
//!
//! 1. Stamp the template identity on the element (or clear it on removal)
//! 2. Swap the element's structural type when the new template asks for it;
//!    a message the new type cannot reference goes to the message remover first
//! 3. Run every family reconciler in [`FAMILY_ORDER`]
//!
//! Removing a template (`new == None`) stops after step 1. Structured
//! content stays on the element as user-owned data.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::collaborators::replace::{matches_element_type, references_message};
use crate::collaborators::{
    DefaultElementReplacer, DetachUnusedMessage, ElementReplacer, MessageRemover,
};
use crate::command_stack::CommandStack;
use crate::errors::Result;
use crate::model::kinds::fields;
use crate::model::{NodeId, Value};
use crate::ops::Document;
use crate::reconcile::{reconcile_family, FAMILY_ORDER};
use crate::session::Session;
use crate::template::Template;
use crate::{log_op_end, log_op_error, log_op_start};

/// Label of the transaction a template change is recorded under
pub const CHANGE_TEMPLATE_LABEL: &str = "element.changeTemplate";

const OP: &str = "change_template";

/// Applies, upgrades and removes element templates
///
/// The element type swap and message removal are delegated to the injected
/// collaborators.
#[derive(Debug, Clone, Default)]
pub struct ChangeTemplateHandler<R = DefaultElementReplacer, M = DetachUnusedMessage> {
    replacer: R,
    remover: M,
}

impl ChangeTemplateHandler {
    /// Handler with the default collaborators
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: ElementReplacer, M: MessageRemover> ChangeTemplateHandler<R, M> {
    pub fn with_collaborators(replacer: R, remover: M) -> Self {
        Self { replacer, remover }
    }

    /// Reconcile `element` from `old` to `new` inside an open session
    ///
    /// Returns the element id to use from now on; it differs from `element`
    /// when the type swap replaced the node.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a collaborator or the command log.
    /// The caller's transaction is expected to roll back.
    pub fn change_template(
        &self,
        session: &mut Session<'_>,
        element: &NodeId,
        old: Option<&Template>,
        new: Option<&Template>,
    ) -> Result<NodeId> {
        session.doc().node(element)?;
        stamp_identity(session, element, new)?;

        let Some(new) = new else {
            return Ok(element.clone());
        };

        let element = self.replace_type(session, element, old, new)?;
        for family in FAMILY_ORDER {
            reconcile_family(session, &element, family, old, new, &self.remover)?;
        }
        Ok(element)
    }

    /// Run [`Self::change_template`] as one undoable transaction
    ///
    /// # Errors
    ///
    /// Returns the error of the failed step; the document is rolled back to
    /// its state before the call.
    pub fn execute(
        &self,
        doc: &mut Document,
        stack: &mut CommandStack,
        element: &NodeId,
        old: Option<&Template>,
        new: Option<&Template>,
    ) -> Result<NodeId> {
        let start = Instant::now();
        let old_template_id = old.map(|t| t.id.as_str()).unwrap_or_default();
        let new_template_id = new.map(|t| t.id.as_str()).unwrap_or_default();
        log_op_start!(
            OP,
            element_id = element.as_str(),
            old_template_id = old_template_id,
            new_template_id = new_template_id
        );

        let before = stack.command_count();
        let result = stack.transact(doc, CHANGE_TEMPLATE_LABEL, |session| {
            self.change_template(session, element, old, new)
        });
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(element) => {
                let command_count = stack.command_count().saturating_sub(before);
                log_op_end!(
                    OP,
                    duration_ms = duration_ms,
                    element_id = element.as_str(),
                    command_count = command_count
                );
                Ok(element)
            }
            Err(err) => {
                log_op_error!(OP, &err, duration_ms = duration_ms, element_id = element.as_str());
                Err(err)
            }
        }
    }

    fn replace_type(
        &self,
        session: &mut Session<'_>,
        element: &NodeId,
        old: Option<&Template>,
        new: &Template,
    ) -> Result<NodeId> {
        let Some(target) = &new.element_type else {
            return Ok(element.clone());
        };
        let unchanged = old.and_then(|t| t.element_type.as_ref()) == Some(target);
        if unchanged || matches_element_type(session, element, target) {
            return Ok(element.clone());
        }
        if !references_message(target) {
            // the replacement has nowhere to keep the message
            self.remover.remove_message(session, element)?;
        }
        self.replacer.replace_element(session, element, target)
    }
}

/// Set or clear the `modelerTemplate*` identity stamps on `element`
fn stamp_identity(
    session: &mut Session<'_>,
    element: &NodeId,
    template: Option<&Template>,
) -> Result<()> {
    let mut stamps = BTreeMap::new();
    stamps.insert(
        fields::MODELER_TEMPLATE.to_string(),
        template.map(|t| Value::from(t.id.as_str())),
    );
    stamps.insert(
        fields::MODELER_TEMPLATE_VERSION.to_string(),
        template.and_then(|t| t.version).map(|v| Value::Int(i64::from(v))),
    );
    stamps.insert(
        fields::MODELER_TEMPLATE_ICON.to_string(),
        template.and_then(Template::icon_contents).map(Value::from),
    );
    session.update_fields(element, stamps)?;
    Ok(())
}
