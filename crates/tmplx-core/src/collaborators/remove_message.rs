use crate::errors::Result;
use crate::model::kinds::fields;
use crate::model::NodeId;
use crate::reconcile::locator::{get_message, message_holder};
use crate::session::Session;

/// Decides what happens to an element's message once no template property
/// needs it
pub trait MessageRemover {
    /// Detach (and possibly delete) the message `element` references
    ///
    /// # Errors
    ///
    /// Returns the command log's error.
    fn remove_message(&self, session: &mut Session<'_>, element: &NodeId) -> Result<()>;
}

/// Clears the element's `messageRef`; drops the message from its owner only
/// when nothing else still references it
///
/// # Example
/// ```
/// use tmplx_core::collaborators::{DetachUnusedMessage, MessageRemover};
/// use tmplx_core::model::kinds::{self, fields};
/// use tmplx_core::model::{Fields, Value};
/// use tmplx_core::{CommandStack, Document, Session};
///
/// let mut doc = Document::new();
/// let root = doc.root().clone();
/// let message = doc
///     .insert_child(&root, fields::ROOT_ELEMENTS, kinds::MESSAGE, Fields::new())
///     .unwrap();
/// let mut task_fields = Fields::new();
/// task_fields.insert(fields::MESSAGE_REF.to_string(), Value::Ref(message.clone()));
/// let task = doc.create_node(kinds::RECEIVE_TASK, task_fields);
///
/// let mut stack = CommandStack::new();
/// let mut session = Session::new(&mut doc, &mut stack);
/// DetachUnusedMessage.remove_message(&mut session, &task).unwrap();
///
/// assert!(doc.get(&task, fields::MESSAGE_REF).is_none());
/// assert!(doc.get_list(&root, fields::ROOT_ELEMENTS).is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachUnusedMessage;

impl MessageRemover for DetachUnusedMessage {
    fn remove_message(&self, session: &mut Session<'_>, element: &NodeId) -> Result<()> {
        let Some(holder) = message_holder(session.doc(), element).cloned() else {
            return Ok(());
        };
        let Some(message) = get_message(session.doc(), element).cloned() else {
            return Ok(());
        };

        session.set_field(&holder, fields::MESSAGE_REF, None)?;

        if !session.doc().referrers(&message).is_empty() {
            tracing::debug!(message_id = %message, "message still referenced, keeping it");
            return Ok(());
        }

        let Some((owner, field)) = session
            .doc()
            .parent_of(&message)
            .map(|(owner, field)| (owner.clone(), field.to_string()))
        else {
            return Ok(());
        };
        let remaining: Vec<NodeId> = session
            .doc()
            .get_list(&owner, &field)
            .iter()
            .filter(|id| **id != message)
            .cloned()
            .collect();
        session.update_list(&owner, &field, remaining)?;
        tracing::debug!(message_id = %message, "removed unused message");
        Ok(())
    }
}
