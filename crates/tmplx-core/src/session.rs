//! Mutation handle used by the reconcilers
//!
//! A `Session` pairs read access to the document with the command log that
//! mutates it. Writes that would not change anything are dropped before they
//! reach the log, so re-applying a template whose state is already in place
//! records nothing.

use std::collections::BTreeMap;

use crate::command_stack::CommandLog;
use crate::commands::Command;
use crate::errors::Result;
use crate::model::kinds::{self, fields};
use crate::model::{Fields, NodeId, Value};
use crate::ops::Document;

pub struct Session<'a> {
    doc: &'a mut Document,
    log: &'a mut dyn CommandLog,
}

impl<'a> Session<'a> {
    pub fn new(doc: &'a mut Document, log: &'a mut dyn CommandLog) -> Self {
        Self { doc, log }
    }

    /// Read access to the document as mutated so far
    pub fn doc(&self) -> &Document {
        &*self.doc
    }

    /// Create a detached node (not a logged mutation)
    pub fn create_node(&mut self, kind: &str, fields: Fields) -> NodeId {
        self.doc.create_node(kind, fields)
    }

    /// Issue a command as-is
    ///
    /// # Errors
    ///
    /// Returns the command log's error.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        tracing::trace!(node_id = %command.target(), ?command, "execute");
        self.log.execute(self.doc, command)
    }

    /// Update several fields at once, skipping the ones already in place
    ///
    /// Returns whether a command was issued.
    ///
    /// # Errors
    ///
    /// Returns the command log's error.
    pub fn update_fields(
        &mut self,
        node: &str,
        fields: BTreeMap<String, Option<Value>>,
    ) -> Result<bool> {
        let changed: BTreeMap<String, Option<Value>> = fields
            .into_iter()
            .filter(|(name, value)| self.doc.get(node, name) != value.as_ref())
            .collect();

        if changed.is_empty() {
            return Ok(false);
        }
        self.execute(Command::UpdateFields {
            node: node.to_string(),
            fields: changed,
        })?;
        Ok(true)
    }

    /// Update one field; `None` clears it
    ///
    /// # Errors
    ///
    /// Returns the command log's error.
    pub fn set_field(&mut self, node: &str, field: &str, value: Option<Value>) -> Result<bool> {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), value);
        self.update_fields(node, fields)
    }

    /// Replace a child list, unless it already holds exactly `items`
    ///
    /// # Errors
    ///
    /// Returns the command log's error.
    pub fn update_list(&mut self, node: &str, field: &str, items: Vec<NodeId>) -> Result<bool> {
        if self.doc.get_list(node, field) == items.as_slice()
            && (self.doc.get(node, field).is_some() || items.is_empty())
        {
            return Ok(false);
        }
        self.execute(Command::UpdateList {
            node: node.to_string(),
            field: field.to_string(),
            items,
        })?;
        Ok(true)
    }

    /// Attach `extension` to `owner`'s extension container
    ///
    /// The container is created on first need, already holding the extension.
    ///
    /// # Errors
    ///
    /// Returns the command log's error.
    pub fn add_extension(&mut self, owner: &str, extension: NodeId) -> Result<()> {
        match self.doc.extension_elements(owner).cloned() {
            Some(container) => {
                let mut values = self.doc.get_list(&container, fields::VALUES).to_vec();
                values.push(extension);
                self.update_list(&container, fields::VALUES, values)?;
            }
            None => {
                let mut container_fields = Fields::new();
                container_fields.insert(fields::VALUES.to_string(), Value::Nodes(vec![extension]));
                let container = self.create_node(kinds::EXTENSION_ELEMENTS, container_fields);
                self.set_field(owner, fields::EXTENSION_ELEMENTS, Some(Value::Node(container)))?;
            }
        }
        Ok(())
    }

    /// Detach `extension` from `owner`'s container
    ///
    /// A container left without values is detached from the owner as well.
    ///
    /// # Errors
    ///
    /// Returns the command log's error.
    pub fn remove_extension(&mut self, owner: &str, extension: &str) -> Result<()> {
        let Some(container) = self.doc.extension_elements(owner).cloned() else {
            return Ok(());
        };
        let values: Vec<NodeId> = self
            .doc
            .get_list(&container, fields::VALUES)
            .iter()
            .filter(|id| id.as_str() != extension)
            .cloned()
            .collect();

        if values.is_empty() {
            self.set_field(owner, fields::EXTENSION_ELEMENTS, None)?;
        } else {
            self.update_list(&container, fields::VALUES, values)?;
        }
        Ok(())
    }
}
