//! Template catalogue and default-template auto-apply
//!
//! Editors register templates in a [`TemplateCatalog`]. When a new element
//! is created, [`apply_default_template`] runs the handler once with the
//! default template registered for the element's kind.

use serde::{Deserialize, Serialize};

use crate::collaborators::{ElementReplacer, MessageRemover};
use crate::command_stack::CommandStack;
use crate::errors::{Result, TmplxError};
use crate::handler::ChangeTemplateHandler;
use crate::model::kinds::fields;
use crate::model::{NodeId, Value};
use crate::ops::Document;
use crate::template::Template;

/// Known templates, any number of versions per id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Parse a JSON array of templates
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn push(&mut self, template: Template) {
        self.templates.push(template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Look up a template by id
    ///
    /// Without a version the highest registered version wins.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` if no template matches.
    pub fn get(&self, id: &str, version: Option<u32>) -> Result<&Template> {
        let mut candidates = self.templates.iter().filter(|t| t.id == id);
        let found = match version {
            Some(v) => candidates.find(|t| t.version == Some(v)),
            None => candidates.max_by_key(|t| t.version.unwrap_or(0)),
        };
        found.ok_or_else(|| TmplxError::TemplateNotFound {
            template_id: id.to_string(),
            version,
        })
    }

    /// Default template registered for elements of `kind`
    pub fn default_for(&self, kind: &str) -> Option<&Template> {
        self.templates
            .iter()
            .filter(|t| t.is_default && t.applies_to.iter().any(|k| k == kind))
            .max_by_key(|t| t.version.unwrap_or(0))
    }

    /// Template currently stamped on `element`, if any
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for an unknown element and `TemplateNotFound`
    /// when the stamp names a template the catalogue does not hold.
    pub fn applied_to(&self, doc: &Document, element: &str) -> Result<Option<&Template>> {
        doc.node(element)?;
        let Some(id) = doc.get_str(element, fields::MODELER_TEMPLATE) else {
            return Ok(None);
        };
        let version = match doc.get(element, fields::MODELER_TEMPLATE_VERSION) {
            Some(Value::Int(v)) => u32::try_from(*v).ok(),
            _ => None,
        };
        self.get(id, version).map(Some)
    }
}

/// Apply the default template of `element`'s kind to a fresh element
///
/// Returns the (possibly replaced) element id, or `None` when the element
/// already carries a template or its kind has no default.
///
/// # Errors
///
/// Returns `NodeNotFound` for an unknown element, or the handler's error.
pub fn apply_default_template<R, M>(
    handler: &ChangeTemplateHandler<R, M>,
    doc: &mut Document,
    stack: &mut CommandStack,
    catalog: &TemplateCatalog,
    element: &NodeId,
) -> Result<Option<NodeId>>
where
    R: ElementReplacer,
    M: MessageRemover,
{
    let kind = doc.node(element)?.kind.clone();
    if doc.get(element, fields::MODELER_TEMPLATE).is_some() {
        return Ok(None);
    }
    let Some(template) = catalog.default_for(&kind) else {
        return Ok(None);
    };

    tracing::debug!(element_id = %element, template_id = %template.id, "applying default template");
    handler
        .execute(doc, stack, element, None, Some(template))
        .map(Some)
}
