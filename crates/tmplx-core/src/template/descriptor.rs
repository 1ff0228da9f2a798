use serde::{Deserialize, Serialize};

use super::binding::{Binding, Family};
use crate::model::Value;

/// An element template: a versioned schema of the structured state an
/// element should carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Element kinds the template can be applied to
    #[serde(default)]
    pub applies_to: Vec<String>,

    /// Applied automatically to new elements of an `applies_to` kind
    #[serde(default)]
    pub is_default: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,

    /// Structural variant the element must become
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<ElementType>,

    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl Template {
    /// Create an empty template with the given id and version
    pub fn new(id: impl Into<String>, version: Option<u32>) -> Self {
        Self {
            id: id.into(),
            name: None,
            version,
            description: None,
            applies_to: Vec::new(),
            is_default: false,
            icon: None,
            element_type: None,
            properties: Vec::new(),
        }
    }

    /// Properties belonging to one family, in template order
    pub fn properties_of(&self, family: Family) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties
            .iter()
            .filter(move |p| p.binding.family() == family)
    }

    /// Whether any property belongs to `family`
    pub fn has_family(&self, family: Family) -> bool {
        self.properties_of(family).next().is_some()
    }

    pub fn icon_contents(&self) -> Option<&str> {
        self.icon.as_ref().map(|i| i.contents.as_str())
    }
}

/// Display asset; opaque to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    pub contents: String,
}

/// Target structural variant of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementType {
    /// Element kind, e.g. `bpmn:ServiceTask`
    pub value: String,

    /// Event definition kind, e.g. `bpmn:MessageEventDefinition`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_definition: Option<String>,
}

/// Editor type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyType {
    #[default]
    String,
    Text,
    /// Constant; never user-editable
    Hidden,
    /// Enumerated choice
    Dropdown,
    Boolean,
    Number,
}

/// One choice of a `Dropdown` property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

/// Default value written by a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    String(String),
}

impl From<&Scalar> for Value {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

/// A single templated property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(rename = "type", default)]
    pub property_type: PropertyType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,

    /// Optional properties are not created while their value is empty
    #[serde(default)]
    pub optional: bool,

    pub binding: Binding,
}

impl PropertyDescriptor {
    /// A `String` property with the given binding and default
    pub fn new(binding: Binding, value: Option<&str>) -> Self {
        Self {
            label: None,
            property_type: PropertyType::String,
            value: value.map(|v| Scalar::String(v.to_string())),
            choices: None,
            optional: false,
            binding,
        }
    }

    pub fn with_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.choices = Some(
            choices
                .iter()
                .map(|c| Choice {
                    name: c.to_string(),
                    value: c.to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Value the template writes for this property
    ///
    /// An explicit `value`, else `false` for `Boolean`, else nothing.
    pub fn default_value(&self) -> Option<Value> {
        match (&self.value, self.property_type) {
            (Some(scalar), _) => Some(Value::from(scalar)),
            (None, PropertyType::Boolean) => Some(Value::Bool(false)),
            (None, _) => None,
        }
    }

    pub fn is_required(&self) -> bool {
        !self.optional
    }

    /// Whether `value` is one of this property's choices
    pub fn has_choice(&self, value: &str) -> bool {
        self.choices
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|c| c.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REST_TEMPLATE: &str = r#"{
        "id": "io.example.rest",
        "name": "REST call",
        "version": 2,
        "appliesTo": ["bpmn:Task"],
        "elementType": { "value": "bpmn:ServiceTask" },
        "icon": { "contents": "data:image/svg+xml;utf8,<svg/>" },
        "properties": [
            { "type": "Hidden", "value": "http", "binding": { "type": "zeebe:taskDefinition", "property": "type" } },
            { "label": "Method", "type": "Dropdown", "value": "GET",
              "choices": [ { "name": "GET", "value": "GET" }, { "name": "POST", "value": "POST" } ],
              "binding": { "type": "zeebe:input", "name": "method" } },
            { "label": "Verbose", "type": "Boolean", "binding": { "type": "zeebe:taskHeader", "key": "verbose" } },
            { "label": "Result", "optional": true, "binding": { "type": "zeebe:output", "source": "=body" } }
        ]
    }"#;

    #[test]
    fn test_template_deserializes() {
        let template: Template = serde_json::from_str(REST_TEMPLATE).unwrap();

        assert_eq!(template.id, "io.example.rest");
        assert_eq!(template.version, Some(2));
        assert_eq!(template.applies_to, vec!["bpmn:Task".to_string()]);
        assert!(!template.is_default);
        assert_eq!(
            template.element_type.as_ref().map(|t| t.value.as_str()),
            Some("bpmn:ServiceTask")
        );
        assert_eq!(template.properties.len(), 4);
        assert_eq!(template.properties[0].property_type, PropertyType::Hidden);
        assert!(template.properties[3].optional);
        assert_eq!(template.properties_of(Family::IoMapping).count(), 2);
        assert!(!template.has_family(Family::Message));
    }

    #[test]
    fn test_default_value_rules() {
        let template: Template = serde_json::from_str(REST_TEMPLATE).unwrap();

        assert_eq!(
            template.properties[0].default_value(),
            Some(Value::from("http"))
        );
        assert_eq!(
            template.properties[2].default_value(),
            Some(Value::Bool(false))
        );
        assert_eq!(template.properties[3].default_value(), None);
    }

    #[test]
    fn test_has_choice() {
        let template: Template = serde_json::from_str(REST_TEMPLATE).unwrap();
        let method = &template.properties[1];

        assert!(method.has_choice("POST"));
        assert!(!method.has_choice("PATCH"));
        assert!(!template.properties[0].has_choice("http"));
    }
}
