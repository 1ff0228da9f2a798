//! Binding classifier
//!
//! A binding says where in the document a template property's value lives
//! and how the property is recognised across template versions. Every
//! question the reconcilers ask about a binding is answered here with an
//! exhaustive match, so adding a binding kind fails to compile until each
//! question has an answer.

use serde::{Deserialize, Serialize};

use crate::model::kinds::{self, fields};

/// Where a property's value is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Binding {
    /// A field on the element itself
    #[serde(rename = "property")]
    Property { name: String },

    /// A field on the element's task definition
    #[serde(rename = "zeebe:taskDefinition")]
    TaskDefinition { property: String },

    /// Older spelling of `zeebe:taskDefinition` with `property: "type"`
    #[serde(rename = "zeebe:taskDefinition:type")]
    LegacyTaskDefinitionType,

    /// Input mapping, identified by the local variable it writes
    #[serde(rename = "zeebe:input")]
    Input { name: String },

    /// Output mapping, identified by the expression it reads
    #[serde(rename = "zeebe:output")]
    Output { source: String },

    #[serde(rename = "zeebe:taskHeader")]
    TaskHeader { key: String },

    #[serde(rename = "zeebe:property")]
    ZeebeProperty { name: String },

    #[serde(rename = "zeebe:calledElement")]
    CalledElement { property: String },

    /// A field on the message the element references
    #[serde(rename = "bpmn:Message#property")]
    MessageProperty { name: String },

    /// A field on the subscription inside the referenced message
    #[serde(rename = "bpmn:Message#zeebe:subscription#property")]
    MessageSubscription { name: String },
}

/// Binding kind without its identity payload
///
/// Both task-definition spellings share one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Property,
    TaskDefinition,
    Input,
    Output,
    TaskHeader,
    ZeebeProperty,
    CalledElement,
    MessageProperty,
    MessageSubscription,
}

/// Group of binding kinds reconciled together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Properties,
    TaskDefinition,
    IoMapping,
    TaskHeaders,
    ZeebeProperties,
    Message,
    CalledElement,
}

/// How a family's values are laid out in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyShape {
    /// Fields directly on the element
    Plain,
    /// Several fields on one shared node
    Singleton,
    /// One entry node per property inside a holder
    KeyedCollection,
    /// A referenced document entity not owned by the element
    SideDocument,
}

/// Where a keyed-collection entry lives inside its holder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySlot {
    /// List field on the holder
    pub list_field: &'static str,
    /// Kind of the entry node
    pub entry_kind: &'static str,
    /// Field carrying the identity key
    pub key_field: &'static str,
    /// Field carrying the tracked value
    pub value_field: &'static str,
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Binding::Property { .. } => BindingKind::Property,
            Binding::TaskDefinition { .. } | Binding::LegacyTaskDefinitionType => {
                BindingKind::TaskDefinition
            }
            Binding::Input { .. } => BindingKind::Input,
            Binding::Output { .. } => BindingKind::Output,
            Binding::TaskHeader { .. } => BindingKind::TaskHeader,
            Binding::ZeebeProperty { .. } => BindingKind::ZeebeProperty,
            Binding::CalledElement { .. } => BindingKind::CalledElement,
            Binding::MessageProperty { .. } => BindingKind::MessageProperty,
            Binding::MessageSubscription { .. } => BindingKind::MessageSubscription,
        }
    }

    /// Key matching this property against the previous template version
    ///
    /// Task-definition fields use the resolved field name, so the legacy
    /// spelling matches `zeebe:taskDefinition` with `property: "type"`.
    pub fn identity_key(&self) -> &str {
        match self {
            Binding::Property { name }
            | Binding::Input { name }
            | Binding::ZeebeProperty { name }
            | Binding::MessageProperty { name }
            | Binding::MessageSubscription { name } => name,
            Binding::TaskDefinition { property } | Binding::CalledElement { property } => property,
            Binding::LegacyTaskDefinitionType => "type",
            Binding::Output { source } => source,
            Binding::TaskHeader { key } => key,
        }
    }

    /// Field on the located node that holds the property's value
    ///
    /// Inputs are matched by target but track their source; outputs are
    /// matched by source but track their target.
    pub fn tracked_field(&self) -> &str {
        match self {
            Binding::Input { .. } => fields::SOURCE,
            Binding::Output { .. } => fields::TARGET,
            Binding::TaskHeader { .. } | Binding::ZeebeProperty { .. } => fields::VALUE,
            Binding::Property { .. }
            | Binding::TaskDefinition { .. }
            | Binding::LegacyTaskDefinitionType
            | Binding::CalledElement { .. }
            | Binding::MessageProperty { .. }
            | Binding::MessageSubscription { .. } => self.identity_key(),
        }
    }

    pub fn family(&self) -> Family {
        self.kind().family()
    }

    /// Entry placement for keyed-collection bindings
    pub fn entry_slot(&self) -> Option<EntrySlot> {
        match self {
            Binding::Input { .. } => Some(EntrySlot {
                list_field: fields::INPUT_PARAMETERS,
                entry_kind: kinds::INPUT,
                key_field: fields::TARGET,
                value_field: fields::SOURCE,
            }),
            Binding::Output { .. } => Some(EntrySlot {
                list_field: fields::OUTPUT_PARAMETERS,
                entry_kind: kinds::OUTPUT,
                key_field: fields::SOURCE,
                value_field: fields::TARGET,
            }),
            Binding::TaskHeader { .. } => Some(EntrySlot {
                list_field: fields::VALUES,
                entry_kind: kinds::HEADER,
                key_field: fields::KEY,
                value_field: fields::VALUE,
            }),
            Binding::ZeebeProperty { .. } => Some(EntrySlot {
                list_field: fields::PROPERTIES,
                entry_kind: kinds::PROPERTY,
                key_field: fields::NAME,
                value_field: fields::VALUE,
            }),
            Binding::Property { .. }
            | Binding::TaskDefinition { .. }
            | Binding::LegacyTaskDefinitionType
            | Binding::CalledElement { .. }
            | Binding::MessageProperty { .. }
            | Binding::MessageSubscription { .. } => None,
        }
    }

    /// Same kind and same identity key
    pub fn same_identity(&self, other: &Binding) -> bool {
        self.kind() == other.kind() && self.identity_key() == other.identity_key()
    }
}

impl BindingKind {
    pub fn family(&self) -> Family {
        match self {
            BindingKind::Property => Family::Properties,
            BindingKind::TaskDefinition => Family::TaskDefinition,
            BindingKind::Input | BindingKind::Output => Family::IoMapping,
            BindingKind::TaskHeader => Family::TaskHeaders,
            BindingKind::ZeebeProperty => Family::ZeebeProperties,
            BindingKind::CalledElement => Family::CalledElement,
            BindingKind::MessageProperty | BindingKind::MessageSubscription => Family::Message,
        }
    }
}

impl Family {
    pub fn shape(&self) -> FamilyShape {
        match self {
            Family::Properties => FamilyShape::Plain,
            Family::TaskDefinition | Family::CalledElement => FamilyShape::Singleton,
            Family::IoMapping | Family::TaskHeaders | Family::ZeebeProperties => {
                FamilyShape::KeyedCollection
            }
            Family::Message => FamilyShape::SideDocument,
        }
    }

    /// Kind of the extension node the family lives in, if any
    pub fn extension_kind(&self) -> Option<&'static str> {
        match self {
            Family::TaskDefinition => Some(kinds::TASK_DEFINITION),
            Family::CalledElement => Some(kinds::CALLED_ELEMENT),
            Family::IoMapping => Some(kinds::IO_MAPPING),
            Family::TaskHeaders => Some(kinds::TASK_HEADERS),
            Family::ZeebeProperties => Some(kinds::PROPERTIES),
            Family::Properties | Family::Message => None,
        }
    }

    /// Child-list fields of a keyed-collection holder
    pub fn list_fields(&self) -> &'static [&'static str] {
        match self {
            Family::IoMapping => &[fields::INPUT_PARAMETERS, fields::OUTPUT_PARAMETERS],
            Family::TaskHeaders => &[fields::VALUES],
            Family::ZeebeProperties => &[fields::PROPERTIES],
            Family::Properties | Family::TaskDefinition | Family::CalledElement | Family::Message => {
                &[]
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Family::Properties => "properties",
            Family::TaskDefinition => "task_definition",
            Family::IoMapping => "io_mapping",
            Family::TaskHeaders => "task_headers",
            Family::ZeebeProperties => "zeebe_properties",
            Family::Message => "message",
            Family::CalledElement => "called_element",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
