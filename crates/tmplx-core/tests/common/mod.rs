use tmplx_core::model::kinds::{self, fields};
use tmplx_core::model::{Fields, NodeId, Value};
use tmplx_core::template::{Binding, PropertyDescriptor, Template};
use tmplx_core::{ChangeTemplateHandler, CommandStack, Document};

/// A document with one process, a command stack and the default handler
pub struct Fixture {
    pub doc: Document,
    pub stack: CommandStack,
    pub process: NodeId,
    pub handler: ChangeTemplateHandler,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let mut doc = Document::new();
        let root = doc.root().clone();
        let process = doc
            .insert_child(&root, fields::ROOT_ELEMENTS, kinds::PROCESS, Fields::new())
            .unwrap();
        Self {
            doc,
            stack: CommandStack::new(),
            process,
            handler: ChangeTemplateHandler::new(),
        }
    }

    /// Add a flow element of `kind` to the process (not logged)
    pub fn add_element(&mut self, kind: &str) -> NodeId {
        self.doc
            .insert_child(&self.process, fields::FLOW_ELEMENTS, kind, Fields::new())
            .unwrap()
    }

    /// Add an event carrying one message event definition (not logged)
    pub fn add_message_event(&mut self, kind: &str) -> NodeId {
        let event = self.add_element(kind);
        self.doc
            .insert_child(
                &event,
                fields::EVENT_DEFINITIONS,
                kinds::MESSAGE_EVENT_DEFINITION,
                Fields::new(),
            )
            .unwrap();
        event
    }

    /// Run one template change as a transaction
    pub fn change(&mut self, element: &NodeId, old: Option<&Template>, new: Option<&Template>) -> NodeId {
        self.handler
            .execute(&mut self.doc, &mut self.stack, element, old, new)
            .unwrap()
    }

    /// Simulate a user edit recorded outside any template change
    pub fn edit(&mut self, node: &NodeId, field: &str, value: Option<Value>) {
        tmplx_core::apply(
            &mut self.doc,
            &tmplx_core::Command::set_field(node.clone(), field, value),
        )
        .unwrap();
    }

    /// Current value tracked by `binding` on `element`
    pub fn value_of(&self, element: &NodeId, binding: &Binding) -> Option<Value> {
        tmplx_core::reconcile::property_value(&self.doc, element, binding).cloned()
    }

    pub fn extension(&self, element: &NodeId, kind: &str) -> Option<NodeId> {
        self.doc.find_extension(element, kind).cloned()
    }

    /// Entries of `list_field` in `element`'s holder of `holder_kind`
    pub fn entries(&self, element: &NodeId, holder_kind: &str, list_field: &str) -> Vec<NodeId> {
        self.extension(element, holder_kind)
            .map(|holder| self.doc.get_list(&holder, list_field).to_vec())
            .unwrap_or_default()
    }

    pub fn message_of(&self, element: &NodeId) -> Option<NodeId> {
        tmplx_core::reconcile::get_message(&self.doc, element).cloned()
    }

    pub fn root_elements(&self) -> Vec<NodeId> {
        self.doc
            .get_list(self.doc.root(), fields::ROOT_ELEMENTS)
            .to_vec()
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Template with the given id, version and properties
#[allow(dead_code)]
pub fn template(id: &str, version: u32, properties: Vec<PropertyDescriptor>) -> Template {
    let mut template = Template::new(id, Some(version));
    template.applies_to = vec!["bpmn:Task".to_string()];
    template.properties = properties;
    template
}

#[allow(dead_code)]
pub fn property(name: &str, value: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        Binding::Property {
            name: name.to_string(),
        },
        Some(value),
    )
}

#[allow(dead_code)]
pub fn task_definition(field: &str, value: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        Binding::TaskDefinition {
            property: field.to_string(),
        },
        Some(value),
    )
}

#[allow(dead_code)]
pub fn input(name: &str, source: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        Binding::Input {
            name: name.to_string(),
        },
        Some(source),
    )
}

#[allow(dead_code)]
pub fn output(source: &str, target: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        Binding::Output {
            source: source.to_string(),
        },
        Some(target),
    )
}

#[allow(dead_code)]
pub fn header(key: &str, value: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        Binding::TaskHeader {
            key: key.to_string(),
        },
        Some(value),
    )
}

#[allow(dead_code)]
pub fn zeebe_property(name: &str, value: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        Binding::ZeebeProperty {
            name: name.to_string(),
        },
        Some(value),
    )
}

#[allow(dead_code)]
pub fn called_element(field: &str, value: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        Binding::CalledElement {
            property: field.to_string(),
        },
        Some(value),
    )
}

#[allow(dead_code)]
pub fn message_property(name: &str, value: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        Binding::MessageProperty {
            name: name.to_string(),
        },
        Some(value),
    )
}

#[allow(dead_code)]
pub fn subscription(name: &str, value: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        Binding::MessageSubscription {
            name: name.to_string(),
        },
        Some(value),
    )
}
