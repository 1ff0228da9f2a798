//! Node kinds and field names the template engine reads and writes
//!
//! Element kinds (`bpmn:ServiceTask`, ...) are open-ended strings. The
//! structures below are the ones templates manage.

// Document structure
pub const DEFINITIONS: &str = "bpmn:Definitions";
pub const PROCESS: &str = "bpmn:Process";
pub const EXTENSION_ELEMENTS: &str = "bpmn:ExtensionElements";
pub const MESSAGE: &str = "bpmn:Message";
pub const MESSAGE_EVENT_DEFINITION: &str = "bpmn:MessageEventDefinition";
pub const RECEIVE_TASK: &str = "bpmn:ReceiveTask";
pub const SEND_TASK: &str = "bpmn:SendTask";

// Singleton extensions
pub const TASK_DEFINITION: &str = "zeebe:TaskDefinition";
pub const CALLED_ELEMENT: &str = "zeebe:CalledElement";
pub const SUBSCRIPTION: &str = "zeebe:Subscription";

// Keyed collection holders and their entries
pub const IO_MAPPING: &str = "zeebe:IoMapping";
pub const INPUT: &str = "zeebe:Input";
pub const OUTPUT: &str = "zeebe:Output";
pub const TASK_HEADERS: &str = "zeebe:TaskHeaders";
pub const HEADER: &str = "zeebe:Header";
pub const PROPERTIES: &str = "zeebe:Properties";
pub const PROPERTY: &str = "zeebe:Property";

/// Field names
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const ROOT_ELEMENTS: &str = "rootElements";
    pub const FLOW_ELEMENTS: &str = "flowElements";
    pub const EXTENSION_ELEMENTS: &str = "extensionElements";
    pub const VALUES: &str = "values";
    pub const EVENT_DEFINITIONS: &str = "eventDefinitions";
    pub const MESSAGE_REF: &str = "messageRef";

    pub const MODELER_TEMPLATE: &str = "modelerTemplate";
    pub const MODELER_TEMPLATE_VERSION: &str = "modelerTemplateVersion";
    pub const MODELER_TEMPLATE_ICON: &str = "modelerTemplateIcon";

    pub const INPUT_PARAMETERS: &str = "inputParameters";
    pub const OUTPUT_PARAMETERS: &str = "outputParameters";
    pub const SOURCE: &str = "source";
    pub const TARGET: &str = "target";
    pub const KEY: &str = "key";
    pub const VALUE: &str = "value";
    pub const PROPERTIES: &str = "properties";
    pub const PROPAGATE_ALL_CHILD_VARIABLES: &str = "propagateAllChildVariables";
}
