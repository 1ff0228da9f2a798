#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{message_property, property, subscription, template, Fixture};
use tmplx_core::collaborators::{DefaultElementReplacer, MessageRemover};
use tmplx_core::model::kinds::{self, fields};
use tmplx_core::model::{Fields, NodeId, Value};
use tmplx_core::template::ElementType;
use tmplx_core::{ChangeTemplateHandler, Result, Session};

/// Remover that leaves every message in place
struct KeepMessages;

impl MessageRemover for KeepMessages {
    fn remove_message(&self, _session: &mut Session<'_>, _element: &NodeId) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_message_created_for_receive_task() {
    // GIVEN a receive task without a message
    let mut fx = Fixture::new();
    let task = fx.add_element(kinds::RECEIVE_TASK);
    let v1 = template("io.example.inbound", 1, vec![message_property("name", "order-received")]);

    // WHEN a template with a message field is applied
    fx.change(&task, None, Some(&v1));

    // THEN a root-level message is created, referenced and stamped
    let message = fx.message_of(&task).unwrap();
    assert!(fx.root_elements().contains(&message));
    assert_eq!(fx.doc.get_str(&message, "name"), Some("order-received"));
    assert_eq!(
        fx.doc.get_str(&message, fields::MODELER_TEMPLATE),
        Some("io.example.inbound")
    );
    assert_eq!(fx.doc.get_ref(&task, fields::MESSAGE_REF), Some(&message));
}

#[test]
fn test_subscription_created_inside_message() {
    // GIVEN a message catch event
    let mut fx = Fixture::new();
    let event = fx.add_message_event("bpmn:IntermediateCatchEvent");
    let v1 = template(
        "io.example.inbound",
        1,
        vec![
            message_property("name", "payment"),
            subscription("correlationKey", "=orderId"),
        ],
    );

    // WHEN applied
    fx.change(&event, None, Some(&v1));

    // THEN the subscription lives in the message's own container
    let message = fx.message_of(&event).unwrap();
    let sub = fx.doc.find_extension(&message, kinds::SUBSCRIPTION).unwrap().clone();
    assert_eq!(fx.doc.get_str(&sub, "correlationKey"), Some("=orderId"));
    assert!(fx.doc.extension_elements(&event).is_none());
}

#[test]
fn test_subscription_only_template_creates_message() {
    let mut fx = Fixture::new();
    let task = fx.add_element(kinds::RECEIVE_TASK);
    let v1 = template(
        "io.example.inbound",
        1,
        vec![subscription("correlationKey", "=id")],
    );

    fx.change(&task, None, Some(&v1));

    let message = fx.message_of(&task).unwrap();
    assert!(fx.doc.find_extension(&message, kinds::SUBSCRIPTION).is_some());
}

#[test]
fn test_subscription_upgrade_respects_edits() {
    // GIVEN a subscription whose correlation key the user changed
    let mut fx = Fixture::new();
    let task = fx.add_element(kinds::RECEIVE_TASK);
    let v1 = template(
        "io.example.inbound",
        1,
        vec![
            subscription("correlationKey", "=a"),
            subscription("messageTtl", "PT1H"),
        ],
    );
    let v2 = template(
        "io.example.inbound",
        2,
        vec![
            subscription("correlationKey", "=b"),
            subscription("messageTtl", "PT2H"),
        ],
    );
    fx.change(&task, None, Some(&v1));
    let message = fx.message_of(&task).unwrap();
    let sub = fx.doc.find_extension(&message, kinds::SUBSCRIPTION).unwrap().clone();
    fx.edit(&sub, "correlationKey", Some(Value::from("=custom")));

    // WHEN upgrading
    fx.change(&task, Some(&v1), Some(&v2));

    // THEN the same subscription is updated field by field
    assert_eq!(
        fx.doc.find_extension(&message, kinds::SUBSCRIPTION),
        Some(&sub)
    );
    assert_eq!(fx.doc.get_str(&sub, "correlationKey"), Some("=custom"));
    assert_eq!(fx.doc.get_str(&sub, "messageTtl"), Some("PT2H"));
}

#[test]
fn test_dropped_message_field_is_cleared_not_deleted() {
    let mut fx = Fixture::new();
    let task = fx.add_element(kinds::RECEIVE_TASK);
    let v1 = template(
        "io.example.inbound",
        1,
        vec![message_property("name", "m"), subscription("correlationKey", "=k")],
    );
    let v2 = template("io.example.inbound", 2, vec![subscription("correlationKey", "=k")]);
    fx.change(&task, None, Some(&v1));
    let message = fx.message_of(&task).unwrap();

    fx.change(&task, Some(&v1), Some(&v2));

    assert_eq!(fx.message_of(&task), Some(message.clone()));
    assert!(fx.doc.get(&message, "name").is_none());
}

#[test]
fn test_template_without_message_detaches_unused_message() {
    // GIVEN a message used only by this task
    let mut fx = Fixture::new();
    let task = fx.add_element(kinds::RECEIVE_TASK);
    let v1 = template("io.example.inbound", 1, vec![message_property("name", "m")]);
    let v2 = template("io.example.inbound", 2, vec![property("name", "Plain")]);
    fx.change(&task, None, Some(&v1));
    let message = fx.message_of(&task).unwrap();

    // WHEN the new template has no message fields
    fx.change(&task, Some(&v1), Some(&v2));

    // THEN the reference is cleared and the message leaves the document
    assert!(fx.message_of(&task).is_none());
    assert!(!fx.root_elements().contains(&message));
}

#[test]
fn test_shared_message_is_kept() {
    // GIVEN two tasks referencing the same message
    let mut fx = Fixture::new();
    let first = fx.add_element(kinds::RECEIVE_TASK);
    let v1 = template("io.example.inbound", 1, vec![message_property("name", "m")]);
    fx.change(&first, None, Some(&v1));
    let message = fx.message_of(&first).unwrap();

    let mut second_fields = Fields::new();
    second_fields.insert(fields::MESSAGE_REF.to_string(), Value::Ref(message.clone()));
    let second = fx
        .doc
        .insert_child(&fx.process.clone(), fields::FLOW_ELEMENTS, kinds::RECEIVE_TASK, second_fields)
        .unwrap();

    // WHEN the first task switches to a template without message fields
    let v2 = template("io.example.plain", 1, vec![property("name", "Plain")]);
    fx.change(&first, Some(&v1), Some(&v2));

    // THEN only the first reference is dropped
    assert!(fx.message_of(&first).is_none());
    assert_eq!(fx.message_of(&second), Some(message.clone()));
    assert!(fx.root_elements().contains(&message));
}

#[test]
fn test_message_stamp_follows_current_template() {
    // GIVEN a message stamped by another template
    let mut fx = Fixture::new();
    let task = fx.add_element(kinds::RECEIVE_TASK);
    let other = template("io.example.other", 1, vec![message_property("name", "m")]);
    fx.change(&task, None, Some(&other));
    let message = fx.message_of(&task).unwrap();

    // WHEN switching templates
    let v1 = template("io.example.inbound", 1, vec![message_property("name", "m")]);
    fx.change(&task, Some(&other), Some(&v1));

    // THEN the message carries the current template id
    assert_eq!(
        fx.doc.get_str(&message, fields::MODELER_TEMPLATE),
        Some("io.example.inbound")
    );
}

#[test]
fn test_element_without_message_holder_is_skipped() {
    // GIVEN a plain task, which cannot reference a message
    let mut fx = Fixture::new();
    let task = fx.add_element("bpmn:Task");
    let v1 = template("io.example.inbound", 1, vec![message_property("name", "m")]);
    let roots_before = fx.root_elements();

    fx.change(&task, None, Some(&v1));

    assert_eq!(fx.root_elements(), roots_before);
}

#[test]
fn test_dropped_subscription_field_is_cleared() {
    // GIVEN a subscription with a correlation key and a TTL
    let mut fx = Fixture::new();
    let task = fx.add_element(kinds::RECEIVE_TASK);
    let v1 = template(
        "io.example.inbound",
        1,
        vec![
            subscription("correlationKey", "=orderId"),
            subscription("messageTtl", "PT1H"),
        ],
    );
    let v2 = template(
        "io.example.inbound",
        2,
        vec![subscription("correlationKey", "=orderId")],
    );
    fx.change(&task, None, Some(&v1));
    let message = fx.message_of(&task).unwrap();
    let sub = fx.doc.find_extension(&message, kinds::SUBSCRIPTION).unwrap().clone();

    // WHEN v2 no longer declares the TTL
    fx.change(&task, Some(&v1), Some(&v2));

    // THEN the TTL is cleared on the same subscription node
    assert_eq!(fx.doc.find_extension(&message, kinds::SUBSCRIPTION), Some(&sub));
    assert_eq!(fx.doc.get_str(&sub, "correlationKey"), Some("=orderId"));
    assert!(fx.doc.get(&sub, "messageTtl").is_none());
}

#[test]
fn test_subscription_removed_when_template_drops_all_its_fields() {
    // GIVEN a message with a subscription
    let mut fx = Fixture::new();
    let task = fx.add_element(kinds::RECEIVE_TASK);
    let v1 = template(
        "io.example.inbound",
        1,
        vec![
            message_property("name", "payment"),
            subscription("correlationKey", "=orderId"),
        ],
    );
    let v2 = template("io.example.inbound", 2, vec![message_property("name", "payment")]);
    fx.change(&task, None, Some(&v1));
    let message = fx.message_of(&task).unwrap();

    // WHEN v2 keeps the message field but no subscription field
    fx.change(&task, Some(&v1), Some(&v2));

    // THEN the message stays and its subscription (and emptied container) goes
    assert_eq!(fx.message_of(&task), Some(message.clone()));
    assert!(fx.doc.find_extension(&message, kinds::SUBSCRIPTION).is_none());
    assert!(fx.doc.extension_elements(&message).is_none());
}

#[test]
fn test_replaced_event_does_not_keep_message_alive() {
    // GIVEN a catch event and a receive task sharing one message
    let mut fx = Fixture::new();
    let event = fx.add_message_event("bpmn:IntermediateCatchEvent");
    let task = fx.add_element(kinds::RECEIVE_TASK);
    let inbound = template("io.example.inbound", 1, vec![message_property("name", "m")]);
    fx.change(&event, None, Some(&inbound));
    let message = fx.message_of(&event).unwrap();
    fx.edit(&task, fields::MESSAGE_REF, Some(Value::Ref(message.clone())));

    // AND the event becomes a timer event by a handler that leaves messages alone,
    // so its discarded message definition still points at the message
    let mut timer = template("io.example.timer", 1, vec![property("name", "Wait")]);
    timer.element_type = Some(ElementType {
        value: "bpmn:IntermediateCatchEvent".to_string(),
        event_definition: Some("bpmn:TimerEventDefinition".to_string()),
    });
    let keeping = ChangeTemplateHandler::with_collaborators(DefaultElementReplacer, KeepMessages);
    let replaced = keeping
        .execute(&mut fx.doc, &mut fx.stack, &event, Some(&inbound), Some(&timer))
        .unwrap();
    assert!(fx.message_of(&replaced).is_none());
    assert!(fx.root_elements().contains(&message));

    // WHEN the receive task switches to a template without message fields
    let plain = template("io.example.plain", 1, vec![property("name", "Plain")]);
    fx.change(&task, None, Some(&plain));

    // THEN no attached node references the message, so it is removed
    assert!(fx.message_of(&task).is_none());
    assert!(!fx.root_elements().contains(&message));
}
