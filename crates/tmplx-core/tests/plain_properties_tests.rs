#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{property, template, Fixture};
use tmplx_core::model::Value;
use tmplx_core::template::PropertyType;

#[test]
fn test_keep_on_edit() {
    // GIVEN a task with template v1 (name defaults to "foo") edited to "bar"
    let mut fx = Fixture::new();
    let task = fx.add_element("bpmn:Task");
    let v1 = template("io.example.plain", 1, vec![property("name", "foo")]);
    let v2 = template("io.example.plain", 2, vec![property("name", "baz")]);
    fx.change(&task, None, Some(&v1));
    fx.edit(&task, "name", Some(Value::from("bar")));

    // WHEN upgrading to v2 (default "baz")
    fx.change(&task, Some(&v1), Some(&v2));

    // THEN the user's value survives
    assert_eq!(fx.doc.get_str(&task, "name"), Some("bar"));
}

#[test]
fn test_overwrite_on_unedited() {
    // GIVEN a task with template v1 applied and left untouched
    let mut fx = Fixture::new();
    let task = fx.add_element("bpmn:Task");
    let v1 = template("io.example.plain", 1, vec![property("name", "foo")]);
    let v2 = template("io.example.plain", 2, vec![property("name", "baz")]);
    fx.change(&task, None, Some(&v1));
    assert_eq!(fx.doc.get_str(&task, "name"), Some("foo"));

    // WHEN upgrading to v2
    fx.change(&task, Some(&v1), Some(&v2));

    // THEN the new default is written
    assert_eq!(fx.doc.get_str(&task, "name"), Some("baz"));
}

#[test]
fn test_new_field_keeps_manual_value() {
    // GIVEN a task the user named before any template was applied
    let mut fx = Fixture::new();
    let task = fx.add_element("bpmn:Task");
    fx.edit(&task, "name", Some(Value::from("Manual")));

    // WHEN a template introduces the field
    let v1 = template("io.example.plain", 1, vec![property("name", "foo")]);
    fx.change(&task, None, Some(&v1));

    // THEN the manual value is kept
    assert_eq!(fx.doc.get_str(&task, "name"), Some("Manual"));
}

#[test]
fn test_hidden_is_always_reapplied() {
    // GIVEN a hidden property the user overwrote
    let mut fx = Fixture::new();
    let task = fx.add_element("bpmn:Task");
    let v1 = template(
        "io.example.plain",
        1,
        vec![property("name", "constant").with_type(PropertyType::Hidden)],
    );
    fx.change(&task, None, Some(&v1));
    fx.edit(&task, "name", Some(Value::from("tampered")));

    // WHEN the template is applied again
    fx.change(&task, Some(&v1), Some(&v1));

    // THEN the constant is restored
    assert_eq!(fx.doc.get_str(&task, "name"), Some("constant"));
}

#[test]
fn test_dropdown_stale_choice_reset() {
    let mut fx = Fixture::new();
    let task = fx.add_element("bpmn:Task");
    let colour = |default: &str| {
        property("colour", default)
            .with_type(PropertyType::Dropdown)
            .with_choices(&["red", "blue"])
    };
    let v1 = template("io.example.colour", 1, vec![colour("blue")]);

    // GIVEN a stale value outside the choices
    fx.edit(&task, "colour", Some(Value::from("green")));

    // WHEN the dropdown template applies
    fx.change(&task, None, Some(&v1));

    // THEN the value is reset to the default
    assert_eq!(fx.doc.get_str(&task, "colour"), Some("blue"));

    // GIVEN a valid choice differing from the default
    fx.edit(&task, "colour", Some(Value::from("red")));

    // WHEN the template applies again
    fx.change(&task, Some(&v1), Some(&v1));

    // THEN the choice is kept
    assert_eq!(fx.doc.get_str(&task, "colour"), Some("red"));
}

#[test]
fn test_dropped_plain_field_is_left_alone() {
    // GIVEN a template that managed "documentation"
    let mut fx = Fixture::new();
    let task = fx.add_element("bpmn:Task");
    let v1 = template(
        "io.example.plain",
        1,
        vec![property("name", "foo"), property("documentation", "docs")],
    );
    let v2 = template("io.example.plain", 2, vec![property("name", "foo")]);
    fx.change(&task, None, Some(&v1));

    // WHEN v2 drops it
    fx.change(&task, Some(&v1), Some(&v2));

    // THEN the plain field stays as ordinary element data
    assert_eq!(fx.doc.get_str(&task, "documentation"), Some("docs"));
}
