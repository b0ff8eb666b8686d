//! End-to-end tests: template editing, value filling and rendering

use pretty_assertions::assert_eq;

use blockprint::scope::{append_item, set_value, PathSegment};
use blockprint::tree::ROOT_ID;
use blockprint::{
    render, render_preview, Field, FieldRemoval, IntegrityAction, Node, RemoveField,
    TemplateDocument, Value, ValueObject,
};

const RESUME: &str = r#"{
    "id": "resume",
    "schemaVersion": 1,
    "page": { "size": "letter", "margins": { "top": 12, "right": 14, "bottom": 12, "left": 14 } },
    "fields": {
        "full_name": { "id": "full_name", "label": "Full Name", "placeholder": "Your name" },
        "email": { "id": "email", "label": "Email", "inputKind": "email" },
        "role": { "id": "role", "label": "Role" },
        "company": { "id": "company", "label": "Company" },
        "highlight": { "id": "highlight", "label": "Highlight" }
    },
    "layout": {
        "root": {
            "type": "section",
            "id": "root",
            "children": [
                { "type": "text-leaf", "id": "name_leaf", "bindField": "full_name", "size": "display" },
                { "type": "row", "id": "contact", "children": [
                    { "type": "text-leaf", "id": "email_header", "bindField": "email" }
                ]},
                { "type": "section", "id": "experience", "title": "Experience", "divider": true, "children": [
                    { "type": "repeat", "id": "exp", "label": "Positions", "children": [{
                        "type": "column", "id": "exp_item", "children": [
                            { "type": "text-leaf", "id": "role_leaf", "bindField": "role" },
                            { "type": "text-leaf", "id": "company_leaf", "bindField": "company" },
                            { "type": "repeat", "id": "highlights", "children": [
                                { "type": "text-leaf", "id": "highlight_leaf", "bindField": "highlight" }
                            ]}
                        ]
                    }]}
                ]},
                { "type": "text-leaf", "id": "email_footer", "bindField": "email", "size": "meta" }
            ]
        }
    }
}"#;

fn resume() -> TemplateDocument {
    TemplateDocument::from_json(RESUME).expect("fixture should load")
}

#[test]
fn test_empty_value_falls_back_to_placeholder() {
    let template = resume();
    let mut values = ValueObject::new();
    values.insert("full_name".to_string(), Value::text(""));

    let doc = render(&template, &values);
    assert!(doc.markup.contains(r#"<span class="bp-placeholder">Your name</span>"#));
    assert!(!doc.markup.contains("undefined"));
}

#[test]
fn test_repeat_expands_in_list_order() {
    let template = resume();
    let item = template.root().find("exp_item");

    let values = append_item(&ValueObject::new(), &[], "exp", item);
    let values = append_item(&values, &[], "exp", item);
    let first = vec![PathSegment::new("exp", 0)];
    let second = vec![PathSegment::new("exp", 1)];
    let values = set_value(&values, &first, "role", Value::text("Engineer"));
    let values = set_value(&values, &first, "company", Value::text("Acme"));
    let values = set_value(&values, &second, "role", Value::text("Manager"));
    let values = set_value(&values, &second, "company", Value::text("Globex"));

    let doc = render(&template, &values);
    let markup = &doc.markup;
    let engineer = markup.find("Engineer").expect("first instance rendered");
    let manager = markup.find("Manager").expect("second instance rendered");
    assert!(engineer < manager);
    assert_eq!(markup.matches(r#"data-node="role_leaf""#).count(), 2);
    assert!(markup.contains(r#"class="bp-repeat-item bp-card" data-index="1""#));
}

#[test]
fn test_nested_repeat_scopes_stay_separate() {
    let template = resume();
    let values: ValueObject = serde_json::from_str(
        r#"{
            "role": "outer role",
            "exp": [
                { "role": "Engineer", "highlights": [{ "highlight": "Shipped v1" }, { "highlight": "Hired team" }] },
                { "role": "Manager", "highlights": [{ "highlight": "Grew revenue" }] }
            ]
        }"#,
    )
    .unwrap();

    let markup = render(&template, &values).markup;
    let order: Vec<usize> = ["Engineer", "Shipped v1", "Hired team", "Manager", "Grew revenue"]
        .iter()
        .map(|text| markup.find(text).unwrap())
        .collect();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);
    // leaves read only their own scope
    assert!(!markup.contains("outer role"));
    assert_eq!(markup.matches("bp-repeat-item bp-inline").count(), 3);
}

#[test]
fn test_rename_then_remove_email() {
    let template = resume();

    let (renamed, warning) = template.rename_field("email", "contact_email").unwrap();
    let warning = warning.expect("both email leaves were bound");
    assert_eq!(warning.action, IntegrityAction::Rename);
    assert_eq!(warning.affected_nodes, vec!["email_header", "email_footer"]);
    assert_eq!(renamed.check_in_use("contact_email"), vec!["email_header", "email_footer"]);
    assert!(renamed.validate().is_empty());

    let confirm = renamed.remove_field("contact_email", RemoveField::default());
    let FieldRemoval::NeedsConfirmation(warning) = confirm else {
        panic!("removal of a bound field must ask first");
    };
    assert_eq!(warning.affected_nodes.len(), 2);

    let FieldRemoval::Removed { template: removed, cleared } =
        renamed.remove_field("contact_email", RemoveField { cascade: true })
    else {
        panic!("cascade removal must proceed");
    };
    assert_eq!(cleared, vec!["email_header", "email_footer"]);
    assert!(removed.check_in_use("contact_email").is_empty());
    assert!(removed.validate().is_empty());

    // cleared leaves fall back to sample text
    let markup = render(&removed, &ValueObject::new()).markup;
    assert_eq!(markup.matches(">Sample text</span>").count(), 2);
}

#[test]
fn test_preview_and_fill_share_everything_but_repeats() {
    let template = resume();
    let preview = render_preview(&template);
    let filled = render(&template, &ValueObject::new());

    assert_eq!(preview.stylesheet, filled.stylesheet);
    assert!(preview.markup.contains(">Positions</div>"));
    assert!(!filled.markup.contains("Positions"));
}

#[test]
fn test_page_size_reaches_stylesheet() {
    let doc = render(&resume(), &ValueObject::new());
    assert!(doc.stylesheet.contains("size: 215.9mm 279.4mm"));
    assert!(doc.stylesheet.contains("padding: 12mm 14mm 12mm 14mm"));
}

#[test]
fn test_edit_session_round_trips_through_json() {
    let template = resume()
        .upsert_field(Field::new("phone", "Phone"), None)
        .unwrap()
        .0
        .insert_child("contact", Node::leaf("phone_leaf", Some("phone")), Some(0))
        .unwrap()
        .move_node("email_footer", ROOT_ID, 1)
        .unwrap();

    let json = template.to_json_pretty().unwrap();
    let reloaded = TemplateDocument::from_json(&json).unwrap();
    assert_eq!(reloaded, template);

    let ids: Vec<&str> = reloaded.root().children().iter().map(Node::id).collect();
    assert_eq!(ids, vec!["name_leaf", "email_footer", "contact", "experience"]);
    assert_eq!(
        reloaded.root().find("contact").unwrap().children()[0].id(),
        "phone_leaf"
    );
}

#[test]
fn test_render_output_is_stable() {
    let template = resume();
    let values: ValueObject =
        serde_json::from_str(r#"{"full_name": "Ada", "exp": [{"role": "Engineer"}]}"#).unwrap();
    let runs: Vec<_> = (0..5).map(|_| render(&template, &values)).collect();
    assert!(runs.windows(2).all(|pair| pair[0] == pair[1]));
}
