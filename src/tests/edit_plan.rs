use super::*;
use crate::executor::Executor;

const REQUEST: &str = r###"{
    "targetFile": "docs/requirements.md",
    "intents": [
        {
            "type": "replace_section_content_only",
            "target": {
                "sid": "/requirements/req-002",
                "targetContent": "Current content here.",
                "contextAnchor": "REQ-002"
            },
            "content": "Updated.",
            "reason": "clarify scope",
            "priority": "high"
        },
        {
            "type": "insert_section_content_only",
            "target": {"sid": "/requirements", "insertionPosition": "after"},
            "content": "## REQ-004"
        },
        {
            "type": "delete_section_content_only",
            "target": {"sid": "/requirements/req-003"}
        },
        {
            "type": "append_to_section",
            "target": {"sid": "/requirements"},
            "content": "Footnote."
        },
        {
            "type": "prepend_to_section",
            "target": {"sid": "/requirements"},
            "content": "Summary.",
            "priority": "low"
        }
    ]
}"###;

#[test]
fn test_parse_request() {
    let request = EditRequest::from_json(REQUEST).unwrap();
    assert_eq!(request.target_file, "docs/requirements.md");
    assert_eq!(request.intents.len(), 5);

    let EditIntent::ReplaceSectionContentOnly(replace) = &request.intents[0] else {
        panic!("expected a replace intent, got {:?}", request.intents[0]);
    };
    assert_eq!(replace.target.context_anchor.as_deref(), Some("REQ-002"));
    assert_eq!(replace.target.line_range, None);
    assert_eq!(replace.reason.as_deref(), Some("clarify scope"));
    assert_eq!(replace.priority, Priority::High);

    let EditIntent::InsertSectionContentOnly(insert) = &request.intents[1] else {
        panic!("expected an insert intent, got {:?}", request.intents[1]);
    };
    assert_eq!(insert.target.insertion_position, Some(InsertionPosition::After));
    assert_eq!(insert.priority, Priority::Medium);

    let EditIntent::DeleteSectionContentOnly(delete) = &request.intents[2] else {
        panic!("expected a delete intent, got {:?}", request.intents[2]);
    };
    assert_eq!(delete.target.content_to_remove, None);
    assert!(delete.content.is_empty());

    assert_eq!(request.intents[4].priority(), Priority::Low);
}

#[test]
fn test_accessors() {
    let request = EditRequest::from_json(REQUEST).unwrap();
    let sids: Vec<&str> = request.intents.iter().map(EditIntent::sid).collect();
    assert_eq!(
        sids,
        [
            "/requirements/req-002",
            "/requirements",
            "/requirements/req-003",
            "/requirements",
            "/requirements"
        ]
    );
    assert_eq!(request.intents[0].reason(), Some("clarify scope"));
    assert_eq!(request.intents[1].reason(), None);
}

#[test]
fn test_operation_names_match_wire_tags() {
    let request = EditRequest::from_json(REQUEST).unwrap();
    for intent in &request.intents {
        let value = serde_json::to_value(intent).unwrap();
        assert_eq!(value["type"], intent.operation());
    }
}

#[test]
fn test_unknown_operation_is_rejected() {
    let json = r#"{"targetFile": "a.md", "intents": [{"type": "rewrite_everything", "target": {"sid": "/a"}}]}"#;
    assert!(EditRequest::from_json(json).is_err());
}

#[test]
fn test_missing_sid_is_rejected() {
    let json = r#"{"targetFile": "a.md", "intents": [{"type": "append_to_section", "target": {}}]}"#;
    assert!(EditRequest::from_json(json).is_err());
}

#[test]
fn test_serialised_intent_omits_unset_fields() {
    let value = serde_json::to_value(EditIntent::append("/a", "text")).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "type": "append_to_section",
            "target": {"sid": "/a"},
            "content": "text",
            "priority": "medium"
        })
    );
}

#[test]
fn test_builders() {
    let intent = EditIntent::replace_content("/a", "old", "new")
        .with_anchor("marker")
        .with_reason("typo");
    let EditIntent::ReplaceSectionContentOnly(replace) = &intent else {
        panic!("expected a replace intent");
    };
    assert_eq!(replace.target.target_content.as_deref(), Some("old"));
    assert_eq!(replace.target.context_anchor.as_deref(), Some("marker"));
    assert_eq!(intent.reason(), Some("typo"));

    let append = EditIntent::append("/a", "x");
    assert_eq!(append.clone().with_anchor("ignored"), append);
}

#[test]
fn test_response_json() {
    let batch = Executor::new().execute(
        "# A\n\nbody\n",
        &[
            EditIntent::append("/a", "more"),
            EditIntent::delete_content("/a", "absent"),
        ],
    );
    let json = batch.response.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["success"], false);
    assert_eq!(value["successfulIntents"], 1);
    assert_eq!(value["failedIntents"][0]["index"], 1);
    assert_eq!(
        value["failedIntents"][0]["intent"]["type"],
        "delete_section_content_only"
    );
    assert_eq!(value["failedIntents"][0]["error"]["kind"], "ContentNotFound");

    let parsed: EditResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, batch.response);
}
