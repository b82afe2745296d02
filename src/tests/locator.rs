use super::*;
use crate::error::ErrorKind;
use rstest::rstest;

const REQUIREMENTS: &str = "\
# Requirements

Overview paragraph.

## REQ-001 Login

Current content here.

## REQ-002 Export

Current content here.

## REQ-003 Audit

Current content here.
";

fn doc() -> Document {
    Document::parse(REQUIREMENTS).unwrap()
}

fn span_at(line: usize, start: usize, end: usize) -> Location {
    Location::Span(TextSpan {
        start: Position {
            line,
            column: start,
        },
        end: Position { line, column: end },
    })
}

#[rstest]
#[case("REQ-001", 7)]
#[case("REQ-002", 11)]
#[case("req-003 audit", 15)]
fn test_anchor_pins_the_right_occurrence(#[case] anchor: &str, #[case] line: usize) {
    let doc = doc();
    let locator = Locator::new(&doc);
    let located = locator
        .locate_content("/requirements", "Current content here.", Some(anchor))
        .unwrap();
    assert_eq!(located.location, span_at(line, 0, 21));
}

#[test]
fn test_unanchored_search_takes_first_match() {
    let doc = doc();
    let locator = Locator::new(&doc);
    let located = locator
        .locate_content("/requirements", "current CONTENT here", None)
        .unwrap();
    assert_eq!(located.location, span_at(7, 0, 20));
    assert_eq!(located.section_index, 0);
}

#[test]
fn test_search_within_subsection() {
    let doc = doc();
    let locator = Locator::new(&doc);
    let located = locator
        .locate_content("/requirements/req-002-export", "content", None)
        .unwrap();
    assert_eq!(located.location, span_at(11, 8, 15));
}

#[test]
fn test_strict_mode_rejects_ambiguous_target() {
    let doc = doc();
    let options = LocatorOptions {
        anchor_window: 3,
        strict: true,
    };
    let locator = Locator::with_options(&doc, options);
    let err = locator
        .locate_content("/requirements", "Current content here.", None)
        .unwrap_err();
    assert!(matches!(err, EditError::AmbiguousTarget { matches: 3, .. }));

    let anchored = locator
        .locate_content("/requirements", "Current content here.", Some("REQ-002"))
        .unwrap();
    assert_eq!(anchored.location, span_at(11, 0, 21));
}

#[test]
fn test_missing_anchor_does_not_fall_back() {
    let doc = doc();
    let locator = Locator::new(&doc);
    let err = locator
        .locate_content("/requirements", "Current content here.", Some("REQ-999"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContentNotFound);
}

#[test]
fn test_anchor_window_bounds_the_search() {
    let doc = doc();
    let options = LocatorOptions {
        anchor_window: 1,
        strict: false,
    };
    let locator = Locator::with_options(&doc, options);
    let err = locator
        .locate_content("/requirements", "Current content here.", Some("Overview"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContentNotFound);

    let err = locator
        .locate_content("/requirements", "Current content here.", Some("REQ-003"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContentNotFound);
}

#[test]
fn test_unbounded_anchor_window() {
    let doc = doc();
    let options = LocatorOptions {
        anchor_window: usize::MAX,
        strict: false,
    };
    let located = Locator::with_options(&doc, options)
        .locate_content("/requirements", "Current content here.", Some("REQ-003"))
        .unwrap();
    assert_eq!(located.location, span_at(15, 0, 21));
}

#[test]
fn test_anchor_on_same_line_as_target() {
    let text = "# Notes\n\n- alpha: todo\n- beta: todo\n";
    let doc = Document::parse(text).unwrap();
    let locator = Locator::new(&doc);
    let located = locator
        .locate_content("/notes", "todo", Some("beta"))
        .unwrap();
    assert_eq!(located.location, span_at(4, 8, 12));
}

#[test]
fn test_multi_line_target() {
    let doc = Document::parse("# A\nLine one\nLine two\n").unwrap();
    let locator = Locator::new(&doc);
    let located = locator.locate_content("/a", "one\nline", None).unwrap();
    assert_eq!(
        located.location,
        Location::Span(TextSpan {
            start: Position { line: 2, column: 5 },
            end: Position { line: 3, column: 4 },
        })
    );
}

#[test]
fn test_content_errors() {
    let doc = doc();
    let locator = Locator::new(&doc);

    let missing = locator.locate_content("/requirements", "nowhere", None);
    assert_eq!(missing.unwrap_err().kind(), ErrorKind::ContentNotFound);

    let empty = locator.locate_content("/requirements", "", None);
    assert_eq!(empty.unwrap_err().kind(), ErrorKind::MalformedIntent);

    let bad_sid = locator.locate_content("Requirements", "Overview", None);
    assert_eq!(bad_sid.unwrap_err().kind(), ErrorKind::InvalidSid);

    let unknown = locator.locate_content("/requirements/req-004", "Overview", None);
    assert_eq!(unknown.unwrap_err().kind(), ErrorKind::SectionNotFound);
}

#[rstest]
#[case(
    "/requirements",
    SectionOperation::Replace,
    Location::Range(LineRange::new(1, 15))
)]
#[case("/requirements", SectionOperation::Prepend, Location::Insertion(2))]
#[case("/requirements", SectionOperation::Append, Location::Insertion(4))]
#[case("/requirements", SectionOperation::After, Location::Insertion(16))]
#[case(
    "/requirements/req-002-export",
    SectionOperation::Replace,
    Location::Range(LineRange::new(9, 12))
)]
#[case("/requirements/req-002-export", SectionOperation::Before, Location::Insertion(9))]
#[case("/requirements/req-002-export", SectionOperation::After, Location::Insertion(13))]
#[case("/requirements/req-001-login", SectionOperation::Append, Location::Insertion(8))]
#[case("/requirements/req-003-audit", SectionOperation::After, Location::Insertion(16))]
fn test_section_operations(
    #[case] sid: &str,
    #[case] operation: SectionOperation,
    #[case] expected: Location,
) {
    let doc = doc();
    let located = Locator::new(&doc).locate_section(sid, operation).unwrap();
    assert_eq!(located.location, expected);
}

#[test]
fn test_append_to_heading_only_section() {
    let doc = Document::parse("# A\n\n\n## B\ntext\n").unwrap();
    let locator = Locator::new(&doc);
    let located = locator.locate_section("/a", SectionOperation::Append).unwrap();
    assert_eq!(located.location, Location::Insertion(2));
}

#[test]
fn test_replace_round_trips_every_section() {
    let doc = doc();
    let locator = Locator::new(&doc);
    for section in doc.sections() {
        let located = locator
            .locate_section(&section.sid, SectionOperation::Replace)
            .unwrap();
        assert_eq!(located.location, Location::Range(section.range()));
    }
}

#[test]
fn test_relative_lines() {
    let doc = doc();
    let locator = Locator::new(&doc);

    let after = locator
        .locate_relative(
            "/requirements",
            "overview paragraph",
            InsertionPosition::After,
            None,
        )
        .unwrap();
    assert_eq!(after.location, Location::Insertion(4));

    let before = locator
        .locate_relative(
            "/requirements",
            "Overview paragraph.",
            InsertionPosition::Before,
            None,
        )
        .unwrap();
    assert_eq!(before.location, Location::Insertion(3));

    let anchored = locator
        .locate_relative(
            "/requirements",
            "current content here",
            InsertionPosition::After,
            Some("REQ-003"),
        )
        .unwrap();
    assert_eq!(anchored.location, Location::Insertion(16));
}

#[test]
fn test_relative_line_errors() {
    let doc = doc();
    let locator = Locator::new(&doc);

    let err = locator
        .locate_relative("/requirements", "!!!", InsertionPosition::After, None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedIntent);

    let err = locator
        .locate_relative("/requirements", "absent", InsertionPosition::After, None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContentNotFound);
}

#[test]
fn test_context() {
    let doc = doc();
    let located = Locator::new(&doc)
        .locate_section("/requirements/req-002-export", SectionOperation::Replace)
        .unwrap();
    assert_eq!(
        located.context,
        LocationContext {
            section_title: "REQ-002 Export".to_string(),
            parent_title: Some("Requirements".to_string()),
            previous_sibling: Some("REQ-001 Login".to_string()),
            next_sibling: Some("REQ-003 Audit".to_string()),
            breadcrumb: vec!["Requirements".to_string(), "REQ-002 Export".to_string()],
        }
    );
}

#[test]
fn test_probe_found() {
    let doc = doc();
    let request = LocateRequest {
        sid: "/requirements".to_string(),
        target_content: Some("Current content here.".to_string()),
        context_anchor: Some("REQ-002".to_string()),
        ..LocateRequest::default()
    };
    let result = Locator::new(&doc).probe(&request);

    assert!(result.found);
    assert_eq!(result.span.map(|span| span.start.line), Some(11));
    assert_eq!(result.range, None);
    assert!(result.error.is_none());
}

#[test]
fn test_probe_from_json() {
    let doc = doc();
    let request: LocateRequest = serde_json::from_str(
        r#"{"sid": "/requirements/req-001-login", "operation": "after"}"#,
    )
    .unwrap();
    let result = Locator::new(&doc).probe(&request);
    assert_eq!(result.insertion_point, Some(9));

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["found"], true);
    assert_eq!(value["context"]["sectionTitle"], "REQ-001 Login");
}

#[test]
fn test_probe_reports_failure() {
    let doc = doc();
    let request = LocateRequest {
        sid: "/nope".to_string(),
        ..LocateRequest::default()
    };
    let result = Locator::new(&doc).probe(&request);
    assert!(!result.found);

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["error"]["kind"], "SectionNotFound");
    assert!(value.get("context").is_none());
}
