//! Grammar failure reports as printed for a rejected file.

use std::path::Path;

use gamebook::base::LineIndex;
use gamebook::parser::{ParseFailure, parse};

use crate::helpers::store_helpers::compile_one;

fn failure(source: &str) -> ParseFailure {
    let parse = parse(source);
    ParseFailure::from_errors("story.gbook", &parse.errors, &LineIndex::new(source))
        .expect("source should be rejected")
}

#[test]
fn test_report_shows_hint_line_and_pointer() {
    let report = failure("# Scene: Hall\n## Passage: Gate\nGo to the [[door.\n").render();
    assert_eq!(
        report,
        "Expected ']]' to close the link:\nGo to the [[door.\n~~~~~~~~~~~~~~~~~^"
    );
}

#[test]
fn test_position_is_of_first_error() {
    let failure = failure("## Passage: Lost\nGo to [[the door.\n");
    assert_eq!(failure.position.line, 0);
    assert_eq!(failure.position.column, 0);
    assert!(failure.error_count >= 2);
    assert_eq!(failure.path, Path::new("story.gbook"));
}

#[test]
fn test_display_has_one_based_location() {
    let failure = failure("# Scene: S (dark\n");
    assert_eq!(
        failure.to_string(),
        "story.gbook:1:17: Expected ')' to close the state"
    );
}

#[test]
fn test_clean_source_has_no_failure() {
    let source = "# Scene: S\n## Passage: P\nFine.\n";
    let parse = parse(source);
    assert!(ParseFailure::from_errors("ok.gbook", &parse.errors, &LineIndex::new(source)).is_none());
}

#[test]
fn test_session_rejects_with_the_same_report() {
    let (session, result) = compile_one("# Scene: Hall\n## Passage: Gate\nGo to the [[door.\n");
    let err = result.unwrap_err();
    assert!(!err.is_fatal());
    assert!(err.render().starts_with("Expected ']]' to close the link:"));
    assert_eq!(
        session
            .store()
            .count(gamebook::store::Table::Nodes)
            .unwrap(),
        1
    );
}
