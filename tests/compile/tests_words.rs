//! Word index frequencies across a run.

use gamebook::base::constants::{LINE_BREAK_WORD, PARAGRAPH_BREAK_WORD};
use gamebook::store::Table;
use gamebook::syntax::{NodeKind, ScopeKind};

use crate::helpers::source_fixtures::{FOREST, LANTERNS};
use crate::helpers::store_helpers::{children_of_kind, compile_all, scope, word_text};

#[test]
fn test_frequency_counts_every_occurrence() {
    let (session, _) = compile_all(&[("cellar.gbook", LANTERNS)]);
    let store = session.store();

    let lantern = store.word("lantern").unwrap().expect("indexed");
    assert_eq!(lantern.frequency, 5);
    assert_eq!(session.indexes().words.frequency("lantern"), Some(5));
    // Case is significant
    assert_eq!(store.word("A").unwrap().unwrap().frequency, 1);
    assert_eq!(store.word("a").unwrap().unwrap().frequency, 1);
    assert_eq!(store.word(LINE_BREAK_WORD).unwrap().unwrap().frequency, 1);
}

#[test]
fn test_frequency_spans_files() {
    let (session, _) = compile_all(&[("one.gbook", LANTERNS), ("two.gbook", LANTERNS)]);
    let store = session.store();
    assert_eq!(store.word("lantern").unwrap().unwrap().frequency, 10);
}

#[test]
fn test_breaks_use_sentinels() {
    let (session, _) = compile_all(&[("forest.gbook", FOREST)]);
    let store = session.store();
    assert_eq!(store.word(PARAGRAPH_BREAK_WORD).unwrap().unwrap().frequency, 1);
    assert!(store.word(LINE_BREAK_WORD).unwrap().is_none());

    let passage = scope(store, ScopeKind::Passage, "Clearing");
    let content = &children_of_kind(store, passage.id, NodeKind::Content)[0];
    let paragraph = &children_of_kind(store, content.id, NodeKind::EndParagraph)[0];
    assert_eq!(paragraph.content, None);
    assert_eq!(word_text(store, paragraph), PARAGRAPH_BREAK_WORD);
}

#[test]
fn test_one_row_per_distinct_word() {
    let (session, _) = compile_all(&[("cellar.gbook", LANTERNS)]);
    let store = session.store();
    assert_eq!(
        store.count(Table::Words).unwrap() as usize,
        session.indexes().words.len()
    );
}

#[test]
fn test_literal_sentinel_spelling_is_a_plain_word() {
    let source = "# Scene: Radio\n## Passage: Dial\nSay NL now\nand NP then.\n";
    let (session, _) = compile_all(&[("radio.gbook", source)]);
    let store = session.store();

    let passage = scope(store, ScopeKind::Passage, "Dial");
    let content = &children_of_kind(store, passage.id, NodeKind::Content)[0];
    let children = store.children(content.id).unwrap();
    let literal = children
        .iter()
        .find(|n| n.kind == NodeKind::Word && word_text(store, n) == "NL")
        .expect("literal NL word");
    let line_break = &children_of_kind(store, content.id, NodeKind::NewLine)[0];
    assert_ne!(literal.ref_id, line_break.ref_id);
    assert_eq!(word_text(store, line_break), LINE_BREAK_WORD);

    for text in ["NL", "NP", LINE_BREAK_WORD] {
        assert_eq!(store.word(text).unwrap().unwrap().frequency, 1, "{text}");
    }
    assert!(store.word(PARAGRAPH_BREAK_WORD).unwrap().is_none());
}
