//! Rows written for a single source unit.

use gamebook::store::Table;
use gamebook::syntax::{NodeKind, ScopeKind};

use crate::helpers::source_fixtures::{
    BAD_HEADER_SCRIPT, CONDITIONAL, DOOR, EMPTY_LINK, FOREST, ITEM,
};
use crate::helpers::store_helpers::{
    assert_parents_precede_children, children_of_kind, compile_all, compile_one, scope,
    warning_codes, word_text,
};

#[test]
fn test_door_scenario() {
    let (session, diagnostics) = compile_all(&[("hall.gbook", DOOR)]);
    let store = session.store();
    assert!(diagnostics.is_empty());

    let passage = scope(store, ScopeKind::Passage, "Entrance");
    let content = &children_of_kind(store, passage.id, NodeKind::Content)[0];
    let children = store.children(content.id).unwrap();

    let kinds: Vec<_> = children.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Word,
            NodeKind::Word,
            NodeKind::Word,
            NodeKind::Link,
            NodeKind::Punctuation
        ]
    );
    let words: Vec<_> = children
        .iter()
        .filter(|n| n.kind == NodeKind::Word)
        .map(|n| word_text(store, n))
        .collect();
    assert_eq!(words, vec!["Go", "to", "the"]);

    let link = &children[3];
    assert_eq!(store.count(Table::Nodes).unwrap(), 15);
    assert_eq!(link.content.as_deref(), Some("door"));
    let link_words = store.children(link.id).unwrap();
    assert_eq!(link_words.len(), 1);
    assert_eq!(word_text(store, &link_words[0]), "door");

    let action = store
        .action(&format!("p{}_door", passage.id))
        .unwrap()
        .expect("stub action");
    assert_eq!(action.script, None);
    assert_eq!(link.ref_id, Some(action.id));
}

#[test]
fn test_content_children_are_ranked() {
    let (session, _) = compile_all(&[("forest.gbook", FOREST)]);
    let store = session.store();
    let passage = scope(store, ScopeKind::Passage, "Clearing");
    let content = &children_of_kind(store, passage.id, NodeKind::Content)[0];

    let sorts: Vec<_> = store
        .children(content.id)
        .unwrap()
        .iter()
        .map(|n| n.sort_index)
        .collect();
    let expected: Vec<_> = (1..=14).map(Some).collect();
    assert_eq!(sorts, expected);
}

#[test]
fn test_header_folded_into_scope_rows() {
    let (session, _) = compile_all(&[("forest.gbook", FOREST)]);
    let store = session.store();

    let module = scope(store, ScopeKind::Module, "Lands");
    assert_eq!(module.parent_scope_id, None);
    assert_eq!(module.summary.as_deref(), Some("The lands"));
    assert_eq!(module.script, None);

    let scene = scope(store, ScopeKind::Scene, "Forest");
    assert_eq!(scene.parent_scope_id, Some(module.id));
    assert_eq!(scene.state.as_deref(), Some("dark"));
    assert_eq!(scene.summary.as_deref(), Some("Tall trees"));
    assert_eq!(
        scene.script.as_deref(),
        Some(format!("var s{}={{visited:false}};", scene.id).as_str())
    );

    // The header is also kept as nodes
    let header = &children_of_kind(store, scene.id, NodeKind::Header)[0];
    let fields: Vec<_> = store
        .children(header.id)
        .unwrap()
        .into_iter()
        .map(|n| (n.kind, n.content))
        .collect();
    assert_eq!(
        fields,
        vec![
            (NodeKind::Identifier, Some("Forest".to_string())),
            (NodeKind::State, Some("dark".to_string())),
            (NodeKind::Summary, Some("Tall trees".to_string())),
            (NodeKind::Script, scene.script.clone()),
        ]
    );
}

#[test]
fn test_implicit_module_is_main() {
    let (session, _) = compile_all(&[("hall.gbook", DOOR)]);
    let store = session.store();
    let module = scope(store, ScopeKind::Module, "main");
    let node = store.node(module.id).unwrap().unwrap();
    assert_eq!(node.parent_id, Some(store.root()));
    assert!(children_of_kind(store, module.id, NodeKind::Header).is_empty());
}

#[test]
fn test_item_scope() {
    let (session, diagnostics) = compile_all(&[("lamp.gbook", ITEM)]);
    let store = session.store();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let module = scope(store, ScopeKind::Module, "main");
    let item = scope(store, ScopeKind::Item, "Lamp");
    assert_eq!(item.parent_scope_id, Some(module.id));
    assert_eq!(item.state.as_deref(), Some("lit"));
    assert_eq!(item.summary.as_deref(), Some("A brass lamp"));

    let name = format!("i{}_take", item.id);
    let action = store.action(&name).unwrap().expect("item action");
    assert_eq!(action.script, Some(format!("var {name}={{taken:true}};")));
}

#[test]
fn test_tags_and_expressions() {
    let (session, diagnostics) = compile_all(&[("cave.gbook", CONDITIONAL)]);
    let store = session.store();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let passage = scope(store, ScopeKind::Passage, "Dark");
    let content = &children_of_kind(store, passage.id, NodeKind::Content)[0];
    let kinds: Vec<_> = store
        .children(content.id)
        .unwrap()
        .iter()
        .map(|n| n.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::IfTag,
            NodeKind::Word,
            NodeKind::Word,
            NodeKind::InlineTag,
            NodeKind::Punctuation,
            NodeKind::NewLine,
            NodeKind::ScriptTag,
        ]
    );

    let if_tag = &children_of_kind(store, content.id, NodeKind::IfTag)[0];
    let branch = store.children(if_tag.id).unwrap();
    assert_eq!(branch[0].kind, NodeKind::JsExpr);
    assert_eq!(branch[0].sort_index, Some(1));
    assert_eq!(branch[1].kind, NodeKind::Content);
    assert_eq!(branch[1].sort_index, Some(2));
    let expression = store
        .expression(branch[0].ref_id.expect("expression ref"))
        .unwrap();
    assert_eq!(expression, Some(Some("state.lit".to_string())));

    // The link inside the condition belongs to the passage
    assert!(
        store
            .action(&format!("p{}_lamp", passage.id))
            .unwrap()
            .is_some()
    );

    let inline = &children_of_kind(store, content.id, NodeKind::InlineTag)[0];
    let script = &store.children(inline.id).unwrap()[0];
    assert_eq!(script.kind, NodeKind::Script);
    assert_eq!(
        script.content,
        Some(format!("var o{}={{state.sound}};", script.id))
    );

    let tag = &children_of_kind(store, content.id, NodeKind::ScriptTag)[0];
    let script = &store.children(tag.id).unwrap()[0];
    assert_eq!(
        script.content,
        Some(format!("var o{}={{state.seen=true;}};", script.id))
    );
    assert_eq!(store.count(Table::Expressions).unwrap(), 1);
}

#[test]
fn test_header_script_failure_is_a_warning() {
    let (session, result) = compile_one(BAD_HEADER_SCRIPT);
    let diagnostics = result.expect("file is kept");
    assert_eq!(warning_codes(&diagnostics), vec!["W0001"]);

    let store = session.store();
    let scene = scope(store, ScopeKind::Scene, "Hall");
    assert_eq!(scene.script, None);
    assert!(diagnostics[0].message.contains(&format!("s{}", scene.id)));
    assert_eq!(store.count(Table::Passages).unwrap(), 1);
}

#[test]
fn test_malformed_link_rejects_file_without_rows() {
    let (session, result) = compile_one(EMPTY_LINK);
    let err = result.unwrap_err();
    assert!(!err.is_fatal());
    assert_eq!(
        err.to_string(),
        "test.gbook:3:15: link has neither a keyword nor any word"
    );

    let store = session.store();
    assert_eq!(store.count(Table::Nodes).unwrap(), 1);
    for table in [
        Table::Modules,
        Table::Scenes,
        Table::Passages,
        Table::Actions,
        Table::Words,
    ] {
        assert_eq!(store.count(table).unwrap(), 0, "{table:?}");
    }
}

#[test]
fn test_parents_precede_children() {
    let (session, _) = compile_all(&[
        ("forest.gbook", FOREST),
        ("hall.gbook", DOOR),
        ("lamp.gbook", ITEM),
        ("cave.gbook", CONDITIONAL),
    ]);
    assert_parents_precede_children(session.store());
}
