//! Parser Tests - gamebook grammar
//!
//! Shape of the raw CST for headers, bodies, links and tags.

use rstest::rstest;
use gamebook::parser::{SyntaxKind, SyntaxNode, parse};

use crate::helpers::source_fixtures::{CONDITIONAL, FOREST, ITEM, LANTERNS};

fn parse_ok(source: &str) -> SyntaxNode {
    let parse = parse(source);
    assert!(parse.ok(), "parse errors: {:?}", parse.errors);
    parse.syntax()
}

fn nodes_of_kind(root: &SyntaxNode, kind: SyntaxKind) -> Vec<SyntaxNode> {
    root.descendants().filter(|n| n.kind() == kind).collect()
}

fn first_text(root: &SyntaxNode, kind: SyntaxKind) -> String {
    nodes_of_kind(root, kind)
        .first()
        .map(|n| n.text().to_string())
        .unwrap_or_else(|| panic!("no {kind:?} node"))
}

fn error_messages(source: &str) -> Vec<String> {
    parse(source).errors.into_iter().map(|e| e.message).collect()
}

#[rstest]
#[case(FOREST)]
#[case(LANTERNS)]
#[case(ITEM)]
#[case(CONDITIONAL)]
fn test_parse_is_lossless(#[case] source: &str) {
    let root = parse_ok(source);
    assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
    assert_eq!(root.text().to_string(), source);
}

#[test]
fn test_header_fields() {
    let root = parse_ok("# Scene: Dark Forest (dark) \"Tall trees\" { visited: false }\n");
    assert_eq!(first_text(&root, SyntaxKind::IDENTIFIER), "Dark Forest");
    assert_eq!(first_text(&root, SyntaxKind::STATE), "dark");
    assert_eq!(first_text(&root, SyntaxKind::SUMMARY), "\"Tall trees\"");
    assert_eq!(first_text(&root, SyntaxKind::STRING), "Tall trees");
    assert_eq!(first_text(&root, SyntaxKind::SCRIPT), " visited: false ");
}

#[test]
fn test_module_header_is_optional() {
    let root = parse_ok("# Scene: Forest\n## Passage: Edge\nTrees.\n");
    let modules = nodes_of_kind(&root, SyntaxKind::MODULE);
    assert_eq!(modules.len(), 1);
    assert!(
        !modules[0]
            .children()
            .any(|c| c.kind() == SyntaxKind::HEADER),
        "implicit module has no header"
    );
    assert_eq!(nodes_of_kind(&root, SyntaxKind::SCENE).len(), 1);
}

#[test]
fn test_each_module_header_opens_a_module() {
    let root = parse_ok("# Module: A\n# Scene: S\n# Module: B\n# Item: Key\nA key.\n");
    assert_eq!(nodes_of_kind(&root, SyntaxKind::MODULE).len(), 2);
    assert_eq!(nodes_of_kind(&root, SyntaxKind::ITEM).len(), 1);
}

#[test]
fn test_scene_script_block_on_its_own_line() {
    let root = parse_ok("# Scene: Forest\n{ visited: false }\n## Passage: Edge\nTrees.\n");
    let scene = &nodes_of_kind(&root, SyntaxKind::SCENE)[0];
    let direct_scripts: Vec<_> = scene
        .children()
        .filter(|c| c.kind() == SyntaxKind::SCRIPT)
        .collect();
    assert_eq!(direct_scripts.len(), 1);
    assert_eq!(direct_scripts[0].text().to_string(), " visited: false ");
}

#[test]
fn test_action_declaration() {
    let root = parse_ok(FOREST);
    let actions = nodes_of_kind(&root, SyntaxKind::ACTION);
    assert_eq!(actions.len(), 1);
    let keyword = actions[0]
        .children_with_tokens()
        .find(|e| e.kind() == SyntaxKind::KEYWORD)
        .and_then(|e| e.into_token())
        .expect("keyword token");
    assert_eq!(keyword.text(), "open");
}

#[test]
fn test_script_block_skips_braces_in_strings() {
    let root = parse_ok("# Item: Note\nA note.\nread { text: \"}{\", n: '}' }\n");
    assert_eq!(
        first_text(&root, SyntaxKind::SCRIPT),
        " text: \"}{\", n: '}' "
    );
}

#[rstest]
#[case::line_comment("\n  // the 'key\n  go: 1\n")]
#[case::backtick_in_line_comment(" go: 1 // `tick\n")]
#[case::block_comment(" /* a ' } */ go: 1 ")]
fn test_script_block_skips_comments(#[case] body: &str) {
    let source = format!("# Scene: Hall\n## Passage: Door\nopen {{{body}}}\n\nMore [[text]].\n");
    let root = parse_ok(&source);
    assert_eq!(first_text(&root, SyntaxKind::SCRIPT), body);
    assert_eq!(nodes_of_kind(&root, SyntaxKind::LINK).len(), 1);
}

#[test]
fn test_line_comment_in_inline_tag_ends_at_tag_close() {
    let root = parse_ok("# Scene: Hall\n## Passage: Door\nYou see <<= state.door // 'open >> here.\n");
    assert_eq!(first_text(&root, SyntaxKind::SCRIPT), "state.door // 'open ");
}

#[test]
fn test_line_and_paragraph_breaks() {
    let root = parse_ok("# Scene: S\n## Passage: P\nOne.\n\nTwo.\nThree.\n");
    let content = &nodes_of_kind(&root, SyntaxKind::CONTENT)[0];
    let paragraphs = content
        .children()
        .filter(|c| c.kind() == SyntaxKind::END_PARAGRAPH)
        .count();
    let line_breaks = content
        .children_with_tokens()
        .filter(|e| e.kind() == SyntaxKind::NEWLINE)
        .count();
    assert_eq!(paragraphs, 1);
    assert_eq!(line_breaks, 1);
    assert!(!content.text().to_string().ends_with('\n'));
}

#[rstest]
#[case("[[door]]", &["door"], None)]
#[case("[[wooden door]]", &["wooden", "door"], None)]
#[case("[[the door|open]]", &["the", "door"], Some("open"))]
fn test_link_words_and_keyword(
    #[case] link: &str,
    #[case] words: &[&str],
    #[case] keyword: Option<&str>,
) {
    let source = format!("# Scene: S\n## Passage: P\nGo {link}.\n");
    let root = parse_ok(&source);
    let link = &nodes_of_kind(&root, SyntaxKind::LINK)[0];
    let found_words: Vec<_> = link
        .children_with_tokens()
        .filter(|e| e.kind() == SyntaxKind::WORD)
        .filter_map(|e| e.into_token())
        .map(|t| t.text().to_string())
        .collect();
    let found_keyword = link
        .children_with_tokens()
        .find(|e| e.kind() == SyntaxKind::KEYWORD)
        .and_then(|e| e.into_token())
        .map(|t| t.text().to_string());
    assert_eq!(found_words, words);
    assert_eq!(found_keyword.as_deref(), keyword);
}

#[test]
fn test_tags() {
    let root = parse_ok(CONDITIONAL);
    assert_eq!(nodes_of_kind(&root, SyntaxKind::IF_TAG).len(), 1);
    assert_eq!(nodes_of_kind(&root, SyntaxKind::INLINE_TAG).len(), 1);
    assert_eq!(nodes_of_kind(&root, SyntaxKind::SCRIPT_TAG).len(), 1);
    assert_eq!(first_text(&root, SyntaxKind::JS_EXPR), "state.lit ");
}

#[test]
fn test_nested_if_tags() {
    let root = parse_ok("# Scene: S\n## Passage: P\n<<if a>>x <<if b>>y<</if>><</if>>\n");
    assert_eq!(nodes_of_kind(&root, SyntaxKind::IF_TAG).len(), 2);
}

#[test]
fn test_script_tag_may_contain_braces() {
    let root = parse_ok("# Scene: S\n## Passage: P\n<<script>> if (a) { b(); } <</script>>\n");
    let tag = &nodes_of_kind(&root, SyntaxKind::SCRIPT_TAG)[0];
    let script = tag
        .children()
        .find(|c| c.kind() == SyntaxKind::SCRIPT)
        .expect("script body");
    assert_eq!(script.text().to_string(), " if (a) { b(); } ");
}

#[rstest]
#[case(
    "## Passage: Lost\nText.\n",
    "Expected a Scene header before the first Passage"
)]
#[case(
    "# Chapter: One\n",
    "Expected 'Module', 'Scene', 'Passage' or 'Item' followed by ':' after '#'"
)]
#[case("# Scene: S\n## Passage: P\nGo to the [[door.\n", "Expected ']]' to close the link")]
#[case("# Scene: S\n## Passage: P\nA <<foo>> tag.\n", "Expected '=', 'if' or 'script' after '<<'")]
#[case("# Scene: S\n## Passage: P\n<<if a>>open\n", "Expected '<</if>>'")]
#[case("# Scene: S (dark\n", "Expected ')' to close the state")]
#[case("# Scene: S \"unclosed\n", "Expected '\"' to close the summary")]
#[case("# Scene:\n", "Expected a name after ':'")]
fn test_grammar_errors(#[case] source: &str, #[case] expected: &str) {
    let messages = error_messages(source);
    assert!(
        messages.iter().any(|m| m == expected),
        "expected {expected:?} in {messages:?}"
    );
}

#[test]
fn test_malformed_file_still_yields_lossless_tree() {
    let source = "## Passage: Lost\nGo to [[the door.\n# Scene: S\n";
    let parse = parse(source);
    assert!(!parse.ok());
    assert_eq!(parse.syntax().text().to_string(), source);
}
