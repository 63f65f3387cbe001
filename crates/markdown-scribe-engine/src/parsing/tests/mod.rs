//! Parser behaviour tests.
//!
//! HTML assertions look at the document body only; the shell is covered in
//! the view module.

mod invariants;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::grammar::{ImageResolver, TagCatalog};
use crate::parsing::Parser;
use crate::tree::NodeTree;
use crate::view::ParsedDocument;

fn parse(text: &str) -> ParsedDocument {
    let doc = Parser::default().parse(text);
    invariants::check(text, doc.tree());
    doc
}

fn body(doc: &ParsedDocument) -> &str {
    let html = doc.html();
    let start = html.find("<body>\n").map_or(0, |i| i + "<body>\n".len());
    let end = html.rfind("\n</body>").unwrap_or(html.len());
    &html[start..end]
}

fn top_level_opens(tree: &NodeTree) -> Vec<Option<String>> {
    tree.top_level()
        .iter()
        .map(|id| tree.get(*id).and_then(|n| n.tag()).map(|t| t.open().to_string()))
        .collect()
}

// Tokenizing

#[test]
fn empty_document_has_no_nodes() {
    let doc = parse("");
    assert!(doc.tree().is_empty());
    assert!(doc.outline().is_empty());
    assert_eq!(body(&doc), "");
}

#[test]
fn synthetic_line_break_is_not_part_of_the_tree() {
    let doc = parse("plain");
    let tree = doc.tree();
    let first = tree.get(tree.top_level()[0]).unwrap();
    assert!(first.is_text());
    assert_eq!(first.text(), "plain");
    assert_eq!(first.position(), 1);
}

#[test]
fn inline_code_suppresses_nested_tags() {
    let doc = parse("`**bold**`");
    let tree = doc.tree();
    assert_eq!(tree.top_level().len(), 1);

    let code = tree.get(tree.top_level()[0]).unwrap();
    assert_eq!(code.tag().map(|t| t.open()), Some("`"));
    assert!(code.children().is_empty());
    assert_eq!(code.text(), "**bold**");
    assert_eq!(body(&doc), "<code>**bold**</code>");
}

#[test]
fn newline_aborts_inline_tags() {
    let doc = parse("**a\nb**");
    let tree = doc.tree();
    assert_eq!(top_level_opens(tree), [None]);
    assert_eq!(tree.get(tree.top_level()[0]).unwrap().text(), "**a\nb**");
}

#[test]
fn nested_nodes_carry_absolute_positions() {
    let doc = parse("ab **cd _ef_**");
    let tree = doc.tree();
    assert_eq!(top_level_opens(tree), [None, Some("**".to_string())]);

    let bold = tree.top_level()[1];
    assert_eq!(tree.get(bold).unwrap().position(), 4);

    let children = tree.children(bold);
    assert_eq!(children.len(), 2);
    let text = tree.get(children[0]).unwrap();
    let italic = tree.get(children[1]).unwrap();
    assert_eq!((text.text(), text.position()), ("cd ", 6));
    assert_eq!(italic.position(), 9);
    assert_eq!(tree.get(italic.children()[0]).unwrap().position(), 10);
}

#[rstest]
#[case::unclosed_bold("**open")]
#[case::heading_without_line_end("# no newline")]
#[case::lone_bullet_marker("a * b")]
#[case::unclosed_comment("<!-- never closed")]
#[case::bold_is_not_retried_as_italics("**x*")]
#[case::underscore_bold_is_not_retried_as_italics("__x_")]
fn unclosed_delimiters_stay_text(#[case] text: &str) {
    let doc = parse(text);
    assert!(
        doc.tree()
            .top_level()
            .iter()
            .all(|id| doc.tree().get(*id).is_some_and(|n| n.is_text()))
    );
}

#[test]
fn closing_delimiter_is_first_occurrence() {
    let doc = parse("**a **b** c**");
    assert_eq!(
        top_level_opens(doc.tree()),
        [Some("**".to_string()), None, Some("**".to_string())]
    );
    assert_eq!(body(&doc), "<strong>a </strong>b<strong> c</strong>");
}

#[test]
fn first_matching_tag_is_the_only_candidate() {
    let doc = parse("***a***");
    let tree = doc.tree();
    assert_eq!(top_level_opens(tree), [Some("**".to_string()), None]);

    let bold = tree.top_level()[0];
    let inner: Vec<_> = tree
        .children(bold)
        .iter()
        .filter_map(|id| tree.get(*id))
        .map(|n| (n.is_text(), n.text(), n.position()))
        .collect();
    assert_eq!(inner, [(true, "*a", 3)]);

    let trailing = tree.get(tree.top_level()[1]).unwrap();
    assert_eq!((trailing.text(), trailing.position()), ("*", 7));
    assert_eq!(body(&doc), "<strong>*a</strong>*");
}

#[test]
fn longer_heading_prefix_wins() {
    let doc = parse("### Three\n");
    assert_eq!(top_level_opens(doc.tree())[0].as_deref(), Some("###"));
    assert_eq!(body(&doc), "<h3> Three</h3>");
}

#[test]
fn newline_closer_starts_next_sibling() {
    let doc = parse("- one\n- two\n");
    assert_eq!(
        top_level_opens(doc.tree()),
        [Some("- ".to_string()), None, Some("- ".to_string()), None]
    );
    assert_eq!(body(&doc), "<li>one</li><li>two</li>");
}

#[test]
fn multibyte_text_uses_character_positions() {
    let doc = parse("héllo **wörld**");
    let tree = doc.tree();
    let bold = tree.get(tree.top_level()[1]).unwrap();
    assert_eq!(bold.position(), 7);
    assert_eq!(tree.length(bold.id()), 9);
}

// Rendering

#[test]
fn heading_and_body_text() {
    let doc = parse("# Title\nbody");
    assert_eq!(body(&doc), "<h1> Title</h1>body");
}

#[test]
fn block_quote_renders_nested_inline_tags() {
    let doc = parse("> quoted **b**\n");
    assert_eq!(body(&doc), "<blockquote> quoted <strong>b</strong></blockquote>");
}

#[rstest]
#[case::bare("a<br>b")]
#[case::self_closing("a<br/>b")]
#[case::spaced("a<br />b")]
fn line_breaks_render_uniformly(#[case] text: &str) {
    assert_eq!(body(&parse(text)), "a<br />b");
}

#[test]
fn angle_bracket_address_is_unwrapped() {
    assert_eq!(body(&parse("<me@example.org>")), "me@example.org");
}

#[test]
fn stray_angle_brackets_are_escaped() {
    assert_eq!(body(&parse("1 < 2")), "1 &lt; 2");
}

#[test]
fn link_renders_anchor() {
    let doc = parse("[Rust](https://rust-lang.org)");
    assert_eq!(body(&doc), "<a href=\"https://rust-lang.org\">Rust</a>");
}

#[test]
fn image_resolves_against_documents_root() {
    let catalog = TagCatalog::builtin(ImageResolver::new("/docs"));
    let parser = Parser::new(Arc::new(catalog));
    let doc = parser.parse("![cat](cat.png)");
    assert_eq!(
        body(&doc),
        "<p><img alt=\"cat\" src=\"file:///docs/cat.png\"></p>"
    );
}

#[test]
fn code_block_content_is_literal() {
    let doc = parse("```rust\nlet s = \"**no**\";\n```");
    assert_eq!(
        body(&doc),
        "<div class=\"rust\"><div class=\"language-tag\"></div><pre><code>let s = \"**no**\";</code></pre></div>\n"
    );
}

#[test]
fn comment_is_kept_verbatim() {
    assert_eq!(body(&parse("<!-- **x** -->")), "<!-- **x** -->");
}

// Round trip

#[rstest]
#[case("")]
#[case("\n")]
#[case("# A\n## B\n\ntext with **bold** and _it_\n")]
#[case("unclosed ` tick and ** stars")]
#[case("```swift\nunterminated")]
#[case("<!-- c -->\n# h\n> q\n- l\n* m\n")]
#[case("[link](u) ![img](i.png) <u>u</u> ~~s~~ __b__ *e*")]
#[case("crlf\r\nline\r\n")]
fn text_content_round_trips(#[case] text: &str) {
    let doc = parse(text);
    assert_eq!(doc.text_content(), text);
}
