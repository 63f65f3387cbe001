use crate::tree::NodeTree;

use crate::parsing::DOCUMENT_ORIGIN;

/// Validates parser output against the text it was parsed from.
///
/// Asserts that:
/// - Every node's full text is the slice of `text` at its position
/// - Children lie inside their parent's span and link back to it
/// - The top-level nodes reproduce `text`
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(text: &str, tree: &NodeTree) {
    let chars: Vec<char> = text.chars().collect();

    for (_, id) in tree.walk() {
        let node = tree.get(id).expect("walked node is in the arena");
        let start = node.position() - DOCUMENT_ORIGIN;
        let end = start + tree.length(id);
        assert!(
            end <= chars.len(),
            "node span out of bounds: {start}..{end} (text len: {})",
            chars.len()
        );

        let slice: String = chars[start..end].iter().collect();
        assert_eq!(slice, tree.full_text(id), "node at {} does not slice back", node.position());

        for child in tree.children(id) {
            let child_node = tree.get(*child).expect("child is in the arena");
            assert_eq!(child_node.parent(), Some(id), "child does not link back to parent");
            let child_start = child_node.position() - DOCUMENT_ORIGIN;
            assert!(
                child_start >= start && child_start + tree.length(*child) <= end,
                "child span {child_start} not contained in parent span {start}..{end}"
            );
        }
    }

    assert_eq!(tree.text_content(), text, "top-level nodes do not round trip");
}
