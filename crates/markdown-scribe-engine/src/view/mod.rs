//! # Document View
//!
//! [`ParsedDocument`] is the product of one parse pass: the node tree plus
//! the HTML document and outline derived from its top-level nodes in a single
//! walk. Neither is patched incrementally; edit the tree, regenerate the text
//! and parse again.

mod outline;

pub use outline::{OutlineElement, OutlineRange};

use crate::parsing::DOCUMENT_ORIGIN;
use crate::tree::NodeTree;
use outline::Indenter;

pub const DEFAULT_STYLESHEET: &str = "Stylesheet.css";

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    html: String,
    outline: Vec<OutlineElement>,
    tree: NodeTree,
}

impl ParsedDocument {
    pub fn build(tree: NodeTree, stylesheet: &str) -> Self {
        let mut inner_html = String::new();
        let mut indenter = Indenter::default();
        let mut outline = Vec::new();

        for &id in tree.top_level() {
            inner_html.push_str(&tree.html(id));

            let Some(node) = tree.get(id) else {
                continue;
            };
            let Some(representation) = node.tag().and_then(|tag| tag.outline()) else {
                continue;
            };

            outline.push(OutlineElement {
                representation,
                range: OutlineRange {
                    offset: node.position().saturating_sub(DOCUMENT_ORIGIN),
                    length: tree.length(id),
                },
                text: tree.inner_text(id).trim().to_string(),
                indentation_level: indenter.indentation_for(representation),
                node_id: id,
            });
        }

        Self {
            html: html_document(&inner_html, stylesheet),
            outline,
            tree,
        }
    }

    /// The complete HTML document.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn outline(&self) -> &[OutlineElement] {
        &self.outline
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Gives up the derived views and hands back the tree for editing.
    pub fn into_tree(self) -> NodeTree {
        self.tree
    }

    /// The source text reconstructed from the tree.
    pub fn text_content(&self) -> String {
        self.tree.text_content()
    }
}

fn html_document(body: &str, stylesheet: &str) -> String {
    format!(
        "<html>\n<meta name=\"viewport\" content=\"user-scalable=no\">\n<head>\n<link rel=\"stylesheet\" href=\"{stylesheet}\">\n</head>\n<body>\n{body}\n</body></html>"
    )
}
