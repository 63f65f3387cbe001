//! # Parsing
//!
//! Recursive, tag-driven tokenizer that turns raw text into a [`NodeTree`].
//!
//! ## Algorithm
//!
//! The text is scanned left to right. At each character the catalog is tried
//! in priority order; the first tag whose whole opening delimiter matches is
//! the only candidate at that position. The parser then looks for the first
//! occurrence of that tag's closing delimiter:
//!
//! - found: pending plain text becomes a text node, the span between the
//!   delimiters becomes a tag node (parsed recursively into children unless
//!   the tag disallows nesting), and scanning resumes after the closing
//!   delimiter. A closing delimiter that is exactly `\n` is left in place so
//!   the newline starts the next sibling.
//! - not found (or a newline aborts a tag that disallows newlines): the
//!   opening delimiter is kept as plain text and scanning resumes after it.
//!
//! Parsing is total: every input produces a tree, and concatenating the full
//! text of the top-level nodes gives the input back.
//!
//! The closing search is not depth-balanced. `**a **b** c**` closes the first
//! bold span at the second `**`.
//!
//! Each nested span is parsed by a recursive call over its inner text, so a
//! run of `n` repeated openers (a line of `>` characters, say) nests `n`
//! levels deep and costs time quadratic in `n`.
//!
//! ## Positions
//!
//! Positions count characters, not bytes, in a buffer that starts with one
//! synthetic newline ([`DOCUMENT_ORIGIN`]) so the first line of the document
//! is preceded by a line break like every other line.

pub mod cursor;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::grammar::{TagCatalog, TagOptions};
use crate::tree::{NodeId, NodeTree};
use crate::view::{DEFAULT_STYLESHEET, ParsedDocument};
use cursor::Cursor;

/// Offset of the caller's first character in the parse buffer.
pub const DOCUMENT_ORIGIN: usize = 1;

/// Delimiters of one catalog entry, pre-split into characters.
#[derive(Debug, Clone)]
struct Delimiters {
    open: Vec<char>,
    close: Vec<char>,
}

/// Parses text against a shared [`TagCatalog`].
///
/// Holds no mutable state, so one parser can be cloned into worker threads.
#[derive(Debug, Clone)]
pub struct Parser {
    catalog: Arc<TagCatalog>,
    delimiters: Vec<Delimiters>,
    stylesheet: String,
}

impl Parser {
    pub fn new(catalog: Arc<TagCatalog>) -> Self {
        let delimiters = catalog
            .tags()
            .iter()
            .map(|tag| Delimiters {
                open: tag.open().chars().collect(),
                close: tag.close().chars().collect(),
            })
            .collect();

        Self {
            catalog,
            delimiters,
            stylesheet: DEFAULT_STYLESHEET.to_string(),
        }
    }

    /// Stylesheet referenced by the generated HTML document.
    pub fn with_stylesheet(mut self, stylesheet: impl Into<String>) -> Self {
        self.stylesheet = stylesheet.into();
        self
    }

    pub fn catalog(&self) -> &Arc<TagCatalog> {
        &self.catalog
    }

    /// Parses a full document and builds its HTML and outline.
    pub fn parse(&self, text: &str) -> ParsedDocument {
        let mut buffer = Vec::with_capacity(text.len() + DOCUMENT_ORIGIN);
        buffer.push('\n');
        buffer.extend(text.chars());

        let mut tree = NodeTree::new();
        let mut nodes = self.text_parsed_as_nodes(&buffer, 0, &mut tree);
        strip_synthetic_newline(&mut tree, &mut nodes);
        tree.attach(tree.root(), nodes);

        log::debug!(
            "parsed {} chars into {} nodes ({} top-level)",
            buffer.len() - DOCUMENT_ORIGIN,
            tree.len() - 1,
            tree.top_level().len()
        );

        ParsedDocument::build(tree, &self.stylesheet)
    }

    /// Tokenizes `chars` into sibling nodes, registering them (and their
    /// descendants) in `tree`. `base` is the absolute position of `chars[0]`.
    pub fn text_parsed_as_nodes(
        &self,
        chars: &[char],
        base: usize,
        tree: &mut NodeTree,
    ) -> Vec<NodeId> {
        let mut cur = Cursor::new(chars, base);
        let mut nodes = Vec::new();
        let mut pending = String::new();
        let mut pending_start = cur.pos();

        while let Some(c) = cur.peek() {
            let Some(index) = self.opening_tag_at(&cur, c) else {
                if pending.is_empty() {
                    pending_start = cur.pos();
                }
                pending.push(c);
                cur.bump();
                continue;
            };

            let tag = &self.catalog.tags()[index];
            let delimiters = &self.delimiters[index];
            let open_at = cur.pos();
            let inner_start = cur.i + delimiters.open.len();
            let allow_newlines = !tag.has(TagOptions::DISALLOWS_NEWLINES);

            let Some(close_at) = cur.find(inner_start, &delimiters.close, allow_newlines) else {
                if pending.is_empty() {
                    pending_start = cur.pos();
                }
                pending.extend(delimiters.open.iter());
                cur.bump_n(delimiters.open.len());
                continue;
            };

            flush_text(tree, &mut nodes, &mut pending, pending_start);

            let inner = &chars[inner_start..close_at];
            let node = if tag.has(TagOptions::DISALLOWS_NESTED_TAGS) {
                tree.new_tag(Arc::clone(tag), inner.iter().collect(), open_at)
            } else {
                let node = tree.new_tag(Arc::clone(tag), String::new(), open_at);
                let children = self.text_parsed_as_nodes(inner, base + inner_start, tree);
                tree.attach(node, children);
                node
            };
            nodes.push(node);

            cur.seek(close_at);
            if delimiters.close != ['\n'] {
                cur.bump_n(delimiters.close.len());
            }
        }

        flush_text(tree, &mut nodes, &mut pending, pending_start);
        nodes
    }

    /// Index of the first catalog tag whose opening delimiter starts here.
    fn opening_tag_at(&self, cur: &Cursor<'_>, c: char) -> Option<usize> {
        self.delimiters
            .iter()
            .position(|d| d.open.first() == Some(&c) && cur.starts_with(&d.open))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Arc::new(TagCatalog::default()))
    }
}

fn flush_text(tree: &mut NodeTree, nodes: &mut Vec<NodeId>, pending: &mut String, start: usize) {
    if !pending.is_empty() {
        nodes.push(tree.new_text(std::mem::take(pending), start));
    }
}

/// Removes the newline `parse` prepended from the leading text node.
fn strip_synthetic_newline(tree: &mut NodeTree, nodes: &mut Vec<NodeId>) {
    let Some(&first) = nodes.first() else {
        return;
    };
    let Some(node) = tree.node_mut(first) else {
        return;
    };
    if !node.is_text() || node.position != 0 || !node.text.starts_with('\n') {
        return;
    }

    node.text.remove(0);
    node.position += DOCUMENT_ORIGIN;
    if node.text.is_empty() {
        nodes.remove(0);
        tree.remove_subtree(first);
    }
}
