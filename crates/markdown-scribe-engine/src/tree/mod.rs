//! # Node Tree
//!
//! Arena of parsed nodes keyed by stable [`NodeId`]s.
//!
//! Every node records the absolute position of its first character in the
//! parse buffer, an ordered list of owned children and a back-link to its
//! parent, so identity lookups are a map hit plus a scan of one child list.
//! Structural edits live in [`edit`].
//!
//! Positions are not maintained across edits: after a delete, duplicate or
//! swap, nodes to the right of the change keep their old positions until the
//! text is parsed again.

mod edit;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::grammar::{Tag, is_newline};

/// Opaque node identity, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Synthetic owner of the top-level nodes.
    Root,
    /// Literal text.
    Text,
    /// A span produced by a tag.
    Tag(Arc<Tag>),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) position: usize,
    /// Literal content; only meaningful while the node has no children.
    pub(crate) text: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn tag(&self) -> Option<&Arc<Tag>> {
        match &self.kind {
            NodeKind::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Where a node sits: its owning parent and its index in that parent's
/// child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub parent: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct NodeTree {
    root: NodeId,
    nodes: HashMap<NodeId, Node>,
}

impl NodeTree {
    pub fn new() -> Self {
        let root = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                id: root,
                kind: NodeKind::Root,
                position: 0,
                text: String::new(),
                children: Vec::new(),
                parent: None,
            },
        );
        Self { root, nodes }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root owns nothing.
    pub fn is_empty(&self) -> bool {
        self.top_level().is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn top_level(&self) -> &[NodeId] {
        self.children(self.root)
    }

    pub(crate) fn new_text(&mut self, text: String, position: usize) -> NodeId {
        self.insert_node(NodeKind::Text, text, position)
    }

    pub(crate) fn new_tag(&mut self, tag: Arc<Tag>, text: String, position: usize) -> NodeId {
        self.insert_node(NodeKind::Tag(tag), text, position)
    }

    fn insert_node(&mut self, kind: NodeKind, text: String, position: usize) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(
            id,
            Node {
                id,
                kind,
                position,
                text,
                children: Vec::new(),
                parent: None,
            },
        );
        id
    }

    /// Appends `children` to `parent`'s child list and links them back.
    pub(crate) fn attach(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for child in &children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = Some(parent);
            }
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.extend(children);
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Drops `id` and everything below it from the arena. Does not unlink
    /// `id` from its parent.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children);
            }
        }
    }

    /// Opening delimiter, content and newline-trimmed closing delimiter.
    ///
    /// Content of a node with children is rebuilt from the children, so edits
    /// below a node show up in its text.
    pub fn full_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_full_text(id, &mut out);
        out
    }

    fn write_full_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if let NodeKind::Tag(tag) = &node.kind {
            out.push_str(tag.open());
            self.write_content(node, out);
            out.push_str(tag.trimmed_close());
        } else {
            self.write_content(node, out);
        }
    }

    fn write_content(&self, node: &Node, out: &mut String) {
        if node.children.is_empty() {
            out.push_str(&node.text);
        } else {
            for child in &node.children {
                self.write_full_text(*child, out);
            }
        }
    }

    /// The markup between a node's delimiters.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.nodes.get(&id) {
            self.write_content(node, &mut out);
        }
        out
    }

    /// Character count of [`full_text`](Self::full_text).
    pub fn length(&self, id: NodeId) -> usize {
        self.full_text(id).chars().count()
    }

    /// Concatenated full text of the top-level nodes.
    pub fn text_content(&self) -> String {
        self.full_text(self.root)
    }

    /// HTML for a node and its subtree.
    pub fn html(&self, id: NodeId) -> String {
        let Some(node) = self.nodes.get(&id) else {
            return String::new();
        };

        let content = if node.children.is_empty() {
            escape_leaf(&node.text)
        } else {
            node.children.iter().map(|child| self.html(*child)).collect()
        };

        match &node.kind {
            NodeKind::Tag(tag) => tag.generate_html(&content),
            NodeKind::Root | NodeKind::Text => content,
        }
    }

    /// Finds `id` below `ancestor`, returning its parent and child index.
    pub fn find_descendant(&self, ancestor: NodeId, id: NodeId) -> Option<Lookup> {
        let parent = self.nodes.get(&id)?.parent?;

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == ancestor {
                let index = self.children(parent).iter().position(|c| *c == id)?;
                return Some(Lookup { parent, index });
            }
            cursor = self.nodes.get(&current).and_then(|node| node.parent);
        }
        None
    }

    /// Depth-first, document-order walk below the root as `(depth, id)`.
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, NodeId)> = self
            .top_level()
            .iter()
            .rev()
            .map(|id| (0, *id))
            .collect();
        while let Some((depth, id)) = stack.pop() {
            out.push((depth, id));
            stack.extend(self.children(id).iter().rev().map(|c| (depth + 1, *c)));
        }
        out
    }

    /// One line per node, indented by depth.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (depth, id) in self.walk() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let label = match &node.kind {
                NodeKind::Tag(tag) => format!("Tag({})", tag.open().escape_debug()),
                NodeKind::Text => "Text".to_string(),
                NodeKind::Root => "Root".to_string(),
            };
            let preview: String = self.full_text(id).chars().take(40).collect();
            out.push_str(&format!(
                "{}{label} @{} {:?}\n",
                "  ".repeat(depth),
                node.position,
                preview
            ));
        }
        out
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_leaf(text: &str) -> String {
    text.trim_matches(is_newline)
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
