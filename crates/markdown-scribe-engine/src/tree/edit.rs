//! Identity-addressed structural edits.
//!
//! Each edit returns whether the target was found. A missing identifier is
//! not an error: the caller may be acting on an outline from an older parse.

use std::sync::Arc;

use super::{NodeId, NodeTree};
use crate::grammar::{Tag, TagOptions};

impl NodeTree {
    /// Removes the node and its subtree from its parent.
    pub fn delete_descendant(&mut self, id: NodeId) -> bool {
        let Some(found) = self.find_descendant(self.root, id) else {
            log::debug!("delete: node {id} not found");
            return false;
        };

        if let Some(parent) = self.node_mut(found.parent) {
            parent.children.remove(found.index);
        }
        self.remove_subtree(id);
        true
    }

    /// Inserts a newline text node and a plain-text copy of the node's markup
    /// right after it.
    ///
    /// The copy is not parsed back into tags; the next parse pass does that.
    pub fn duplicate_descendant(&mut self, id: NodeId) -> bool {
        let Some(found) = self.find_descendant(self.root, id) else {
            log::debug!("duplicate: node {id} not found");
            return false;
        };

        let markup = self.full_text(id);
        let end = self.get(id).map_or(0, |node| node.position()) + markup.chars().count();

        let newline = self.new_text("\n".to_string(), end);
        let copy = self.new_text(markup, end + 1);
        for inserted in [newline, copy] {
            if let Some(node) = self.node_mut(inserted) {
                node.parent = Some(found.parent);
            }
        }
        if let Some(parent) = self.node_mut(found.parent) {
            let at = found.index + 1;
            parent.children.splice(at..at, [newline, copy]);
        }
        true
    }

    /// Replaces the node with a fresh, childless node carrying `tag`.
    ///
    /// The new content is the old node's full markup when `tag` wraps other
    /// tags (comments), otherwise the markup between the old delimiters.
    pub fn swap_tag_of_node(&mut self, id: NodeId, tag: Arc<Tag>) -> bool {
        let Some(found) = self.find_descendant(self.root, id) else {
            log::debug!("swap: node {id} not found");
            return false;
        };

        let content = if tag.has(TagOptions::WRAPS_OTHER_TAGS_WHEN_SWAPPED_IN) {
            self.full_text(id)
        } else {
            self.inner_text(id)
        };
        let position = self.get(id).map_or(0, |node| node.position());

        let replacement = self.new_tag(tag, content, position);
        if let Some(node) = self.node_mut(replacement) {
            node.parent = Some(found.parent);
        }
        if let Some(parent) = self.node_mut(found.parent) {
            parent.children[found.index] = replacement;
        }
        self.remove_subtree(id);
        true
    }
}
