use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use crate::grammar::OutlineRepresentation;
use crate::tree::NodeId;

/// Character range of an outline element in the caller's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutlineRange {
    pub offset: usize,
    pub length: usize,
}

impl OutlineRange {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn as_range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// A navigable entry (heading or code block) derived from one parse pass.
///
/// The range covers the opening delimiter and content; a closing newline is
/// not part of it. Two elements are equal when they point at the same node
/// and range.
#[derive(Debug, Clone)]
pub struct OutlineElement {
    pub representation: OutlineRepresentation,
    pub range: OutlineRange,
    pub text: String,
    pub indentation_level: usize,
    pub node_id: NodeId,
}

impl PartialEq for OutlineElement {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id && self.range == other.range
    }
}

impl Eq for OutlineElement {}

impl Hash for OutlineElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node_id.hash(state);
        self.range.hash(state);
    }
}

impl fmt::Display for OutlineElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.text.chars().take(20).collect();
        write!(
            f,
            "{} - [{}:{}-{}] {preview}",
            self.indentation_level,
            self.representation,
            self.range.offset,
            self.range.end()
        )
    }
}

/// Indentation bookkeeping for one pass over the top-level nodes.
///
/// A heading at level `L` sits at `L - 1` and becomes the baseline; a code
/// block nests one step below the last heading (at that heading's level), or
/// at 0 before any heading.
#[derive(Debug, Default)]
pub(crate) struct Indenter {
    last_heading_level: usize,
}

impl Indenter {
    pub(crate) fn indentation_for(&mut self, representation: OutlineRepresentation) -> usize {
        match representation {
            OutlineRepresentation::Heading(level) => {
                self.last_heading_level = level as usize;
                self.last_heading_level.saturating_sub(1)
            }
            OutlineRepresentation::CodeBlock(_) => self.last_heading_level,
        }
    }
}
