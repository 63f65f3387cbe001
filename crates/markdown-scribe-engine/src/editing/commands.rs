use std::ops::Range;
use std::sync::Arc;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use super::EditError;
use crate::grammar::Tag;
use crate::tree::{NodeId, NodeTree};

/// Commands that can be applied to a [`MarkdownDocument`](super::MarkdownDocument).
///
/// Offsets and ranges are in characters.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert `open + mid + content + close` at a caret.
    InsertMarkup {
        tag: Arc<Tag>,
        content: String,
        at: usize,
    },
    /// Replace a range with the tag applied to its text.
    WrapRange { tag: Arc<Tag>, range: Range<usize> },
    SwapTags { ids: Vec<NodeId>, tag: Arc<Tag> },
    Duplicate { ids: Vec<NodeId> },
    Delete { ids: Vec<NodeId> },
}

impl Cmd {
    pub fn name(&self) -> &'static str {
        match self {
            Cmd::InsertMarkup { .. } => "insert-markup",
            Cmd::WrapRange { .. } => "wrap-range",
            Cmd::SwapTags { .. } => "swap-tags",
            Cmd::Duplicate { .. } => "duplicate",
            Cmd::Delete { .. } => "delete",
        }
    }

    /// True for commands that address nodes of a parse.
    pub fn is_tree_command(&self) -> bool {
        matches!(
            self,
            Cmd::SwapTags { .. } | Cmd::Duplicate { .. } | Cmd::Delete { .. }
        )
    }
}

/// Replacement of one character range of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Splice {
    pub range: Range<usize>,
    pub replacement: String,
    pub selection: Option<Range<usize>>,
}

impl Splice {
    /// Characters written by the splice, in new-text coordinates.
    pub fn written(&self) -> Range<usize> {
        let start = self.range.start;
        start..start + self.replacement.chars().count()
    }
}

/// Compile a text command into a splice of `text`. Tree commands give `None`.
pub(crate) fn compile_text_command(cmd: &Cmd, text: &str) -> Result<Option<Splice>, EditError> {
    let len = text.chars().count();
    match cmd {
        Cmd::InsertMarkup { tag, content, at } => {
            check_range(&(*at..*at), len)?;
            let markup = format!("{}{}{content}{}", tag.open(), tag.mid(), tag.close());
            Ok(Some(Splice {
                range: *at..*at,
                replacement: markup,
                selection: None,
            }))
        }
        Cmd::WrapRange { tag, range } => {
            check_range(range, len)?;
            let selected: String = text
                .chars()
                .skip(range.start)
                .take(range.end - range.start)
                .collect();
            let applied = tag.apply(&selected);
            let start = range.start + applied.selection_adjustment;
            Ok(Some(Splice {
                range: range.clone(),
                replacement: applied.tagged_text,
                selection: Some(start..start + range.len()),
            }))
        }
        Cmd::SwapTags { .. } | Cmd::Duplicate { .. } | Cmd::Delete { .. } => Ok(None),
    }
}

/// Run a tree command against `tree`, returning how many targets were found.
pub(crate) fn apply_to_tree(cmd: &Cmd, tree: &mut NodeTree) -> usize {
    let found = match cmd {
        Cmd::SwapTags { ids, tag } => ids
            .iter()
            .map(|id| tree.swap_tag_of_node(*id, Arc::clone(tag)))
            .filter(|hit| *hit)
            .count(),
        Cmd::Duplicate { ids } => ids
            .iter()
            .map(|id| tree.duplicate_descendant(*id))
            .filter(|hit| *hit)
            .count(),
        Cmd::Delete { ids } => ids
            .iter()
            .map(|id| tree.delete_descendant(*id))
            .filter(|hit| *hit)
            .count(),
        Cmd::InsertMarkup { .. } | Cmd::WrapRange { .. } => 0,
    };
    log::debug!("{}: {found} target(s) found", cmd.name());
    found
}

/// Smallest splice that turns `old` into `new`.
pub(crate) fn splice_between(old: &str, new: &str) -> Splice {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();

    let prefix = old_chars
        .iter()
        .zip(&new_chars)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_chars[prefix..]
        .iter()
        .rev()
        .zip(new_chars[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    Splice {
        range: prefix..old_chars.len() - suffix,
        replacement: new_chars[prefix..new_chars.len() - suffix].iter().collect(),
        selection: None,
    }
}

/// Compile a splice of `text` (the contents of `buffer`) into a rope delta.
pub(crate) fn compile_splice(
    buffer: &Rope,
    text: &str,
    splice: &Splice,
) -> Result<Delta<RopeInfo>, EditError> {
    let out_of_range = || EditError::OutOfRange {
        start: splice.range.start,
        end: splice.range.end,
        len: text.chars().count(),
    };
    let start = byte_offset(text, splice.range.start).ok_or_else(out_of_range)?;
    let end = byte_offset(text, splice.range.end).ok_or_else(out_of_range)?;

    let mut builder = Builder::new(buffer.len());
    builder.replace(start..end, Rope::from(splice.replacement.as_str()));
    Ok(builder.build())
}

/// Move a selection through a splice.
pub(crate) fn transform_selection(selection: &Range<usize>, splice: &Splice) -> Range<usize> {
    let removed = splice.range.len();
    let inserted = splice.replacement.chars().count();

    if splice.range.end <= selection.start {
        let shift = |at: usize| at + inserted - removed;
        shift(selection.start)..shift(selection.end)
    } else if splice.range.start >= selection.end {
        selection.clone()
    } else {
        let end = splice.written().end;
        end..end
    }
}

fn check_range(range: &Range<usize>, len: usize) -> Result<(), EditError> {
    if range.start > range.end || range.end > len {
        return Err(EditError::OutOfRange {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}
