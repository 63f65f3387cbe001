use std::ops::Range;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Character ranges of the new text that were written by the command.
    pub changed: Vec<Range<usize>>,
    /// Selection the caller should show, when the command defines one.
    pub new_selection: Option<Range<usize>>,
    pub version: u64,
}

impl Patch {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}
