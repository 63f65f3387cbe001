use std::ops::Range;

use xi_rope::Rope;

use super::commands::{self, Cmd, Splice};
use super::{EditError, Patch};
use crate::io::{DocumentStore, IoError};
use crate::parsing::Parser;
use crate::scheduler::ParseOutcome;
use crate::view::{OutlineElement, ParsedDocument};

/// A parse together with the version of the text it was produced from.
struct VersionedParse {
    version: u64,
    document: ParsedDocument,
}

/// One open document: its text, its persistence and its latest parse.
///
/// ## Versions
///
/// `version` counts changes to the text. `saved_version` is the version last
/// written to the store; the document has unsaved changes while they differ.
/// A parse is *live* only while its version equals `version`.
///
/// ## Usage Pattern
///
/// ```rust
/// # use markdown_scribe_engine::editing::{Cmd, MarkdownDocument};
/// # use markdown_scribe_engine::io::MemoryStore;
/// # use markdown_scribe_engine::parsing::Parser;
/// let store = MemoryStore::new("# Title\n## Old\n");
/// let mut doc = MarkdownDocument::open(Box::new(store.clone()), Parser::default()).unwrap();
///
/// // Address outline entries by identity
/// let old = doc.outline()[1].node_id;
/// doc.apply(Cmd::Delete { ids: vec![old] }).unwrap();
/// assert_eq!(doc.text(), "# Title\n\n");
///
/// // Tree commands drop the parse; build a fresh one before the next
/// doc.reparse();
/// assert_eq!(doc.outline().len(), 1);
/// ```
pub struct MarkdownDocument {
    buffer: Rope,
    /// Current selection as character offsets
    selection: Range<usize>,
    version: u64,
    saved_version: u64,
    parser: Parser,
    parsed: Option<VersionedParse>,
    store: Box<dyn DocumentStore>,
}

impl MarkdownDocument {
    /// Load the document from `store` and parse it.
    pub fn open(store: Box<dyn DocumentStore>, parser: Parser) -> Result<Self, EditError> {
        let text = store.load().map_err(EditError::Load)?;
        let mut doc = Self::with_text(&text, store, parser);
        doc.reparse();
        Ok(doc)
    }

    /// A document whose text is already what `store` holds. Nothing is
    /// parsed yet.
    pub fn with_text(text: &str, store: Box<dyn DocumentStore>, parser: Parser) -> Self {
        let len = text.chars().count();
        Self {
            buffer: Rope::from(text),
            selection: len..len,
            version: 0,
            saved_version: 0,
            parser,
            parsed: None,
            store,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn saved_version(&self) -> u64 {
        self.saved_version
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.version != self.saved_version
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = selection;
    }

    /// The parse of the current text, if there is one.
    pub fn parsed(&self) -> Option<&ParsedDocument> {
        self.parsed
            .as_ref()
            .filter(|parse| parse.version == self.version)
            .map(|parse| &parse.document)
    }

    /// Outline of the live parse; empty without one.
    pub fn outline(&self) -> &[OutlineElement] {
        self.parsed().map(|doc| doc.outline()).unwrap_or(&[])
    }

    /// HTML of the live parse.
    pub fn html(&self) -> Option<&str> {
        self.parsed().map(|doc| doc.html())
    }

    /// Parse the current text on this thread and make it live.
    pub fn reparse(&mut self) -> &ParsedDocument {
        let document = self.parser.parse(&self.text());
        let parse = self.parsed.insert(VersionedParse {
            version: self.version,
            document,
        });
        &parse.document
    }

    /// Make a background parse live if it was produced from the current
    /// text. Returns whether it was installed.
    pub fn install_parse(&mut self, outcome: ParseOutcome) -> bool {
        if outcome.version != self.version {
            log::debug!(
                "discarding parse of version {} (document is at {})",
                outcome.version,
                self.version
            );
            return false;
        }
        self.parsed = Some(VersionedParse {
            version: outcome.version,
            document: outcome.document,
        });
        true
    }

    /// Replace the whole text, as typing in an editor would.
    pub fn replace_text(&mut self, text: &str) {
        let len = text.chars().count();
        self.buffer = Rope::from(text);
        self.selection = self.selection.start.min(len)..self.selection.end.min(len);
        self.version += 1;
    }

    /// Write the current text through the store.
    pub fn save(&mut self) -> Result<(), IoError> {
        self.store.save(&self.text())?;
        self.saved_version = self.version;
        Ok(())
    }

    /// Apply a command.
    ///
    /// Unsaved changes are saved first; if that fails nothing is applied.
    /// Tree commands need a live parse and are ignored without one.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        if self.has_unsaved_changes() {
            log::debug!("saving version {} before {}", self.version, cmd.name());
            self.save().map_err(EditError::Save)?;
        }

        let text = self.text();
        let splice = match commands::compile_text_command(&cmd, &text)? {
            Some(splice) => splice,
            None => match self.compile_tree_command(&cmd, &text) {
                Some(splice) => {
                    self.parsed = None;
                    splice
                }
                None => return Ok(self.unchanged()),
            },
        };

        self.apply_splice(&text, splice)
    }

    /// Runs a tree command on a copy of the live tree and returns the splice
    /// from the current text to the regenerated one.
    fn compile_tree_command(&self, cmd: &Cmd, text: &str) -> Option<Splice> {
        let Some(parsed) = self.parsed() else {
            log::warn!(
                "{} ignored: no parse of version {} is live",
                cmd.name(),
                self.version
            );
            return None;
        };

        let mut tree = parsed.tree().clone();
        if commands::apply_to_tree(cmd, &mut tree) == 0 {
            return None;
        }

        let regenerated = tree.text_content();
        if regenerated == text {
            return None;
        }
        Some(commands::splice_between(text, &regenerated))
    }

    fn apply_splice(&mut self, text: &str, splice: Splice) -> Result<Patch, EditError> {
        let delta = commands::compile_splice(&self.buffer, text, &splice)?;
        self.buffer = delta.apply(&self.buffer);

        self.selection = match &splice.selection {
            Some(selection) => selection.clone(),
            None => commands::transform_selection(&self.selection, &splice),
        };
        self.version += 1;

        Ok(Patch {
            changed: vec![splice.written()],
            new_selection: splice.selection,
            version: self.version,
        })
    }

    fn unchanged(&self) -> Patch {
        Patch {
            changed: Vec::new(),
            new_selection: None,
            version: self.version,
        }
    }
}

impl std::fmt::Debug for MarkdownDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownDocument")
            .field("version", &self.version)
            .field("saved_version", &self.saved_version)
            .field("selection", &self.selection)
            .field("parsed", &self.parsed.as_ref().map(|p| p.version))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Tag;
    use crate::io::MemoryStore;
    use crate::tests::FailingStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn open(text: &str) -> (MarkdownDocument, MemoryStore) {
        let store = MemoryStore::new(text);
        let doc = MarkdownDocument::open(Box::new(store.clone()), Parser::default()).unwrap();
        (doc, store)
    }

    #[test]
    fn open_loads_and_parses() {
        let (doc, _) = open("# A\n");
        assert_eq!(doc.text(), "# A\n");
        assert_eq!(doc.version(), 0);
        assert!(!doc.has_unsaved_changes());
        assert_eq!(doc.outline().len(), 1);
        assert!(doc.html().is_some_and(|html| html.contains("<h1> A</h1>")));
    }

    #[test]
    fn insert_markup_at_caret() {
        let (mut doc, _) = open("ab");
        let patch = doc
            .apply(Cmd::InsertMarkup {
                tag: Arc::new(Tag::bold()),
                content: "x".to_string(),
                at: 1,
            })
            .unwrap();

        assert_eq!(doc.text(), "a**x**b");
        assert_eq!(patch.changed, vec![1..6]);
        assert_eq!(patch.new_selection, None);
        assert_eq!(patch.version, 1);
        assert!(doc.has_unsaved_changes());
    }

    #[test]
    fn wrap_range_selects_wrapped_text() {
        let (mut doc, _) = open("say hello");
        let patch = doc
            .apply(Cmd::WrapRange {
                tag: Arc::new(Tag::italicize()),
                range: 4..9,
            })
            .unwrap();

        assert_eq!(doc.text(), "say _hello_");
        assert_eq!(patch.new_selection, Some(5..10));
        assert_eq!(doc.selection(), 5..10);
    }

    #[test]
    fn unsaved_changes_are_saved_before_the_next_command() {
        let (mut doc, store) = open("one");
        doc.replace_text("one two");
        assert!(doc.has_unsaved_changes());

        doc.apply(Cmd::WrapRange {
            tag: Arc::new(Tag::bold()),
            range: 4..7,
        })
        .unwrap();

        assert_eq!(store.text(), "one two");
        assert_eq!(store.save_count(), 1);
        assert_eq!(doc.saved_version(), 1);
        assert_eq!(doc.text(), "one **two**");
    }

    #[test]
    fn failed_save_aborts_the_command() {
        let mut doc = MarkdownDocument::with_text("text", Box::new(FailingStore), Parser::default());
        doc.replace_text("text!");

        let err = doc
            .apply(Cmd::InsertMarkup {
                tag: Arc::new(Tag::bold()),
                content: String::new(),
                at: 0,
            })
            .unwrap_err();

        assert!(matches!(err, EditError::Save(_)));
        assert_eq!(doc.text(), "text!");
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn out_of_range_command_leaves_text_alone() {
        let (mut doc, _) = open("abc");
        let err = doc
            .apply(Cmd::WrapRange {
                tag: Arc::new(Tag::bold()),
                range: 1..9,
            })
            .unwrap_err();

        assert!(matches!(err, EditError::OutOfRange { .. }));
        assert_eq!(doc.text(), "abc");
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn swap_tags_regenerates_text() {
        let (mut doc, _) = open("# A\ntext\n# B\n");
        let ids: Vec<_> = doc.outline().iter().map(|e| e.node_id).collect();

        let patch = doc
            .apply(Cmd::SwapTags {
                ids,
                tag: Arc::new(Tag::heading(2)),
            })
            .unwrap();

        assert_eq!(doc.text(), "## A\ntext\n## B\n");
        assert!(!patch.is_noop());
        assert!(doc.parsed().is_none());
    }

    #[test]
    fn duplicate_copies_markup_after_node() {
        let (mut doc, _) = open("# A\n");
        let id = doc.outline()[0].node_id;

        doc.apply(Cmd::Duplicate { ids: vec![id] }).unwrap();

        assert_eq!(doc.text(), "# A\n# A\n");
        doc.reparse();
        assert_eq!(doc.outline().len(), 2);
    }

    #[test]
    fn tree_command_without_live_parse_is_ignored() {
        let (mut doc, _) = open("# A\n");
        let id = doc.outline()[0].node_id;
        doc.replace_text("# A\n# B\n");

        let patch = doc.apply(Cmd::Delete { ids: vec![id] }).unwrap();

        assert!(patch.is_noop());
        assert_eq!(doc.text(), "# A\n# B\n");
    }

    #[test]
    fn unknown_identifiers_change_nothing() {
        let (mut doc, _) = open("# A\n");
        let (other, _) = open("# B\n");
        let foreign = other.outline()[0].node_id;

        let patch = doc.apply(Cmd::Delete { ids: vec![foreign] }).unwrap();

        assert!(patch.is_noop());
        assert_eq!(patch.version, 0);
        assert!(doc.parsed().is_some());
    }

    #[test]
    fn stale_parse_outcomes_are_discarded() {
        let (mut doc, _) = open("# A\n");
        let parser = doc.parser().clone();
        let stale = ParseOutcome {
            version: doc.version(),
            document: parser.parse("# A\n"),
        };
        doc.replace_text("# A\n## B\n");

        assert!(!doc.install_parse(stale));
        assert!(doc.parsed().is_none());

        let fresh = ParseOutcome {
            version: doc.version(),
            document: parser.parse(&doc.text()),
        };
        assert!(doc.install_parse(fresh));
        assert_eq!(doc.outline().len(), 2);
    }

    #[test]
    fn replace_text_clamps_selection() {
        let (mut doc, _) = open("a long line");
        doc.set_selection(2..11);
        doc.replace_text("a");
        assert_eq!(doc.selection(), 1..1);
    }
}
