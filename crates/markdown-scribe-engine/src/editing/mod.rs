/*!
 * # Editing
 *
 * [`MarkdownDocument`] owns the text of one document and is the only place
 * it changes.
 *
 * ## Text buffer
 *
 * The text lives in a single **`xi_rope::Rope`**. Every change is a [`Cmd`]
 * compiled to a splice over that text and applied to the rope as a `Delta`;
 * the caller gets a [`Patch`] back describing what changed.
 *
 * ## Commands
 *
 * - **Text commands** (`InsertMarkup`, `WrapRange`) splice markup into the
 *   text at character offsets.
 * - **Tree commands** (`SwapTags`, `Duplicate`, `Delete`) address nodes of the
 *   live parse by identity, edit a copy of its tree and regenerate the text
 *   from it. The result is spliced in like any other edit.
 *
 * ## Save before mutate
 *
 * A command is never applied over unsaved text: the document first saves
 * through its [`DocumentStore`](crate::io::DocumentStore). If that fails the
 * command is abandoned with [`EditError::Save`].
 *
 * ## Parse results
 *
 * Parses are tagged with the version of the text they were produced from.
 * Only a parse of the current version is live; tree commands against an older
 * parse are logged and ignored, and background results for older versions are
 * discarded (see [`crate::scheduler`]).
 */

pub mod commands;
pub mod document;
pub mod patch;

pub use commands::Cmd;
pub use document::MarkdownDocument;
pub use patch::Patch;

use crate::io::IoError;

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Could not save before editing: {0}")]
    Save(#[source] IoError),
    #[error("Could not load document: {0}")]
    Load(#[source] IoError),
    #[error("Range {start}..{end} is outside the document ({len} chars)")]
    OutOfRange { start: usize, end: usize, len: usize },
}
