pub mod editing;
pub mod grammar;
pub mod io;
pub mod parsing;
pub mod scheduler;
pub mod tree;
pub mod view;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Cmd, EditError, MarkdownDocument, Patch};
pub use grammar::{ImageResolver, Language, OutlineRepresentation, Tag, TagCatalog, TagOptions};
pub use io::{DocumentStore, FileStore, IoError, MemoryStore};
pub use parsing::Parser;
pub use scheduler::{ParseOutcome, ParseWorker};
pub use tree::{Node, NodeId, NodeKind, NodeTree};
pub use view::{OutlineElement, OutlineRange, ParsedDocument};
