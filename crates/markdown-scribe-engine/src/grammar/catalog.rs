use std::sync::Arc;

use super::{ImageResolver, Language, Tag};

/// The ordered set of tags the parser matches against.
///
/// Order is match priority: at any position the first tag whose opening
/// delimiter matches is the only one tried. Longer delimiters therefore come
/// before their prefixes (`######` before `#`, `**` before `*`, `![` before
/// `[`, fenced languages before the bare fence, `<u>`/`<br`/`<!--` before `<`).
///
/// The catalog is built once and shared (`Arc`) between the parser, the
/// editing facade and any background parse worker.
#[derive(Debug, Clone)]
pub struct TagCatalog {
    tags: Vec<Arc<Tag>>,
}

impl TagCatalog {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self {
            tags: tags.into_iter().map(Arc::new).collect(),
        }
    }

    /// The built-in Markdown dialect.
    pub fn builtin(images: ImageResolver) -> Self {
        let mut tags: Vec<Tag> = (1..=6).rev().map(Tag::heading).collect();
        tags.extend([
            Tag::bullet_item("* "),
            Tag::bullet_item("- "),
            Tag::bold(),
            Tag::strong("__"),
            Tag::italicize(),
            Tag::emphasis("*"),
            Tag::underline(),
            Tag::strikethrough(),
            Tag::image(images),
            Tag::link(),
        ]);
        tags.extend(Language::ALL.into_iter().map(Tag::code_block));
        tags.extend([
            Tag::inline_code(),
            Tag::block_quote(),
            Tag::line_break(),
            Tag::comment(),
            Tag::passthrough(),
        ]);
        Self::new(tags)
    }

    pub fn tags(&self) -> &[Arc<Tag>] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// First tag (in priority order) with the given opening delimiter.
    pub fn find_by_open(&self, open: &str) -> Option<&Arc<Tag>> {
        self.tags.iter().find(|tag| tag.open() == open)
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self::builtin(ImageResolver::default())
    }
}
