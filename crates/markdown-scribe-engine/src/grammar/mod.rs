//! # Tag Grammar
//!
//! Declarative description of every markup construct the parser recognizes.
//!
//! A [`Tag`] owns its delimiters (`open`, optional `mid`, `close`), a set of
//! [`TagOptions`] that constrain matching, an [`HtmlRendering`] strategy and an
//! optional [`OutlineRepresentation`]. Tags never change once built; the
//! ordered [`TagCatalog`] decides which tag wins when several could start at
//! the same character.
//!
//! ## Modules
//!
//! - **`catalog`**: `TagCatalog` with the built-in tags in match-priority order
//! - **`kinds`**: `Language` and `OutlineRepresentation`
//! - **`image`**: `ImageResolver`, the policy for relative image sources
//! - **`transform`**: custom HTML transforms (links, images, comments, ...)

mod catalog;
mod image;
mod kinds;
mod transform;

use bitflags::bitflags;

pub use catalog::TagCatalog;
pub use image::ImageResolver;
pub use kinds::{Language, OutlineRepresentation};
pub use transform::Transform;

bitflags! {
    /// Matching and editing constraints attached to a [`Tag`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TagOptions: u8 {
        /// Matched content is kept as literal text, never parsed into children.
        const DISALLOWS_NESTED_TAGS = 1 << 0;
        /// A newline before the closing delimiter aborts the match.
        const DISALLOWS_NEWLINES = 1 << 1;
        /// Inserting the tag pads both delimiters with newlines.
        const IS_BLOCK = 1 << 2;
        /// Swapping this tag in keeps the replaced node's full markup as content.
        const WRAPS_OTHER_TAGS_WHEN_SWAPPED_IN = 1 << 4;
    }
}

/// How a tag turns its rendered content into HTML.
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlRendering {
    /// Wrap the content in `<name>…</name>`.
    Element(String),
    /// Delegate to a custom transform.
    Custom(Transform),
}

/// Result of [`Tag::apply`]: the delimited text and how far a selection that
/// covered the original text must shift to keep covering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagApplication {
    pub tagged_text: String,
    pub selection_adjustment: usize,
}

/// An immutable grammar rule for one markup construct.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    open: String,
    mid: String,
    close: String,
    rendering: HtmlRendering,
    options: TagOptions,
    outline: Option<OutlineRepresentation>,
}

impl Tag {
    /// A tag rendered as a plain HTML element. The closing delimiter defaults
    /// to the opening one.
    ///
    /// # Panics
    ///
    /// Panics if `open` is empty.
    pub fn element(open: &str, html_tag: &str) -> Self {
        Self::with_rendering(open, HtmlRendering::Element(html_tag.to_string()))
    }

    /// A tag rendered by a custom transform.
    ///
    /// # Panics
    ///
    /// Panics if `open` is empty.
    pub fn custom(open: &str, transform: Transform) -> Self {
        Self::with_rendering(open, HtmlRendering::Custom(transform))
    }

    fn with_rendering(open: &str, rendering: HtmlRendering) -> Self {
        assert!(!open.is_empty(), "a tag needs a non-empty opening delimiter");
        Self {
            open: open.to_string(),
            mid: String::new(),
            close: open.to_string(),
            rendering,
            options: TagOptions::empty(),
            outline: None,
        }
    }

    pub fn with_mid(mut self, mid: &str) -> Self {
        self.mid = mid.to_string();
        self
    }

    /// # Panics
    ///
    /// Panics if `close` is empty.
    pub fn with_close(mut self, close: &str) -> Self {
        assert!(!close.is_empty(), "a tag needs a non-empty closing delimiter");
        self.close = close.to_string();
        self
    }

    pub fn with_options(mut self, options: TagOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_outline(mut self, outline: OutlineRepresentation) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn mid(&self) -> &str {
        &self.mid
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    /// The closing delimiter without surrounding newlines.
    ///
    /// A `\n` close is never consumed by the parser; it belongs to the next
    /// sibling, so it is left out of node lengths and reconstructed text.
    pub fn trimmed_close(&self) -> &str {
        self.close.trim_matches(is_newline)
    }

    pub fn options(&self) -> TagOptions {
        self.options
    }

    pub fn has(&self, option: TagOptions) -> bool {
        self.options.contains(option)
    }

    pub fn outline(&self) -> Option<OutlineRepresentation> {
        self.outline
    }

    pub fn rendering(&self) -> &HtmlRendering {
        &self.rendering
    }

    /// Renders `content` (already HTML) with this tag.
    pub fn generate_html(&self, content: &str) -> String {
        match &self.rendering {
            HtmlRendering::Element(name) => format!("<{name}>{content}</{name}>"),
            HtmlRendering::Custom(transform) => transform.render(self, content),
        }
    }

    /// Wraps `text` in this tag's delimiters for insertion around a selection.
    pub fn apply(&self, text: &str) -> TagApplication {
        let (open, close) = if self.has(TagOptions::IS_BLOCK) {
            (format!("\n{}\n", self.open), format!("\n{}\n", self.close))
        } else {
            (self.open.clone(), self.close.clone())
        };

        TagApplication {
            selection_adjustment: open.chars().count(),
            tagged_text: format!("{open}{text}{}{close}", self.mid),
        }
    }

    // Built-in tags

    pub fn heading(level: u8) -> Self {
        let level = level.clamp(1, 6);
        Self::element(&"#".repeat(level as usize), &format!("h{level}"))
            .with_close("\n")
            .with_outline(OutlineRepresentation::Heading(level))
    }

    /// A bullet list item introduced by `marker` (`"* "` or `"- "`).
    pub fn bullet_item(marker: &str) -> Self {
        Self::element(marker, "li")
            .with_close("\n")
            .with_options(TagOptions::DISALLOWS_NEWLINES)
    }

    pub fn strong(delimiter: &str) -> Self {
        Self::element(delimiter, "strong").with_options(TagOptions::DISALLOWS_NEWLINES)
    }

    pub fn emphasis(delimiter: &str) -> Self {
        Self::element(delimiter, "em").with_options(TagOptions::DISALLOWS_NEWLINES)
    }

    pub fn bold() -> Self {
        Self::strong("**")
    }

    pub fn italicize() -> Self {
        Self::emphasis("_")
    }

    pub fn underline() -> Self {
        Self::element("<u>", "u").with_close("</u>")
    }

    pub fn strikethrough() -> Self {
        Self::element("~~", "strike")
    }

    pub fn block_quote() -> Self {
        Self::element(">", "blockquote")
            .with_close("\n")
            .with_options(TagOptions::IS_BLOCK)
    }

    pub fn link() -> Self {
        Self::custom("[", Transform::Link)
            .with_mid("](")
            .with_close(")")
    }

    pub fn image(resolver: ImageResolver) -> Self {
        Self::custom("![", Transform::Image(resolver))
            .with_mid("](")
            .with_close(")")
            .with_options(TagOptions::DISALLOWS_NESTED_TAGS)
    }

    pub fn comment() -> Self {
        Self::custom("<!--", Transform::Comment)
            .with_close("-->")
            .with_options(
                TagOptions::DISALLOWS_NESTED_TAGS | TagOptions::WRAPS_OTHER_TAGS_WHEN_SWAPPED_IN,
            )
    }

    pub fn inline_code() -> Self {
        Self::element("`", "code").with_options(TagOptions::DISALLOWS_NESTED_TAGS)
    }

    pub fn code_block(language: Language) -> Self {
        Self::custom(
            &format!("```{}", language.fence_name()),
            Transform::CodeBlock(language),
        )
        .with_close("```")
        .with_options(TagOptions::DISALLOWS_NESTED_TAGS | TagOptions::IS_BLOCK)
        .with_outline(OutlineRepresentation::CodeBlock(language))
    }

    /// `<br>`, `<br/>` and `<br />` all close on the first `>`.
    pub fn line_break() -> Self {
        Self::custom("<br", Transform::LineBreak)
            .with_close(">")
            .with_options(TagOptions::DISALLOWS_NESTED_TAGS)
    }

    /// `<user@example.com>` style spans: the bare address when the content
    /// holds an `@`, the raw angle-bracket markup otherwise.
    pub fn passthrough() -> Self {
        Self::custom("<", Transform::Passthrough)
            .with_mid("@")
            .with_close(">")
            .with_options(TagOptions::DISALLOWS_NESTED_TAGS | TagOptions::DISALLOWS_NEWLINES)
    }
}

pub(crate) fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}
