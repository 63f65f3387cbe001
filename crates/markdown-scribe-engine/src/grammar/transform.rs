use html_escape::encode_double_quoted_attribute;

use super::{ImageResolver, Language, Tag};

/// Custom HTML generators for tags that are more than an element wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// `[text](url)` as an anchor.
    Link,
    /// `![alt](src)` as an image, with `src` run through the resolver.
    Image(ImageResolver),
    /// `<!-- … -->` re-emitted verbatim.
    Comment,
    /// Any `<br…>` form as `<br />`.
    LineBreak,
    /// `<…>` kept as markup unless it holds the mid delimiter.
    Passthrough,
    /// A fenced code block for one language.
    CodeBlock(Language),
}

impl Transform {
    pub(crate) fn render(&self, tag: &Tag, content: &str) -> String {
        match self {
            Transform::Link => match split_target(tag, content) {
                Some((text, url)) => format!(
                    "<a href=\"{}\">{text}</a>",
                    encode_double_quoted_attribute(url)
                ),
                None => unrendered(tag, content),
            },
            Transform::Image(resolver) => match split_target(tag, content) {
                Some((alt, src)) => format!(
                    "<p><img alt=\"{}\" src=\"{}\"></p>",
                    encode_double_quoted_attribute(alt),
                    encode_double_quoted_attribute(&resolver.resolve(src))
                ),
                None => unrendered(tag, content),
            },
            Transform::Comment => format!("<!--{content}-->"),
            Transform::LineBreak => "<br />".to_string(),
            Transform::Passthrough => {
                if content.contains(tag.mid()) {
                    content.to_string()
                } else {
                    unrendered(tag, content)
                }
            }
            Transform::CodeBlock(language) => format!(
                "<div class=\"{}\"><div class=\"language-tag\"></div><pre><code>{content}</code></pre></div>\n",
                language.fence_name()
            ),
        }
    }
}

/// Splits `text](target` at the first `]`, skipping as many characters as
/// the mid delimiter has.
fn split_target<'a>(tag: &Tag, content: &'a str) -> Option<(&'a str, &'a str)> {
    if !content.contains(tag.mid()) {
        return None;
    }
    let bracket = content.find(']')?;
    let rest = &content[bracket..];
    let skip = rest
        .char_indices()
        .nth(tag.mid().chars().count())
        .map_or(rest.len(), |(i, _)| i);
    Some((&content[..bracket], &rest[skip..]))
}

fn unrendered(tag: &Tag, content: &str) -> String {
    format!("{}{content}{}", tag.open(), tag.close())
}
