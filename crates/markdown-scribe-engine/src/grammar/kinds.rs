use std::fmt;

/// Languages a fenced code block can declare after its opening backticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Swift,
    ObjectiveC,
    Unspecified,
}

impl Language {
    /// Declared languages first; `Unspecified` must stay last because its
    /// bare fence is a prefix of every other fence.
    pub const ALL: [Language; 4] = [
        Language::Rust,
        Language::Swift,
        Language::ObjectiveC,
        Language::Unspecified,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Rust => "Rust",
            Language::Swift => "Swift",
            Language::ObjectiveC => "Objective-C",
            Language::Unspecified => "Unspecified",
        }
    }

    /// The word written after the opening fence, also used as the CSS class.
    pub fn fence_name(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Swift => "swift",
            Language::ObjectiveC => "objective-c",
            Language::Unspecified => "",
        }
    }
}

/// How a tag shows up in the document outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlineRepresentation {
    Heading(u8),
    CodeBlock(Language),
}

impl fmt::Display for OutlineRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlineRepresentation::Heading(level) => write!(f, "H{level}"),
            OutlineRepresentation::CodeBlock(language) => {
                write!(f, "{} Code", language.display_name())
            }
        }
    }
}
