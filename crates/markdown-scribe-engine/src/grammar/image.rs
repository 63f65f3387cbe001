use relative_path::RelativePath;
use std::path::PathBuf;

/// Policy that turns an image source written in a document into something an
/// HTML viewer can load.
///
/// Remote sources (`http…`) and absolute paths pass through. Relative sources
/// are resolved against the documents root as `file://` URLs. Without a root
/// the source is left as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResolver {
    root: Option<PathBuf>,
}

impl ImageResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn root(&self) -> Option<&PathBuf> {
        self.root.as_ref()
    }

    pub fn resolve(&self, src: &str) -> String {
        if src.starts_with("http") || src.starts_with("file:") {
            return src.to_string();
        }
        if src.starts_with('/') {
            return format!("file://{src}");
        }

        match &self.root {
            Some(root) => {
                let path = RelativePath::new(src).to_logical_path(root);
                format!("file://{}", path.display())
            }
            None => src.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_sources_pass_through() {
        let resolver = ImageResolver::new("/docs");
        assert_eq!(
            resolver.resolve("https://example.com/a.png"),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn relative_sources_resolve_under_root() {
        let resolver = ImageResolver::new("/home/me/Documents");
        assert_eq!(
            resolver.resolve("images/cat.png"),
            "file:///home/me/Documents/images/cat.png"
        );
    }

    #[test]
    fn parent_components_are_resolved_logically() {
        let resolver = ImageResolver::new("/home/me/Documents/notes");
        assert_eq!(
            resolver.resolve("../cat.png"),
            "file:///home/me/Documents/cat.png"
        );
    }

    #[test]
    fn absolute_paths_become_file_urls() {
        let resolver = ImageResolver::default();
        assert_eq!(resolver.resolve("/tmp/a.png"), "file:///tmp/a.png");
    }

    #[test]
    fn no_root_leaves_source_untouched() {
        assert_eq!(ImageResolver::default().resolve("a.png"), "a.png");
    }
}
