use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid documents directory: {0}")]
    InvalidDocumentsDir(String),
}

/// Read a markdown file and return its content
pub fn read_file(relative_path: &RelativePath, documents_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(documents_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write content to a markdown file
pub fn write_file(
    relative_path: &RelativePath,
    documents_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(documents_root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

pub fn validate_documents_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidDocumentsDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

/// Persistence collaborator of a [`MarkdownDocument`](crate::editing::MarkdownDocument).
///
/// Supplies raw text on load and accepts raw text on save. Nothing is
/// interpreted on the way through.
pub trait DocumentStore: Send {
    fn load(&self) -> Result<String, IoError>;
    fn save(&mut self, text: &str) -> Result<(), IoError>;
}

/// A document file under a documents root.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    path: RelativePathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, path: impl Into<RelativePathBuf>) -> Self {
        Self {
            root: root.into(),
            path: path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> &RelativePath {
        &self.path
    }

    pub fn absolute_path(&self) -> PathBuf {
        self.path.to_path(&self.root)
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<String, IoError> {
        read_file(&self.path, &self.root)
    }

    fn save(&mut self, text: &str) -> Result<(), IoError> {
        log::debug!("saving {} chars to {}", text.chars().count(), self.path);
        write_file(&self.path, &self.root, text)
    }
}

#[derive(Debug, Default)]
struct MemoryContents {
    text: String,
    saves: usize,
}

/// In-memory store. Clones share the same contents, so a caller can keep a
/// handle and observe what the document saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Arc<Mutex<MemoryContents>>,
}

impl MemoryStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(MemoryContents {
                text: text.into(),
                saves: 0,
            })),
        }
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> MutexGuard<'_, MemoryContents> {
        self.contents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<String, IoError> {
        Ok(self.text())
    }

    fn save(&mut self, text: &str) -> Result<(), IoError> {
        let mut contents = self.lock();
        contents.text = text.to_string();
        contents.saves += 1;
        Ok(())
    }
}
