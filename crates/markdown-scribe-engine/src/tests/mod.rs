//! Shared helpers for unit tests.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::io::{DocumentStore, IoError};

pub fn create_test_documents_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// A store whose saves always fail.
#[derive(Debug, Default)]
pub struct FailingStore;

impl DocumentStore for FailingStore {
    fn load(&self) -> Result<String, IoError> {
        Ok(String::new())
    }

    fn save(&mut self, _text: &str) -> Result<(), IoError> {
        Err(IoError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        )))
    }
}
