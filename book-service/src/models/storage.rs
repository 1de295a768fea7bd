use crate::models::book::Book;
use crate::utils::file::temp_path_for;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Read error: {0}")]
    Read(#[source] std::io::Error),
    #[error("Write error: {0}")]
    Write(#[source] std::io::Error),
    #[error("Malformed document: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Whole-collection persistence. Every call goes to the backing document;
/// nothing is cached between calls.
#[async_trait]
pub trait DocumentStore {
    /// Creates an empty collection document if none exists yet.
    async fn initialize(&self) -> Result<(), StorageError>;
    async fn load_all(&self) -> Result<Vec<Book>, StorageError>;
    /// Replaces the entire document with `books`.
    async fn save_all(&self, books: &[Book]) -> Result<(), StorageError>;
}

#[derive(Deserialize)]
struct Collection {
    books: Vec<Book>,
}

#[derive(Serialize)]
struct CollectionRef<'a> {
    books: &'a [Book],
}

/// Stores the collection as a single JSON document: `{"books": [...]}`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, books: &[Book]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(&CollectionRef { books })
            .map_err(StorageError::Serialization)?;

        // Readers must never see a half-written document.
        let tmp_path = temp_path_for(&self.path);
        if let Err(e) = fs::write(&tmp_path, bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::Write(e));
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StorageError::Write(e)
        })
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn initialize(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StorageError::Write)?;
            }
        }

        self.write_document(&[])?;
        info!("Created empty book collection at {}", self.path.display());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Book>, StorageError> {
        let bytes = fs::read(&self.path).map_err(StorageError::Read)?;
        let collection: Collection =
            serde_json::from_slice(&bytes).map_err(StorageError::Malformed)?;
        Ok(collection.books)
    }

    async fn save_all(&self, books: &[Book]) -> Result<(), StorageError> {
        self.write_document(books)
    }
}
