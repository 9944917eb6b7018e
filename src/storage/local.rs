//! Local filesystem keyword store.
//!
//! Keeps the collection in a single JSON document under the storage
//! directory. Every mutation is a read-modify-write under an in-process
//! lock and lands atomically (write to temp, then rename), so
//! `insert_if_absent` cannot race with itself inside one process. Separate
//! processes sharing the same file are not coordinated.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── config.toml           # Pipeline Configuration
//! └── keywords.json         # Keyword Collection
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{KeywordRecord, StoredKeyword};
use crate::storage::{KeywordDocument, KeywordStore};

/// Local filesystem storage backend.
pub struct LocalStore {
    root_dir: PathBuf,
    file_name: String,
    lock: Mutex<()>,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            file_name: file_name.into(),
            lock: Mutex::new(()),
        }
    }

    /// Open a store, creating the root directory if needed.
    pub async fn open(root_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Result<Self> {
        let store = Self::new(root_dir, file_name);
        tokio::fs::create_dir_all(&store.root_dir).await.map_err(|e| {
            AppError::config(format!(
                "Storage directory {} is not usable: {}",
                store.root_dir.display(),
                e
            ))
        })?;
        Ok(store)
    }

    /// Full path of the keyword document.
    pub fn path(&self) -> PathBuf {
        self.root_dir.join(&self.file_name)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read the document, returning an empty one if the file doesn't exist.
    async fn read_document(&self) -> Result<KeywordDocument> {
        match tokio::fs::read(self.path()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(KeywordDocument::default()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn write_document(&self, document: &KeywordDocument) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        self.write_bytes(&bytes).await
    }
}

#[async_trait]
impl KeywordStore for LocalStore {
    async fn find_by_keyword(&self, keyword: &str, limit: usize) -> Result<Vec<StoredKeyword>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_document().await?.find(keyword, limit))
    }

    async fn insert(&self, record: &KeywordRecord) -> Result<String> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        let id = document.push(record);
        self.write_document(&document).await?;
        Ok(id)
    }

    async fn insert_if_absent(&self, record: &KeywordRecord) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        if document.contains(&record.keyword) {
            return Ok(None);
        }
        let id = document.push(record);
        self.write_document(&document).await?;
        log::debug!("Stored '{}' in {}", record.keyword, self.path().display());
        Ok(Some(id))
    }

    async fn created_since(
        &self,
        since: DateTime<Utc>,
        active_only: bool,
    ) -> Result<Vec<StoredKeyword>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_document().await?.created_since(since, active_only))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, SourceId};
    use tempfile::TempDir;

    fn record(keyword: &str) -> KeywordRecord {
        KeywordRecord::new(keyword, None, Category::Paper, SourceId::Paperswithcode, None)
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path(), "keywords.json");

        assert!(store.find_by_keyword("RAG", 1).await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_insert_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::open(tmp.path(), "keywords.json").await.unwrap();
        let id = store.insert(&record("LoRA")).await.unwrap();

        let reopened = LocalStore::new(tmp.path(), "keywords.json");
        let found = reopened.find_by_keyword("LoRA", 1).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(found[0].record.category, Category::Paper);
    }

    #[tokio::test]
    async fn test_insert_if_absent_declines_existing() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path(), "keywords.json");

        assert!(store.insert_if_absent(&record("CLIP")).await.unwrap().is_some());
        assert!(store.insert_if_absent(&record("CLIP")).await.unwrap().is_none());
        assert!(store.insert_if_absent(&record("clip")).await.unwrap().is_some());

        let doc = store.read_document().await.unwrap();
        assert_eq!(doc.count, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_insert_if_absent_writes_once() {
        let tmp = TempDir::new().unwrap();
        let store = std::sync::Arc::new(LocalStore::new(tmp.path(), "keywords.json"));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_if_absent(&record("CLIP")).await })
            })
            .collect();

        let mut written = 0;
        for task in tasks {
            if task.await.unwrap().unwrap().is_some() {
                written += 1;
            }
        }
        assert_eq!(written, 1);

        let doc = store.read_document().await.unwrap();
        assert_eq!(doc.count, 1);
        assert_eq!(store.find_by_keyword("CLIP", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_store_error() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path(), "keywords.json");
        store.write_bytes(b"not json").await.unwrap();

        let err = store.find_by_keyword("RAG", 1).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Store);
    }
}
