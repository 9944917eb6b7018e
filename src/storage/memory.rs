//! In-process keyword store.
//!
//! Used by tests and dry runs. Check and insert happen under one lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{KeywordRecord, StoredKeyword};
use crate::storage::{KeywordDocument, KeywordStore};

#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<KeywordDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record.
    pub async fn all(&self) -> Vec<StoredKeyword> {
        self.document.lock().await.keywords.clone()
    }

    pub async fn len(&self) -> usize {
        self.document.lock().await.keywords.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeywordStore for MemoryStore {
    async fn find_by_keyword(&self, keyword: &str, limit: usize) -> Result<Vec<StoredKeyword>> {
        Ok(self.document.lock().await.find(keyword, limit))
    }

    async fn insert(&self, record: &KeywordRecord) -> Result<String> {
        Ok(self.document.lock().await.push(record))
    }

    async fn insert_if_absent(&self, record: &KeywordRecord) -> Result<Option<String>> {
        let mut document = self.document.lock().await;
        if document.contains(&record.keyword) {
            return Ok(None);
        }
        Ok(Some(document.push(record)))
    }

    async fn created_since(
        &self,
        since: DateTime<Utc>,
        active_only: bool,
    ) -> Result<Vec<StoredKeyword>> {
        Ok(self.document.lock().await.created_since(since, active_only))
    }
}
