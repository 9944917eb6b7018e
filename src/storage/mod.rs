//! Document store abstractions for keyword persistence.
//!
//! All backends keep the whole keyword collection as one JSON document:
//!
//! ```text
//! storage/
//! ├── config.toml           # Pipeline configuration
//! └── keywords.json         # { updated_at, count, keywords: [...] }
//! ```
//!
//! `keyword` is unique by convention, not by a storage constraint. Backends
//! that can hold a lock across check and write make
//! [`KeywordStore::insert_if_absent`] atomic; the others fall back to
//! check-then-insert, and two overlapping runs may then both write the same
//! keyword.

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{KeywordRecord, StoredKeyword};

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

/// Serialized form of the keyword collection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeywordDocument {
    /// ISO 8601 timestamp of last update
    pub updated_at: Option<DateTime<Utc>>,
    /// Total record count
    pub count: usize,
    /// The records, in insertion order
    pub keywords: Vec<StoredKeyword>,
}

impl KeywordDocument {
    /// Up to `limit` records whose keyword equals `keyword` exactly.
    pub fn find(&self, keyword: &str, limit: usize) -> Vec<StoredKeyword> {
        self.keywords
            .iter()
            .filter(|k| k.record.keyword == keyword)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.record.keyword == keyword)
    }

    /// Append a record and return its new identifier.
    pub fn push(&mut self, record: &KeywordRecord) -> String {
        let id = record.generate_id();
        self.keywords.push(StoredKeyword {
            id: id.clone(),
            record: record.clone(),
        });
        self.count = self.keywords.len();
        self.updated_at = Some(Utc::now());
        id
    }

    /// Records created at or after `since`.
    pub fn created_since(&self, since: DateTime<Utc>, active_only: bool) -> Vec<StoredKeyword> {
        self.keywords
            .iter()
            .filter(|k| k.record.created_at >= since)
            .filter(|k| !active_only || k.record.is_active)
            .cloned()
            .collect()
    }
}

/// Trait for keyword store backends.
#[async_trait]
pub trait KeywordStore: Send + Sync {
    /// Records whose `keyword` equals the input exactly, at most `limit`.
    async fn find_by_keyword(&self, keyword: &str, limit: usize) -> Result<Vec<StoredKeyword>>;

    /// Insert a record unconditionally and return its identifier.
    async fn insert(&self, record: &KeywordRecord) -> Result<String>;

    /// Insert unless a record with the same keyword exists.
    ///
    /// Returns the new identifier, or `None` when the keyword was present.
    /// The default is a plain check followed by an insert and is not atomic.
    async fn insert_if_absent(&self, record: &KeywordRecord) -> Result<Option<String>> {
        if !self.find_by_keyword(&record.keyword, 1).await?.is_empty() {
            return Ok(None);
        }
        self.insert(record).await.map(Some)
    }

    /// Records with `createdAt >= since`, optionally only active ones.
    async fn created_since(
        &self,
        since: DateTime<Utc>,
        active_only: bool,
    ) -> Result<Vec<StoredKeyword>>;
}
