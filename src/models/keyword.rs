// src/models/keyword.rs

//! Candidate and persisted keyword records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{Category, SourceId};

/// A title harvested from a source during one crawl cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Title text as published (whitespace collapsed)
    pub raw_text: String,

    /// Absolute link to the entry, if the source provides one
    pub source_url: Option<String>,

    /// Source that produced the candidate
    pub source_id: SourceId,
}

impl CandidateRecord {
    pub fn new(raw_text: impl Into<String>, source_url: Option<String>, source_id: SourceId) -> Self {
        Self {
            raw_text: raw_text.into(),
            source_url,
            source_id,
        }
    }
}

/// Keyword document as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    pub keyword: String,
    pub translated_keyword: Option<String>,
    pub category: Category,
    pub source: SourceId,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl KeywordRecord {
    /// Build a fresh, active record stamped with the current time.
    pub fn new(
        keyword: impl Into<String>,
        translated_keyword: Option<String>,
        category: Category,
        source: SourceId,
        url: Option<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            translated_keyword,
            category,
            source,
            url,
            created_at: Utc::now(),
            is_active: true,
        }
    }

    /// Generate a document identifier for this record.
    pub fn generate_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.keyword.as_bytes());
        hasher.update(b"\0");
        hasher.update(
            self.created_at
                .timestamp_nanos_opt()
                .unwrap_or_default()
                .to_be_bytes(),
        );
        let digest = hex::encode(hasher.finalize());
        digest[..20].to_string()
    }
}

/// A record together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredKeyword {
    pub id: String,

    #[serde(flatten)]
    pub record: KeywordRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let record = KeywordRecord::new(
            "LLaMA",
            Some("라마".to_string()),
            Category::Model,
            SourceId::Huggingface,
            None,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["keyword"], "LLaMA");
        assert_eq!(value["translatedKeyword"], "라마");
        assert_eq!(value["category"], "모델");
        assert_eq!(value["source"], "huggingface");
        assert_eq!(value["isActive"], true);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_generate_id_is_stable_per_record() {
        let record = KeywordRecord::new("RAG", None, Category::App, SourceId::Techcrunch, None);
        let id = record.generate_id();
        assert_eq!(id.len(), 20);
        assert_eq!(id, record.generate_id());
    }

    #[test]
    fn test_stored_keyword_flattens() {
        let record = KeywordRecord::new("RAG", None, Category::App, SourceId::Techcrunch, None);
        let stored = StoredKeyword {
            id: "abc".to_string(),
            record,
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["keyword"], "RAG");
        let back: StoredKeyword = serde_json::from_value(value).unwrap();
        assert_eq!(back, stored);
    }
}
