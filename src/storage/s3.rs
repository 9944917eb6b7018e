//! AWS S3 keyword store.
//!
//! The collection lives in one object, `{bucket}/{prefix}/{file_name}`.
//! S3 offers no compare-and-swap on plain puts, so `insert_if_absent` is the
//! trait's check-then-insert: two overlapping invocations can both write the
//! same keyword.

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{KeywordRecord, StoredKeyword};
use crate::storage::{KeywordDocument, KeywordStore};

/// S3-backed keyword store.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    key: String,
}

impl S3Store {
    /// Create a new S3 store instance.
    pub fn new(client: Client, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Create S3 storage from environment configuration.
    ///
    /// `S3_BUCKET` is required; `S3_PREFIX` defaults to `aiweekly`.
    pub async fn from_env(file_name: &str) -> Result<Self> {
        let bucket = std::env::var("S3_BUCKET")
            .ok()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| AppError::config("S3_BUCKET environment variable is not set"))?;
        let prefix = std::env::var("S3_PREFIX").unwrap_or_else(|_| "aiweekly".to_string());

        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);

        let key = format!("{}/{}", prefix.trim_matches('/'), file_name);
        Ok(Self::new(client, bucket, key))
    }

    async fn read_document(&self) -> Result<KeywordDocument> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(AppError::store)?;
                Ok(serde_json::from_slice(&bytes.into_bytes())?)
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    log::info!("No existing data at s3://{}/{}", self.bucket, self.key);
                    Ok(KeywordDocument::default())
                } else {
                    Err(AppError::store(service_err))
                }
            }
        }
    }

    async fn write_document(&self, document: &KeywordDocument) -> Result<()> {
        let json = serde_json::to_vec_pretty(document)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .body(ByteStream::from(json))
            .content_type("application/json")
            .send()
            .await
            .map_err(AppError::store)?;

        log::info!(
            "Wrote {} keywords to s3://{}/{}",
            document.count, self.bucket, self.key
        );
        Ok(())
    }
}

#[async_trait]
impl KeywordStore for S3Store {
    async fn find_by_keyword(&self, keyword: &str, limit: usize) -> Result<Vec<StoredKeyword>> {
        Ok(self.read_document().await?.find(keyword, limit))
    }

    async fn insert(&self, record: &KeywordRecord) -> Result<String> {
        let mut document = self.read_document().await?;
        let id = document.push(record);
        self.write_document(&document).await?;
        Ok(id)
    }

    async fn created_since(
        &self,
        since: DateTime<Utc>,
        active_only: bool,
    ) -> Result<Vec<StoredKeyword>> {
        Ok(self.read_document().await?.created_since(since, active_only))
    }
}
