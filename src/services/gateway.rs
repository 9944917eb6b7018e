// src/services/gateway.rs

//! Dedup/persistence gateway.
//!
//! Writes a keyword only on its first sighting. The existence check looks at
//! one record at most; the write goes through
//! [`KeywordStore::insert_if_absent`], so backends that can lock across check
//! and write close the gap between them.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Category, KeywordRecord, SourceId, TranslationConfig};
use crate::services::Translator;
use crate::storage::KeywordStore;
use crate::utils::ellipsize;

/// Outcome of a successful save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new record was written with this identifier
    Created(String),
    /// A record with the same keyword already existed
    Exists,
}

/// Gateway between the pipeline and the document store.
pub struct KeywordGateway {
    store: Arc<dyn KeywordStore>,
    translator: Option<Arc<dyn Translator>>,
    translation: TranslationConfig,
}

impl KeywordGateway {
    pub fn new(
        store: Arc<dyn KeywordStore>,
        translator: Option<Arc<dyn Translator>>,
        translation: TranslationConfig,
    ) -> Self {
        Self {
            store,
            translator,
            translation,
        }
    }

    /// Gateway that stores keywords untranslated.
    pub fn without_translation(store: Arc<dyn KeywordStore>) -> Self {
        Self::new(
            store,
            None,
            TranslationConfig {
                enabled: false,
                ..TranslationConfig::default()
            },
        )
    }

    /// Persist `keyword` if it has never been seen.
    ///
    /// Returns `true` only when a new record was written. Store failures are
    /// logged and reported as `false`.
    pub async fn save_if_new(
        &self,
        keyword: &str,
        category: Category,
        source: SourceId,
        url: Option<&str>,
    ) -> bool {
        match self.try_save(keyword, category, source, url).await {
            Ok(SaveOutcome::Created(_)) => {
                log::info!("New keyword saved: {} [{}]", keyword, category);
                true
            }
            Ok(SaveOutcome::Exists) => {
                log::info!("Keyword '{}' already exists", keyword);
                false
            }
            Err(e) => {
                log::error!("Failed to save keyword '{}' ({}): {}", keyword, e.kind(), e);
                false
            }
        }
    }

    /// Like [`save_if_new`](Self::save_if_new) but returns the tagged result.
    pub async fn try_save(
        &self,
        keyword: &str,
        category: Category,
        source: SourceId,
        url: Option<&str>,
    ) -> Result<SaveOutcome> {
        let existing = self
            .store
            .find_by_keyword(keyword, 1)
            .await
            .map_err(into_store_error)?;
        if !existing.is_empty() {
            return Ok(SaveOutcome::Exists);
        }

        let translated = self.translate(keyword).await;
        let record = KeywordRecord::new(
            keyword,
            translated,
            category,
            source,
            url.map(str::to_string),
        );

        match self
            .store
            .insert_if_absent(&record)
            .await
            .map_err(into_store_error)?
        {
            Some(id) => Ok(SaveOutcome::Created(id)),
            None => Ok(SaveOutcome::Exists),
        }
    }

    /// Translation of `keyword`, the keyword itself on translator failure,
    /// or `None` when translation is disabled.
    async fn translate(&self, keyword: &str) -> Option<String> {
        if !self.translation.enabled {
            return None;
        }
        let translator = self.translator.as_ref()?;

        let text = ellipsize(keyword, self.translation.max_chars);
        match translator
            .translate(
                &text,
                &self.translation.source_lang,
                &self.translation.target_lang,
            )
            .await
        {
            Ok(translated) => Some(translated),
            Err(e) => {
                log::warn!("Translation failed for '{}', keeping original: {}", keyword, e);
                Some(keyword.to_string())
            }
        }
    }
}

/// Anything the store reports is a store failure from the gateway's view.
fn into_store_error(e: AppError) -> AppError {
    match e {
        AppError::Store(_) => e,
        other => AppError::store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::{KeywordStore, MemoryStore};
    use crate::models::StoredKeyword;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;

    struct FixedTranslator;

    #[async_trait]
    impl Translator for FixedTranslator {
        async fn translate(&self, text: &str, _: &str, _: &str) -> Result<String> {
            Ok(format!("ko:{text}"))
        }
    }

    struct FailingTranslator;

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(&self, _: &str, _: &str, _: &str) -> Result<String> {
            Err(AppError::translation("service unavailable"))
        }
    }

    #[derive(Default)]
    struct RecordingTranslator {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Translator for RecordingTranslator {
        async fn translate(&self, text: &str, _: &str, _: &str) -> Result<String> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(text.to_string())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl KeywordStore for BrokenStore {
        async fn find_by_keyword(&self, _: &str, _: usize) -> Result<Vec<StoredKeyword>> {
            Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        async fn insert(&self, _: &KeywordRecord) -> Result<String> {
            Err(AppError::store("read-only"))
        }

        async fn created_since(&self, _: DateTime<Utc>, _: bool) -> Result<Vec<StoredKeyword>> {
            Ok(Vec::new())
        }
    }

    fn gateway(store: Arc<MemoryStore>, translator: Arc<dyn Translator>) -> KeywordGateway {
        KeywordGateway::new(store, Some(translator), TranslationConfig::default())
    }

    #[tokio::test]
    async fn test_second_save_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let gw = gateway(store.clone(), Arc::new(FixedTranslator));

        let first = gw
            .save_if_new("Mixtral", Category::Model, SourceId::Huggingface, None)
            .await;
        let second = gw
            .save_if_new("Mixtral", Category::Model, SourceId::Huggingface, None)
            .await;

        assert_eq!((first, second), (true, false));
        let all = store.all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.translated_keyword.as_deref(), Some("ko:Mixtral"));
        assert!(all[0].record.is_active);
    }

    #[tokio::test]
    async fn test_existing_record_untouched() {
        let store = Arc::new(MemoryStore::new());
        let mut old = KeywordRecord::new("Bard", None, Category::App, SourceId::Techcrunch, None);
        old.is_active = false;
        store.insert(&old).await.unwrap();

        let gw = gateway(store.clone(), Arc::new(FixedTranslator));
        let outcome = gw
            .try_save("Bard", Category::Model, SourceId::Huggingface, Some("https://x"))
            .await
            .unwrap();

        assert_eq!(outcome, SaveOutcome::Exists);
        let all = store.all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record, old);
    }

    #[tokio::test]
    async fn test_translation_failure_falls_back_to_original() {
        let store = Arc::new(MemoryStore::new());
        let gw = gateway(store.clone(), Arc::new(FailingTranslator));

        assert!(
            gw.save_if_new("LLaMA", Category::Model, SourceId::Huggingface, None)
                .await
        );
        let all = store.all().await;
        assert_eq!(all[0].record.translated_keyword.as_deref(), Some("LLaMA"));
    }

    #[tokio::test]
    async fn test_translation_disabled_stores_null() {
        let store = Arc::new(MemoryStore::new());
        let gw = KeywordGateway::without_translation(store.clone());

        assert!(gw.save_if_new("RLHF", Category::Code, SourceId::Hackernews, None).await);
        assert_eq!(store.all().await[0].record.translated_keyword, None);
    }

    #[tokio::test]
    async fn test_long_text_is_ellipsized_before_translation() {
        let store = Arc::new(MemoryStore::new());
        let translator = Arc::new(RecordingTranslator::default());
        let config = TranslationConfig {
            max_chars: 10,
            ..TranslationConfig::default()
        };
        let gw = KeywordGateway::new(store, Some(translator.clone()), config);

        gw.save_if_new(
            "Constitutional AI for everyone",
            Category::Community,
            SourceId::Ainews,
            None,
        )
        .await;

        let seen = translator.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), ["Constituti..."]);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_as_store_kind() {
        let gw = KeywordGateway::without_translation(Arc::new(BrokenStore));

        let err = gw
            .try_save("PaLM", Category::Model, SourceId::Huggingface, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
        assert!(!gw.save_if_new("PaLM", Category::Model, SourceId::Huggingface, None).await);
    }
}
