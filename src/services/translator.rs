// src/services/translator.rs

//! Keyword translation through the MyMemory HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::TranslationConfig;

/// External translation collaborator.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

/// Translator backed by the MyMemory `get` endpoint.
pub struct MyMemoryTranslator {
    client: Client,
    endpoint: String,
}

impl MyMemoryTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build translator client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Pull the translated text out of a MyMemory response body.
    fn parse_response(body: &Value) -> Result<String> {
        let status = match body.get("responseStatus") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        if status != Some(200) {
            let details = body
                .get("responseDetails")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            return Err(AppError::translation(format!(
                "status {:?}: {}",
                status, details
            )));
        }

        body.pointer("/responseData/translatedText")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::translation("response has no translatedText"))
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let langpair = format!("{source_lang}|{target_lang}");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await
            .map_err(AppError::translation)?
            .error_for_status()
            .map_err(AppError::translation)?;

        let body: Value = response.json().await.map_err(AppError::translation)?;
        let translated = Self::parse_response(&body)?;
        log::debug!("Translated '{}' -> '{}'", text, translated);
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_success() {
        let body = json!({
            "responseStatus": 200,
            "responseData": { "translatedText": "강화 학습" }
        });
        assert_eq!(
            MyMemoryTranslator::parse_response(&body).unwrap(),
            "강화 학습"
        );
    }

    #[test]
    fn test_parse_string_status() {
        let body = json!({
            "responseStatus": "200",
            "responseData": { "translatedText": "모델" }
        });
        assert!(MyMemoryTranslator::parse_response(&body).is_ok());
    }

    #[test]
    fn test_parse_quota_error() {
        let body = json!({
            "responseStatus": 429,
            "responseDetails": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS"
        });
        let err = MyMemoryTranslator::parse_response(&body).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Translation);
    }

    #[test]
    fn test_new_from_defaults() {
        assert!(MyMemoryTranslator::new(&TranslationConfig::default()).is_ok());
    }
}
