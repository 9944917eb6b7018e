//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SourceId;

/// Upper bound on entries taken from one source per cycle.
pub const MAX_SOURCE_LIMIT: usize = 50;

/// Upper bound on extracted terms saved per candidate.
pub const MAX_TERMS_PER_CANDIDATE: usize = 10;

/// Longest "recent keywords" window, in days.
pub const MAX_RECENT_DAYS: i64 = 366;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Candidate filtering and keyword limits
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Translator settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Document store settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Source definitions
    #[serde(default = "defaults::sources")]
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.pipeline.max_keyword_length == 0 {
            return Err(AppError::config("pipeline.max_keyword_length must be > 0"));
        }
        if !(1..=MAX_RECENT_DAYS).contains(&self.pipeline.recent_days) {
            return Err(AppError::config(format!(
                "pipeline.recent_days must be between 1 and {}",
                MAX_RECENT_DAYS
            )));
        }
        if self.translation.enabled {
            if self.translation.timeout_secs == 0 {
                return Err(AppError::config("translation.timeout_secs must be > 0"));
            }
            if self.translation.max_chars == 0 {
                return Err(AppError::config("translation.max_chars must be > 0"));
            }
            url::Url::parse(&self.translation.endpoint).map_err(|e| {
                AppError::config(format!(
                    "translation.endpoint '{}' is invalid: {}",
                    self.translation.endpoint, e
                ))
            })?;
        }
        if self.storage.file_name.trim().is_empty() {
            return Err(AppError::config("storage.file_name is empty"));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id) {
                return Err(AppError::config(format!(
                    "Source '{}' is defined more than once",
                    source.id
                )));
            }
            url::Url::parse(&source.url).map_err(|e| {
                AppError::config(format!("Source '{}' has invalid url: {}", source.id, e))
            })?;
            if !(1..=MAX_SOURCE_LIMIT).contains(&source.limit) {
                return Err(AppError::config(format!(
                    "Source '{}' limit must be between 1 and {}",
                    source.id, MAX_SOURCE_LIMIT
                )));
            }
            if source.terms_per_candidate > MAX_TERMS_PER_CANDIDATE {
                return Err(AppError::config(format!(
                    "Source '{}' terms_per_candidate must be at most {}",
                    source.id, MAX_TERMS_PER_CANDIDATE
                )));
            }
        }
        if self.enabled_sources().next().is_none() {
            return Err(AppError::config("No enabled sources defined"));
        }
        Ok(())
    }

    /// Enabled sources in processing order.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        SourceId::ALL.into_iter().filter_map(move |id| {
            self.sources
                .iter()
                .find(|s| s.id == id && s.enabled)
        })
    }

    /// Apply environment overrides used by the serverless entry point.
    pub fn apply_env_overrides(&mut self) {
        if let Some(secs) = env_parse("CRAWL_TIMEOUT_SECS") {
            self.crawler.timeout_secs = secs;
        }
        if let Some(ms) = env_parse("REQUEST_DELAY_MS") {
            self.crawler.request_delay_ms = ms;
        }
        if let Some(enabled) = env_parse("TRANSLATION_ENABLED") {
            self.translation.enabled = enabled;
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            pipeline: PipelineConfig::default(),
            translation: TranslationConfig::default(),
            storage: StorageConfig::default(),
            sources: defaults::sources(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between sources in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Candidate filtering and keyword limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Titles with fewer characters are treated as noise
    #[serde(default = "defaults::min_title_length")]
    pub min_title_length: usize,

    /// Titles stored as keywords are cut to this many characters
    #[serde(default = "defaults::max_keyword_length")]
    pub max_keyword_length: usize,

    /// Window for the "recent keywords" report
    #[serde(default = "defaults::recent_days")]
    pub recent_days: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_title_length: defaults::min_title_length(),
            max_keyword_length: defaults::max_keyword_length(),
            recent_days: defaults::recent_days(),
        }
    }
}

/// Translator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// MyMemory-compatible endpoint
    #[serde(default = "defaults::translation_endpoint")]
    pub endpoint: String,

    #[serde(default = "defaults::source_lang")]
    pub source_lang: String,

    #[serde(default = "defaults::target_lang")]
    pub target_lang: String,

    /// Longer text is cut and ellipsized before the call
    #[serde(default = "defaults::max_chars")]
    pub max_chars: usize,

    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            endpoint: defaults::translation_endpoint(),
            source_lang: defaults::source_lang(),
            target_lang: defaults::target_lang(),
            max_chars: defaults::max_chars(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Document store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Name of the keyword document (local file or object key suffix)
    #[serde(default = "defaults::file_name")]
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_name: defaults::file_name(),
        }
    }
}

/// One harvested source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: SourceId,

    /// Page or feed URL
    pub url: String,

    /// Maximum entries taken per cycle
    #[serde(default = "defaults::limit")]
    pub limit: usize,

    /// Extracted terms saved per candidate in addition to its title
    #[serde(default = "defaults::terms_per_candidate")]
    pub terms_per_candidate: usize,

    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
}

impl SourceConfig {
    pub fn new(id: SourceId, url: impl Into<String>, limit: usize, terms_per_candidate: usize) -> Self {
        Self {
            id,
            url: url.into(),
            limit,
            terms_per_candidate,
            enabled: true,
        }
    }
}

mod defaults {
    use super::SourceConfig;
    use crate::models::SourceId;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn request_delay() -> u64 {
        500
    }

    // Pipeline defaults
    pub fn min_title_length() -> usize {
        11
    }
    pub fn max_keyword_length() -> usize {
        100
    }
    pub fn recent_days() -> i64 {
        7
    }

    // Translation defaults
    pub fn enabled() -> bool {
        true
    }
    pub fn translation_endpoint() -> String {
        "https://api.mymemory.translated.net/get".into()
    }
    pub fn source_lang() -> String {
        "en".into()
    }
    pub fn target_lang() -> String {
        "ko".into()
    }
    pub fn max_chars() -> usize {
        500
    }

    // Storage defaults
    pub fn file_name() -> String {
        "keywords.json".into()
    }

    // Source defaults
    pub fn limit() -> usize {
        10
    }
    pub fn terms_per_candidate() -> usize {
        2
    }

    pub fn sources() -> Vec<SourceConfig> {
        vec![
            SourceConfig::new(SourceId::Huggingface, "https://huggingface.co/papers", 15, 3),
            SourceConfig::new(SourceId::Paperswithcode, "https://paperswithcode.com/latest", 15, 2),
            SourceConfig::new(
                SourceId::Techcrunch,
                "https://techcrunch.com/category/artificial-intelligence/feed/",
                10,
                2,
            ),
            SourceConfig::new(SourceId::Ainews, "https://www.artificialintelligence-news.com", 10, 2),
            SourceConfig {
                enabled: false,
                ..SourceConfig::new(
                    SourceId::Reddit,
                    "https://www.reddit.com/r/MachineLearning/.rss",
                    10,
                    2,
                )
            },
            SourceConfig {
                enabled: false,
                ..SourceConfig::new(SourceId::Hackernews, "https://hnrss.org/newest?q=AI", 10, 2)
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn validate_rejects_duplicate_sources() {
        let mut config = Config::default();
        let first = config.sources[0].clone();
        config.sources.push(first);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_no_enabled_sources() {
        let mut config = Config::default();
        for source in &mut config.sources {
            source.enabled = false;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_windows() {
        for days in [0, -3, i64::MAX] {
            let mut config = Config::default();
            config.pipeline.recent_days = days;
            let err = config.validate().unwrap_err();
            assert!(err.is_fatal(), "recent_days = {days}");
        }
    }

    #[test]
    fn validate_bounds_source_limits() {
        let mut config = Config::default();
        config.sources[0].limit = MAX_SOURCE_LIMIT;
        config.sources[0].terms_per_candidate = MAX_TERMS_PER_CANDIDATE;
        assert!(config.validate().is_ok());

        config.sources[0].limit = usize::MAX;
        assert!(config.validate().is_err());

        config.sources[0].limit = 0;
        assert!(config.validate().is_err());

        config.sources[0].limit = 15;
        config.sources[0].terms_per_candidate = usize::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn enabled_sources_follow_processing_order() {
        let mut config = Config::default();
        config.sources.reverse();
        let ids: Vec<SourceId> = config.enabled_sources().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                SourceId::Huggingface,
                SourceId::Paperswithcode,
                SourceId::Techcrunch,
                SourceId::Ainews
            ]
        );
    }

    #[test]
    fn parses_partial_toml() {
        let toml = r#"
            [pipeline]
            max_keyword_length = 80

            [translation]
            enabled = false

            [[sources]]
            id = "reddit"
            url = "https://www.reddit.com/r/LocalLLaMA/.rss"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.pipeline.max_keyword_length, 80);
        assert_eq!(config.pipeline.min_title_length, 11);
        assert!(!config.translation.enabled);
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].id, SourceId::Reddit);
        assert_eq!(config.sources[0].limit, 10);
        assert!(config.sources[0].enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bundled_config_matches_defaults() {
        let config: Config = toml::from_str(include_str!("../../storage/config.toml")).unwrap();
        assert!(config.validate().is_ok());

        let bundled: Vec<(SourceId, usize, usize, bool)> = config
            .sources
            .iter()
            .map(|s| (s.id, s.limit, s.terms_per_candidate, s.enabled))
            .collect();
        let defaults: Vec<(SourceId, usize, usize, bool)> = Config::default()
            .sources
            .iter()
            .map(|s| (s.id, s.limit, s.terms_per_candidate, s.enabled))
            .collect();
        assert_eq!(bundled, defaults);
    }
}
