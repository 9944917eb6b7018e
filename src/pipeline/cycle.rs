// src/pipeline/cycle.rs

//! One harvesting cycle over every configured source.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ErrorKind, Result};
use crate::models::{CandidateRecord, Config, PipelineConfig, SourceId, TermDictionary};
use crate::services::{
    KeywordExtractor, KeywordGateway, MyMemoryTranslator, SourceAdapter, Translator,
    build_adapters,
};
use crate::storage::KeywordStore;
use crate::utils::http::Fetcher;
use crate::utils::truncate_chars;

/// Summary of one cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Candidates that yielded at least one term, per source
    pub processed_by_source: BTreeMap<SourceId, usize>,
    /// New records written across all sources
    pub records_written: usize,
    /// Sources whose fetch failed this cycle
    pub failures: BTreeMap<SourceId, ErrorKind>,
}

impl CycleReport {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            processed_by_source: BTreeMap::new(),
            records_written: 0,
            failures: BTreeMap::new(),
        }
    }

    pub fn total_processed(&self) -> usize {
        self.processed_by_source.values().sum()
    }
}

/// Source adapter plus the number of extracted terms saved per candidate.
pub struct ConfiguredSource {
    pub adapter: Box<dyn SourceAdapter>,
    pub terms_per_candidate: usize,
}

/// Drives sources, extractor and gateway through one cycle.
pub struct Pipeline {
    sources: Vec<ConfiguredSource>,
    extractor: KeywordExtractor,
    gateway: KeywordGateway,
    max_keyword_length: usize,
    request_delay: Duration,
}

impl Pipeline {
    pub fn new(
        sources: Vec<ConfiguredSource>,
        extractor: KeywordExtractor,
        gateway: KeywordGateway,
        pipeline: &PipelineConfig,
        request_delay: Duration,
    ) -> Self {
        Self {
            sources,
            extractor,
            gateway,
            max_keyword_length: pipeline.max_keyword_length,
            request_delay,
        }
    }

    /// Assemble a pipeline for every enabled source in `config`.
    pub fn from_config(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        gateway: KeywordGateway,
    ) -> Result<Self> {
        let adapters = build_adapters(config, fetcher)?;
        let sources = config
            .enabled_sources()
            .zip(adapters)
            .map(|(source, adapter)| ConfiguredSource {
                adapter,
                terms_per_candidate: source.terms_per_candidate,
            })
            .collect();
        let extractor = KeywordExtractor::new(&TermDictionary::default())?;

        Ok(Self::new(
            sources,
            extractor,
            gateway,
            &config.pipeline,
            Duration::from_millis(config.crawler.request_delay_ms),
        ))
    }

    /// Process every source once, in order.
    ///
    /// A failing source is recorded in the report and skipped; it never
    /// prevents the remaining sources from running.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::new();
        log::info!("Starting cycle over {} sources", self.sources.len());

        for (i, source) in self.sources.iter().enumerate() {
            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let id = source.adapter.source();
            let candidates = match source.adapter.fetch().await {
                Ok(candidates) => candidates,
                Err(e) => {
                    log::error!("{} crawling failed ({}): {}", id, e.kind(), e);
                    report.failures.insert(id, e.kind());
                    report.processed_by_source.insert(id, 0);
                    continue;
                }
            };

            let mut processed = 0;
            for candidate in &candidates {
                let (handled, written) = self
                    .process_candidate(candidate, source.terms_per_candidate)
                    .await;
                if handled {
                    processed += 1;
                }
                report.records_written += written;
            }

            log::info!("{}: {} processed", id, processed);
            report.processed_by_source.insert(id, processed);
        }

        report.finished_at = Utc::now();
        log::info!(
            "Cycle finished: {} processed, {} new records, {} failed sources",
            report.total_processed(),
            report.records_written,
            report.failures.len()
        );
        report
    }

    /// Save the title and its leading terms.
    ///
    /// Returns whether the candidate counted as processed, and how many
    /// records were written for it.
    async fn process_candidate(
        &self,
        candidate: &CandidateRecord,
        terms_per_candidate: usize,
    ) -> (bool, usize) {
        let terms = self.extractor.extract(&candidate.raw_text);
        if terms.is_empty() {
            return (false, 0);
        }

        let category = candidate.source_id.category();
        let title = truncate_chars(&candidate.raw_text, self.max_keyword_length);
        let mut written = 0;

        if self
            .gateway
            .save_if_new(
                &title,
                category,
                candidate.source_id,
                candidate.source_url.as_deref(),
            )
            .await
        {
            written += 1;
        }

        for term in terms.iter().take(terms_per_candidate) {
            if self
                .gateway
                .save_if_new(term, category, candidate.source_id, None)
                .await
            {
                written += 1;
            }
        }

        (true, written)
    }
}

/// Gateway over `store`, translating through MyMemory when enabled.
pub fn build_gateway(config: &Config, store: Arc<dyn KeywordStore>) -> Result<KeywordGateway> {
    let translator: Option<Arc<dyn Translator>> = if config.translation.enabled {
        Some(Arc::new(MyMemoryTranslator::new(&config.translation)?))
    } else {
        None
    };
    Ok(KeywordGateway::new(
        store,
        translator,
        config.translation.clone(),
    ))
}
