// src/services/sources/mod.rs

//! Source adapters: one per site or feed, each yielding candidate titles.

mod feed;
mod html;
pub mod rules;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{CandidateRecord, Config, SourceId, SourceKind};
use crate::utils::http::Fetcher;

pub use feed::{FeedEntry, FeedSource, parse_feed};
pub use html::{HtmlSource, select_candidates};
pub use rules::{ElementView, SelectionRule};

/// A site or feed that yields candidate titles.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which source this adapter reads.
    fn source(&self) -> SourceId;

    /// Fetch and select candidates, reporting failures to the caller.
    async fn fetch(&self) -> Result<Vec<CandidateRecord>>;

    /// Fetch candidates; any failure is logged and yields an empty list.
    async fn fetch_candidates(&self) -> Vec<CandidateRecord> {
        match self.fetch().await {
            Ok(candidates) => candidates,
            Err(e) => {
                log::error!("{} crawling failed ({}): {}", self.source(), e.kind(), e);
                Vec::new()
            }
        }
    }
}

/// Build adapters for every enabled source, in processing order.
pub fn build_adapters(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
) -> Result<Vec<Box<dyn SourceAdapter>>> {
    let min_title_length = config.pipeline.min_title_length;

    config
        .enabled_sources()
        .into_iter()
        .map(|source| -> Result<Box<dyn SourceAdapter>> {
            let source = source.clone();
            match source.id.kind() {
                SourceKind::Html => {
                    let rule = rules::rule_for(source.id).ok_or_else(|| {
                        AppError::config(format!("No selection rule for {}", source.id))
                    })?;
                    Ok(Box::new(HtmlSource::new(
                        source,
                        rule,
                        min_title_length,
                        fetcher.clone(),
                    )))
                }
                SourceKind::Feed => Ok(Box::new(FeedSource::new(
                    source,
                    min_title_length,
                    fetcher.clone(),
                ))),
            }
        })
        .collect()
}
