// src/services/sources/html.rs

//! HTML page source adapter.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html};
use url::Url;

use super::SourceAdapter;
use super::rules::{ElementView, SelectionRule};
use crate::error::{AppError, Result};
use crate::models::{CandidateRecord, SourceConfig, SourceId};
use crate::utils::http::Fetcher;
use crate::utils::{char_len, normalize_whitespace, resolve_url};

/// Adapter for sources published as plain HTML pages.
pub struct HtmlSource {
    config: SourceConfig,
    rule: SelectionRule,
    min_title_length: usize,
    fetcher: Arc<dyn Fetcher>,
}

impl HtmlSource {
    pub fn new(
        config: SourceConfig,
        rule: SelectionRule,
        min_title_length: usize,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            config,
            rule,
            min_title_length,
            fetcher,
        }
    }
}

#[async_trait]
impl SourceAdapter for HtmlSource {
    fn source(&self) -> SourceId {
        self.config.id
    }

    async fn fetch(&self) -> Result<Vec<CandidateRecord>> {
        let html = self.fetcher.get_text(&self.config.url).await?;
        let page_url = Url::parse(&self.config.url)?;
        select_candidates(
            &html,
            &page_url,
            self.config.id,
            self.rule,
            self.config.limit,
            self.min_title_length,
        )
    }
}

/// Pick candidate titles from an HTML document.
///
/// Elements are visited in document order; the first `limit` accepted by
/// `rule` are kept, then titles shorter than `min_title_length` characters
/// are dropped. A page on which the rule accepts nothing is reported as a
/// parse error, since it usually means the site layout changed.
pub fn select_candidates(
    html: &str,
    page_url: &Url,
    source: SourceId,
    rule: SelectionRule,
    limit: usize,
    min_title_length: usize,
) -> Result<Vec<CandidateRecord>> {
    let document = Html::parse_document(html);

    let selected: Vec<(String, Option<String>)> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| {
            let value = element.value();
            let classes: Vec<&str> = value.classes().collect();
            let text = normalize_whitespace(&element.text().collect::<String>());
            let href = value.attr("href").map(str::trim).filter(|h| !h.is_empty());

            let view = ElementView {
                tag: value.name(),
                classes: &classes,
                text: &text,
                href,
            };
            rule(&view).then(|| (text.clone(), href.map(|h| resolve_url(page_url, h))))
        })
        .take(limit)
        .collect();

    if selected.is_empty() {
        return Err(AppError::parse(
            source.as_str(),
            format!("no elements matched the selection rule on {page_url}"),
        ));
    }

    let candidates: Vec<CandidateRecord> = selected
        .into_iter()
        .filter(|(title, _)| char_len(title) >= min_title_length)
        .map(|(title, link)| CandidateRecord::new(title, link, source))
        .collect();

    log::debug!("{}: {} candidate titles", source, candidates.len());
    Ok(candidates)
}
