// src/services/sources/feed.rs

//! RSS 2.0 / Atom feed source adapter.

use std::sync::Arc;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use url::Url;

use super::SourceAdapter;
use crate::error::{AppError, Result};
use crate::models::{CandidateRecord, SourceConfig, SourceId};
use crate::utils::http::Fetcher;
use crate::utils::{char_len, normalize_whitespace, resolve_url};

/// One `<item>` or `<entry>` of a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: Option<String>,
}

/// Adapter for sources published as RSS or Atom feeds.
pub struct FeedSource {
    config: SourceConfig,
    min_title_length: usize,
    fetcher: Arc<dyn Fetcher>,
}

impl FeedSource {
    pub fn new(config: SourceConfig, min_title_length: usize, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            min_title_length,
            fetcher,
        }
    }
}

#[async_trait]
impl SourceAdapter for FeedSource {
    fn source(&self) -> SourceId {
        self.config.id
    }

    async fn fetch(&self) -> Result<Vec<CandidateRecord>> {
        let xml = self.fetcher.get_text(&self.config.url).await?;
        let feed_url = Url::parse(&self.config.url)?;
        let entries = parse_feed(&xml).map_err(|e| match e {
            AppError::Parse { message, .. } => AppError::parse(self.config.id.as_str(), message),
            other => other,
        })?;

        let candidates: Vec<CandidateRecord> = entries
            .into_iter()
            .take(self.config.limit)
            .filter(|entry| char_len(&entry.title) >= self.min_title_length)
            .map(|entry| {
                let link = entry.link.map(|l| resolve_url(&feed_url, &l));
                CandidateRecord::new(entry.title, link, self.config.id)
            })
            .collect();

        log::debug!("{}: {} candidate titles", self.config.id, candidates.len());
        Ok(candidates)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
}

/// Namespace prefix of an element name, if any.
fn prefix_of(name: QName<'_>) -> Option<Vec<u8>> {
    name.prefix().map(|p| p.as_ref().to_vec())
}

/// Parse an RSS 2.0, RSS 1.0 (RDF) or Atom document into its entries, in
/// document order. Entries without a title are skipped.
///
/// Only `title` and `link` children in the entry's own namespace prefix are
/// read, so extension elements such as `media:title` never replace the
/// headline.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let mut reader = Reader::from_str(xml);

    let mut entries = Vec::new();
    let mut saw_root = false;
    let mut current: Option<FeedEntry> = None;
    let mut entry_prefix: Option<Vec<u8>> = None;
    let mut field: Option<Field> = None;
    let mut buf = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            AppError::parse(
                "feed",
                format!("malformed XML at byte {}: {}", reader.error_position(), e),
            )
        })?;

        match event {
            Event::Start(e) => {
                let name = e.local_name();
                let in_entry = current.is_some() && prefix_of(e.name()) == entry_prefix;
                match name.as_ref() {
                    b"rss" | b"RDF" | b"feed" => saw_root = true,
                    b"item" | b"entry" => {
                        current = Some(FeedEntry::default());
                        entry_prefix = prefix_of(e.name());
                    }
                    b"title" if in_entry => {
                        field = Some(Field::Title);
                        buf.clear();
                    }
                    b"link" if in_entry => {
                        if let Some(entry) = current.as_mut() {
                            take_atom_link(entry, &e);
                        }
                        field = Some(Field::Link);
                        buf.clear();
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"link" && prefix_of(e.name()) == entry_prefix {
                    if let Some(entry) = current.as_mut() {
                        take_atom_link(entry, &e);
                    }
                }
            }
            Event::Text(t) if field.is_some() => buf.push_str(&String::from_utf8_lossy(&t)),
            Event::CData(t) if field.is_some() => buf.push_str(&String::from_utf8_lossy(&t)),
            Event::GeneralRef(r) if field.is_some() => {
                let name = String::from_utf8_lossy(&r);
                match resolve_entity(&name) {
                    Some(text) => buf.push_str(&text),
                    None => {
                        buf.push('&');
                        buf.push_str(&name);
                        buf.push(';');
                    }
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                if matches!(name.as_ref(), b"item" | b"entry") {
                    if let Some(entry) = current.take() {
                        if !entry.title.is_empty() {
                            entries.push(entry);
                        }
                    }
                    field = None;
                    continue;
                }
                if prefix_of(e.name()) != entry_prefix {
                    continue;
                }
                match (name.as_ref(), field, current.as_mut()) {
                    (b"title", Some(Field::Title), Some(entry)) => {
                        if entry.title.is_empty() {
                            entry.title = normalize_whitespace(&buf);
                        }
                        field = None;
                    }
                    (b"link", Some(Field::Link), Some(entry)) => {
                        let link = buf.trim();
                        if entry.link.is_none() && !link.is_empty() {
                            entry.link = Some(link.to_string());
                        }
                        field = None;
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(AppError::parse("feed", "document is neither RSS nor Atom"));
    }
    Ok(entries)
}

/// Atom `<link href="..."/>`; only alternate links count.
fn take_atom_link(entry: &mut FeedEntry, element: &BytesStart<'_>) {
    if entry.link.is_some() {
        return;
    }
    let rel = element
        .try_get_attribute("rel")
        .ok()
        .flatten()
        .map(|a| String::from_utf8_lossy(&a.value).into_owned());
    if rel.as_deref().is_some_and(|r| r != "alternate") {
        return;
    }
    if let Ok(Some(href)) = element.try_get_attribute("href") {
        let raw = String::from_utf8_lossy(&href.value).into_owned();
        let value = quick_xml::escape::unescape(&raw)
            .map(|v| v.into_owned())
            .unwrap_or(raw);
        let value = value.trim();
        if !value.is_empty() {
            entry.link = Some(value.to_string());
        }
    }
}

/// Text of a predefined XML entity or a numeric character reference.
fn resolve_entity(name: &str) -> Option<String> {
    if let Some(text) = resolve_predefined_entity(name) {
        return Some(text.to_string());
    }
    let code = name.strip_prefix('#')?;
    let value = match code.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => code.parse().ok()?,
    };
    char::from_u32(value).map(String::from)
}
