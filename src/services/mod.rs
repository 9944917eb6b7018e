//! Service layer for the keyword pipeline.
//!
//! This module contains the business logic for:
//! - Keyword extraction (`KeywordExtractor`)
//! - Keyword translation (`Translator`, `MyMemoryTranslator`)
//! - Dedup and persistence (`KeywordGateway`)
//! - Per-site candidate harvesting (`SourceAdapter`)

mod extractor;
mod gateway;
pub mod sources;
mod translator;

pub use extractor::KeywordExtractor;
pub use gateway::{KeywordGateway, SaveOutcome};
pub use sources::{FeedSource, HtmlSource, SourceAdapter, build_adapters};
pub use translator::{MyMemoryTranslator, Translator};
