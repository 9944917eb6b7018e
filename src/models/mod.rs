// src/models/mod.rs

//! Domain models for the keyword pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod keyword;
mod source;
mod terms;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, PipelineConfig, SourceConfig, StorageConfig, TranslationConfig,
};
pub use keyword::{CandidateRecord, KeywordRecord, StoredKeyword};
pub use source::{Category, SourceId, SourceKind};
pub use terms::{DEFAULT_TERMS, TermDictionary, TermEntry};
