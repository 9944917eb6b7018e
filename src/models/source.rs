// src/models/source.rs

//! Source identifiers and their categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// External site or feed that candidates are harvested from.
///
/// Declaration order is the processing order of a crawl cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Huggingface,
    Paperswithcode,
    Techcrunch,
    Ainews,
    Reddit,
    Hackernews,
}

/// How a source publishes its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// HTML page scanned with a selection rule
    Html,
    /// RSS or Atom feed
    Feed,
}

impl SourceId {
    /// All sources in processing order.
    pub const ALL: [SourceId; 6] = [
        SourceId::Huggingface,
        SourceId::Paperswithcode,
        SourceId::Techcrunch,
        SourceId::Ainews,
        SourceId::Reddit,
        SourceId::Hackernews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Huggingface => "huggingface",
            SourceId::Paperswithcode => "paperswithcode",
            SourceId::Techcrunch => "techcrunch",
            SourceId::Ainews => "ainews",
            SourceId::Reddit => "reddit",
            SourceId::Hackernews => "hackernews",
        }
    }

    /// Category every keyword from this source is filed under.
    pub fn category(&self) -> Category {
        match self {
            SourceId::Huggingface => Category::Model,
            SourceId::Paperswithcode => Category::Paper,
            SourceId::Techcrunch => Category::App,
            SourceId::Ainews | SourceId::Reddit => Category::Community,
            SourceId::Hackernews => Category::Code,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceId::Huggingface | SourceId::Paperswithcode | SourceId::Ainews => {
                SourceKind::Html
            }
            SourceId::Techcrunch | SourceId::Reddit | SourceId::Hackernews => SourceKind::Feed,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::config(format!("Unknown source '{s}'")))
    }
}

/// Display category of a keyword.
///
/// Serialized with the labels the digest front end groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "모델", alias = "model")]
    Model,
    #[serde(rename = "논문/학회", alias = "paper")]
    Paper,
    #[serde(rename = "서비스/앱", alias = "app")]
    App,
    #[serde(rename = "커뮤니티 이슈", alias = "community")]
    Community,
    #[serde(rename = "실습/코드", alias = "code")]
    Code,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Model => "모델",
            Category::Paper => "논문/학회",
            Category::App => "서비스/앱",
            Category::Community => "커뮤니티 이슈",
            Category::Code => "실습/코드",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
