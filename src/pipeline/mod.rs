//! Pipeline entry points.
//!
//! - `Pipeline::run_cycle`: harvest every source once
//! - `recent_keywords`: read-only report over the store

mod cycle;
mod report;

pub use cycle::{ConfiguredSource, CycleReport, Pipeline, build_gateway};
pub use report::{RecentKeywords, recent_keywords};
