// src/pipeline/report.rs

//! Read-only keyword reports.

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::StoredKeyword;
use crate::storage::KeywordStore;

/// Keywords created within a recent window.
#[derive(Debug, Clone, Serialize)]
pub struct RecentKeywords {
    pub count: usize,
    pub keywords: Vec<StoredKeyword>,
}

/// Records created within the last `days` days, newest first.
///
/// A window that is not positive, or reaches past the representable
/// date range, is a configuration error.
pub async fn recent_keywords(
    store: &dyn KeywordStore,
    days: i64,
    active_only: bool,
) -> Result<RecentKeywords> {
    if days <= 0 {
        return Err(AppError::config(format!(
            "recent window must be at least one day, got {}",
            days
        )));
    }
    let since = Duration::try_days(days)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| AppError::config(format!("recent window of {} days is out of range", days)))?;
    let mut keywords = store.created_since(since, active_only).await?;
    keywords.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));

    Ok(RecentKeywords {
        count: keywords.len(),
        keywords,
    })
}
