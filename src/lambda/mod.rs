// src/lambda/mod.rs

//! AWS Lambda handler for the keyword pipeline.
//!
//! One function serves both triggers:
//! 1. The weekly EventBridge schedule and on-demand calls run a full cycle
//!    (`{"action": "crawl"}`, also the default for an empty payload)
//! 2. `{"action": "keywords"}` returns the active keywords of the last week
//!
//! Configuration problems surface from [`LambdaState::from_env`] at cold
//! start, before any cycle runs.

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::{CycleReport, Pipeline, build_gateway, recent_keywords};
use crate::storage::{KeywordStore, S3Store};
use crate::utils::http::HttpFetcher;

/// Requested operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Crawl,
    Keywords,
}

/// Lambda invocation payload.
#[derive(Debug, Default, Deserialize)]
pub struct KeywordRequest {
    #[serde(default)]
    pub action: Action,
}

/// Response of a crawl invocation.
#[derive(Debug, Serialize)]
pub struct CrawlResponse {
    pub status: &'static str,
    pub report: CycleReport,
    /// Records created in the last week, active or not
    pub weekly_count: usize,
    pub execution_time_ms: u64,
}

/// Shared state built once per cold start.
pub struct LambdaState {
    pub config: Config,
    pub store: Arc<dyn KeywordStore>,
}

impl LambdaState {
    /// Default configuration with environment overrides, S3 as the store.
    pub async fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;

        let store = S3Store::from_env(&config.storage.file_name).await?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }
}

/// Main Lambda handler function.
#[instrument(skip(state, event))]
pub async fn handler(
    state: &LambdaState,
    event: LambdaEvent<Value>,
) -> std::result::Result<Value, LambdaError> {
    let (payload, _context) = event.into_parts();

    match dispatch(state, payload).await {
        Ok(body) => Ok(body),
        Err(e) => {
            error!("Invocation failed ({}): {}", e.kind(), e);
            Ok(json!({
                "status": "error",
                "message": e.to_string(),
            }))
        }
    }
}

/// Scheduled events carry their own fields and no `action`; they run a crawl.
fn parse_request(payload: Value) -> Result<KeywordRequest> {
    if payload.is_null() {
        return Ok(KeywordRequest::default());
    }
    Ok(serde_json::from_value(payload)?)
}

async fn dispatch(state: &LambdaState, payload: Value) -> Result<Value> {
    let request = parse_request(payload)?;
    info!("Received action: {:?}", request.action);

    match request.action {
        Action::Crawl => run_crawl(state).await,
        Action::Keywords => run_keywords(state).await,
    }
}

async fn run_crawl(state: &LambdaState) -> Result<Value> {
    let start = std::time::Instant::now();

    let fetcher = Arc::new(HttpFetcher::from_config(&state.config.crawler)?);
    let gateway = build_gateway(&state.config, state.store.clone())?;
    let pipeline = Pipeline::from_config(&state.config, fetcher, gateway)?;

    let report = pipeline.run_cycle().await;
    let weekly = recent_keywords(state.store.as_ref(), state.config.pipeline.recent_days, false)
        .await?;
    info!("Keywords collected this week: {}", weekly.count);

    let response = CrawlResponse {
        status: "success",
        report,
        weekly_count: weekly.count,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };
    Ok(serde_json::to_value(response)?)
}

async fn run_keywords(state: &LambdaState) -> Result<Value> {
    let recent =
        recent_keywords(state.store.as_ref(), state.config.pipeline.recent_days, true).await?;
    Ok(serde_json::to_value(recent)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parsing() {
        let crawl: KeywordRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(crawl.action, Action::Crawl);

        let keywords: KeywordRequest =
            serde_json::from_value(json!({"action": "keywords"})).unwrap();
        assert_eq!(keywords.action, Action::Keywords);

        assert!(parse_request(json!({"action": "purge"})).is_err());
    }

    #[test]
    fn test_scheduled_event_runs_crawl() {
        let event = json!({
            "version": "0",
            "detail-type": "Scheduled Event",
            "source": "aws.events",
            "detail": {}
        });
        assert_eq!(parse_request(event).unwrap().action, Action::Crawl);
        assert_eq!(parse_request(Value::Null).unwrap().action, Action::Crawl);
    }
}
