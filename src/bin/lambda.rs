//! AWS Lambda entry point for the keyword pipeline
//!
//! Deploy with `cargo lambda build --release --features lambda`
//! and attach a weekly EventBridge schedule.

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aiweekly::lambda::{LambdaState, handler};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("aiweekly Lambda starting...");

    let state = match LambdaState::from_env().await {
        Ok(state) => state,
        Err(e) => {
            error!("Initialization failed: {}", e);
            return Err(e.into());
        }
    };
    let state = &state;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(state, event).await
    }))
    .await
}
