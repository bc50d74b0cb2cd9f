//! SES Event Logger - writes SES notifications from an SNS batch to CloudWatch Logs
//!
//! Usage: ses-event-logger [BATCH_FILE]
//!
//! Reads one SNS event batch (JSON) from BATCH_FILE or stdin, processes it as
//! a single invocation and prints the invocation response to stdout.
//!
//! Configuration comes from the environment (see `Config`); a `.env` file in
//! the working directory is loaded first.

use anyhow::{Context, Result};
use cloudwatch_logs::{CloudWatchLogStore, LogClient};
use ses_event_logger::{
    handle_invocation, telemetry, Config, Dispatcher, InvocationContext, SnsEvent,
};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;
    telemetry::init_tracing(config.log_format);

    info!(
        stage = %config.stage,
        region = %config.aws_region,
        log_group = %config.log_group(),
        log_stream = %config.log_stream_name,
        error_telemetry = config.telemetry_enabled(),
        "Starting SES event logger"
    );

    let store = CloudWatchLogStore::with_region(config.aws_region.clone()).await;
    let dispatcher = Dispatcher::new(LogClient::new(Arc::new(store)), config.destination());

    let input = read_batch(std::env::args().nth(1)).await?;
    let batch: SnsEvent = serde_json::from_str(&input).context("Invalid SNS event batch")?;

    let context = InvocationContext::generate();
    let response = match handle_invocation(&dispatcher, &batch, &context).await {
        Ok(response) => response,
        Err(e) => {
            error!(request_id = %context.request_id, error = %e, "Invocation failed");
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

async fn read_batch(path: Option<String>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read batch file {path}")),
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("Failed to read batch from stdin")?;
            Ok(input)
        }
    }
}
