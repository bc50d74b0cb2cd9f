use crate::error::StoreError;
use crate::types::{AppendCursor, LogEntry, LogStreamSummary};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs::config::Region;
use aws_sdk_cloudwatchlogs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudwatchlogs::operation::put_log_events::PutLogEventsError;
use aws_sdk_cloudwatchlogs::types::InputLogEvent;
use aws_sdk_cloudwatchlogs::Client;
use std::fmt::Debug;
use tracing::{debug, info};

/// Append-only log store operations used by [`crate::LogClient`].
///
/// Implementations must report a stale sequence token as
/// [`StoreError::SequenceTokenConflict`] so the client can recover.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn create_log_group(&self, log_group: &str) -> Result<(), StoreError>;

    async fn create_log_stream(&self, log_group: &str, log_stream: &str)
        -> Result<(), StoreError>;

    /// List streams of `log_group` whose name starts with `prefix`
    async fn describe_log_streams(
        &self,
        log_group: &str,
        prefix: &str,
    ) -> Result<Vec<LogStreamSummary>, StoreError>;

    /// Append `entries` in one batch. Returns the next sequence token.
    async fn put_log_events(
        &self,
        log_group: &str,
        log_stream: &str,
        entries: Vec<LogEntry>,
        cursor: Option<AppendCursor>,
    ) -> Result<Option<AppendCursor>, StoreError>;
}

/// [`LogStore`] backed by the AWS CloudWatch Logs SDK
#[derive(Clone)]
pub struct CloudWatchLogStore {
    client: Client,
}

impl CloudWatchLogStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a store with credentials and region from the environment
    ///
    /// Uses the default AWS provider chain (environment variables, shared
    /// credentials file, container or instance role).
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        info!(region = ?config.region(), "Initialized CloudWatch Logs client");
        Self::new(Client::new(&config))
    }

    /// Create a store pinned to `region`
    pub async fn with_region(region: impl Into<String>) -> Self {
        let region = region.into();
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;
        info!(region = %region, "Initialized CloudWatch Logs client");
        Self::new(Client::new(&config))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl LogStore for CloudWatchLogStore {
    async fn create_log_group(&self, log_group: &str) -> Result<(), StoreError> {
        match self
            .client
            .create_log_group()
            .log_group_name(log_group)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_already_exists_exception()) =>
            {
                Err(StoreError::AlreadyExists(log_group.to_string()))
            }
            Err(err) => Err(service_failure(&err)),
        }
    }

    async fn create_log_stream(
        &self,
        log_group: &str,
        log_stream: &str,
    ) -> Result<(), StoreError> {
        match self
            .client
            .create_log_stream()
            .log_group_name(log_group)
            .log_stream_name(log_stream)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_already_exists_exception()) =>
            {
                Err(StoreError::AlreadyExists(format!("{log_group}:{log_stream}")))
            }
            Err(err) => Err(service_failure(&err)),
        }
    }

    async fn describe_log_streams(
        &self,
        log_group: &str,
        prefix: &str,
    ) -> Result<Vec<LogStreamSummary>, StoreError> {
        let output = self
            .client
            .describe_log_streams()
            .log_group_name(log_group)
            .log_stream_name_prefix(prefix)
            .send()
            .await
            .map_err(|err| service_failure(&err))?;

        let streams: Vec<LogStreamSummary> = output
            .log_streams()
            .iter()
            .map(|stream| LogStreamSummary {
                name: stream.log_stream_name().unwrap_or_default().to_string(),
                upload_sequence_token: stream.upload_sequence_token().map(AppendCursor::from),
            })
            .collect();

        debug!(log_group = %log_group, prefix = %prefix, count = streams.len(), "Described log streams");

        Ok(streams)
    }

    async fn put_log_events(
        &self,
        log_group: &str,
        log_stream: &str,
        entries: Vec<LogEntry>,
        cursor: Option<AppendCursor>,
    ) -> Result<Option<AppendCursor>, StoreError> {
        let events = entries
            .into_iter()
            .map(|entry| {
                InputLogEvent::builder()
                    .timestamp(entry.timestamp_millis)
                    .message(entry.message)
                    .build()
                    .map_err(|e| StoreError::Other(format!("Invalid log event: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .client
            .put_log_events()
            .log_group_name(log_group)
            .log_stream_name(log_stream)
            .set_log_events(Some(events))
            .set_sequence_token(cursor.map(AppendCursor::into_inner))
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(PutLogEventsError::InvalidSequenceTokenException(conflict)) => {
                    StoreError::SequenceTokenConflict {
                        expected: conflict.expected_sequence_token().map(AppendCursor::from),
                        message: conflict.message().unwrap_or_default().to_string(),
                    }
                }
                _ => service_failure(&err),
            })?;

        Ok(output.next_sequence_token().map(AppendCursor::from))
    }
}

/// Map an SDK failure that has no dedicated variant
fn service_failure<E, R>(err: &SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    let message = DisplayErrorContext(err).to_string();
    match err.as_service_error() {
        Some(service) => {
            let code = service.code().unwrap_or("Unknown");
            if is_access_denied(code) {
                StoreError::AccessDenied(message)
            } else {
                StoreError::Service {
                    code: code.to_string(),
                    message,
                }
            }
        }
        None => StoreError::Other(message),
    }
}

fn is_access_denied(code: &str) -> bool {
    matches!(
        code,
        "AccessDeniedException" | "AccessDenied" | "UnauthorizedOperation"
    )
}
