use crate::cursor::parse_expected_cursor;
use crate::error::{LogClientError, LogClientResult, StoreError};
use crate::store::LogStore;
use crate::types::{AppendCursor, ExpectedCursor, LogDestination, LogEntry};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Writes records to one log stream, recovering from stale sequence tokens.
///
/// Appends issued through one client must not run concurrently for the same
/// stream; the caller processes records sequentially.
#[derive(Clone)]
pub struct LogClient {
    store: Arc<dyn LogStore>,
}

impl LogClient {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Create the log group and stream if they do not exist.
    ///
    /// "Already exists" counts as success. "Access denied" also counts as
    /// success: the destination is then assumed to be provisioned separately
    /// with only append rights granted to this process.
    pub async fn ensure_destination(&self, destination: &LogDestination) -> LogClientResult<()> {
        let group = self.store.create_log_group(&destination.log_group).await;
        accept_existing(group, "log group", &destination.log_group)?;

        let stream = self
            .store
            .create_log_stream(&destination.log_group, &destination.log_stream)
            .await;
        accept_existing(stream, "log stream", &destination.log_stream)?;

        Ok(())
    }

    /// Current upload sequence token of the destination stream.
    ///
    /// `None` when the stream has never been written to, or when the lookup
    /// fails; a wrong guess is corrected by the conflict retry in `append`.
    pub async fn fetch_cursor(&self, destination: &LogDestination) -> Option<AppendCursor> {
        match self
            .store
            .describe_log_streams(&destination.log_group, &destination.log_stream)
            .await
        {
            Ok(streams) => streams
                .into_iter()
                .find(|stream| stream.name == destination.log_stream)
                .and_then(|stream| stream.upload_sequence_token),
            Err(e) => {
                warn!(
                    destination = %destination,
                    error = %e,
                    "Failed to look up sequence token, appending without one"
                );
                None
            }
        }
    }

    /// Append one record as a single-entry batch.
    ///
    /// Returns `Ok(true)` once stored. A stale sequence token is retried once
    /// with the token the store reports; any other failure, an unreadable
    /// conflict or a failed retry returns `Ok(false)`. `Err` is reserved for
    /// records that cannot be serialized.
    pub async fn append<T>(&self, destination: &LogDestination, record: &T) -> LogClientResult<bool>
    where
        T: Serialize + ?Sized,
    {
        let message = serde_json::to_string(record)?;
        let cursor = self.fetch_cursor(destination).await;

        let first = self.submit(destination, &message, cursor).await;
        let (expected, detail) = match first {
            Ok(next) => {
                debug!(destination = %destination, next_cursor = ?next, "Record appended");
                return Ok(true);
            }
            Err(StoreError::SequenceTokenConflict { expected, message }) => (expected, message),
            Err(e) => {
                error!(destination = %destination, error = %e, "Failed to append record");
                return Ok(false);
            }
        };

        let expected = match expected
            .map(ExpectedCursor::Token)
            .or_else(|| parse_expected_cursor(&detail))
        {
            Some(expected) => expected,
            None => {
                error!(
                    destination = %destination,
                    detail = %detail,
                    "Sequence token conflict without a usable expected token"
                );
                return Ok(false);
            }
        };

        warn!(
            destination = %destination,
            expected = ?expected,
            "Sequence token conflict, retrying with expected token"
        );

        match self
            .submit(destination, &message, expected.into_cursor())
            .await
        {
            Ok(_) => {
                info!(destination = %destination, "Record appended after sequence token retry");
                Ok(true)
            }
            Err(e) => {
                error!(destination = %destination, error = %e, "Retry after sequence token conflict failed");
                Ok(false)
            }
        }
    }

    async fn submit(
        &self,
        destination: &LogDestination,
        message: &str,
        cursor: Option<AppendCursor>,
    ) -> Result<Option<AppendCursor>, StoreError> {
        let entry = LogEntry {
            timestamp_millis: Utc::now().timestamp_millis(),
            message: message.to_string(),
        };

        self.store
            .put_log_events(
                &destination.log_group,
                &destination.log_stream,
                vec![entry],
                cursor,
            )
            .await
    }
}

fn accept_existing(
    result: Result<(), StoreError>,
    resource: &str,
    name: &str,
) -> LogClientResult<()> {
    match result {
        Ok(()) => {
            info!(resource = %resource, name = %name, "Created");
            Ok(())
        }
        Err(StoreError::AlreadyExists(_)) => {
            debug!(resource = %resource, name = %name, "Already exists");
            Ok(())
        }
        Err(StoreError::AccessDenied(detail)) => {
            warn!(
                resource = %resource,
                name = %name,
                detail = %detail,
                "Not authorized to create, assuming it is provisioned"
            );
            Ok(())
        }
        Err(source) => Err(LogClientError::Setup {
            resource: format!("{resource} {name}"),
            source,
        }),
    }
}
