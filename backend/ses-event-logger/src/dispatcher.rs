use crate::error::{DispatchError, DispatchResult};
use crate::sns::{SnsEvent, SnsEventRecord};
use cloudwatch_logs::{LogClient, LogDestination};
use event_schema::{normalize, RawNotification};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Result of processing one batch record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Appended,
    /// Append failed after the allowed retry; the record is dropped
    Failed,
    /// Not an SNS record, or not an SES event notification
    Skipped,
    /// Embedded message is not a JSON object
    DecodeFailed,
}

/// Per-invocation counters, logged once the batch is done
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub received: usize,
    pub appended: usize,
    pub failed: usize,
    pub skipped: usize,
    pub decode_failures: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Appended => self.appended += 1,
            RecordOutcome::Failed => self.failed += 1,
            RecordOutcome::Skipped => self.skipped += 1,
            RecordOutcome::DecodeFailed => self.decode_failures += 1,
        }
    }
}

/// Routes SES notifications from an SNS batch into the event log.
///
/// Built once per process. Records are handled one at a time so appends to
/// the stream never race on its sequence token.
pub struct Dispatcher {
    log_client: LogClient,
    destination: LogDestination,
}

impl Dispatcher {
    pub fn new(log_client: LogClient, destination: LogDestination) -> Self {
        Self {
            log_client,
            destination,
        }
    }

    pub fn destination(&self) -> &LogDestination {
        &self.destination
    }

    /// Process one batch.
    ///
    /// The destination is ensured before any record is looked at. Bad or
    /// irrelevant records and failed appends are logged and skipped; only
    /// setup failures and unserializable records abort the batch.
    pub async fn handle(&self, batch: &SnsEvent) -> DispatchResult<BatchSummary> {
        self.log_client
            .ensure_destination(&self.destination)
            .await
            .map_err(DispatchError::Setup)?;

        let mut summary = BatchSummary {
            received: batch.records.len(),
            ..Default::default()
        };

        for (index, record) in batch.records.iter().enumerate() {
            let outcome = self.process_record(index, record).await?;
            summary.record(outcome);
        }

        Ok(summary)
    }

    async fn process_record(
        &self,
        index: usize,
        record: &SnsEventRecord,
    ) -> DispatchResult<RecordOutcome> {
        if !record.is_from_sns() {
            debug!(
                index,
                event_source = ?record.event_source,
                "Skipping record from unexpected source"
            );
            return Ok(RecordOutcome::Skipped);
        }

        let body = record.message().unwrap_or_default();
        let mut notification = match RawNotification::from_json(body) {
            Ok(notification) => notification,
            Err(e) => {
                warn!(
                    index,
                    sns_message_id = ?record.message_id(),
                    error = %e,
                    "Failed to decode SNS message, skipping record"
                );
                return Ok(RecordOutcome::DecodeFailed);
            }
        };

        if !notification.has_event_type() {
            debug!(
                index,
                sns_message_id = ?record.message_id(),
                "Not an SES event notification, skipping record"
            );
            return Ok(RecordOutcome::Skipped);
        }

        notification.promote_legacy_type();
        let event = normalize(&notification);

        let stored = self
            .log_client
            .append(&self.destination, &event)
            .await
            .map_err(|source| DispatchError::Append { index, source })?;

        if stored {
            info!(
                index,
                message_id = %event.message_id,
                event_type = %event.event_type,
                "SES event logged"
            );
            Ok(RecordOutcome::Appended)
        } else {
            error!(
                index,
                message_id = %event.message_id,
                event_type = %event.event_type,
                destination = %self.destination,
                "Failed to log SES event, record dropped"
            );
            Ok(RecordOutcome::Failed)
        }
    }
}
