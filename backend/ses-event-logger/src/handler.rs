use crate::dispatcher::Dispatcher;
use crate::error::DispatchResult;
use crate::sns::SnsEvent;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

/// Per-invocation metadata supplied by the caller
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Context with a fresh random request id
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}

/// Value returned to the transport; per-record failures are not reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }
}

/// Entry point for one delivered batch
#[instrument(
    skip_all,
    fields(request_id = %context.request_id, records = batch.records.len())
)]
pub async fn handle_invocation(
    dispatcher: &Dispatcher,
    batch: &SnsEvent,
    context: &InvocationContext,
) -> DispatchResult<InvocationResponse> {
    let summary = dispatcher.handle(batch).await?;

    info!(
        destination = %dispatcher.destination(),
        received = summary.received,
        appended = summary.appended,
        failed = summary.failed,
        skipped = summary.skipped,
        decode_failures = summary.decode_failures,
        "Batch processed"
    );

    Ok(InvocationResponse::ok(format!(
        "Processed {} SES event notification(s)",
        summary.received
    )))
}
