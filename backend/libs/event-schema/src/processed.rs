use crate::kind::EventKind;
use serde::Serialize;
use serde_json::Value;

/// Normalized SES event, the body of one log entry.
///
/// Field order is the serialized order: base fields, then the
/// kind-specific details, then the untouched source payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedEvent {
    /// Time the record was built (not the SES event time)
    pub timestamp: String,
    pub message_id: String,
    pub event_type: EventKind,
    pub recipient: String,
    pub source: String,
    pub subject: String,
    #[serde(flatten)]
    pub details: EventDetails,
    pub raw_event: Value,
}

impl ProcessedEvent {
    /// Serialize to the JSON text stored in the log stream
    pub fn to_log_message(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Kind-specific fields, flattened into the processed record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventDetails {
    Bounce(BounceDetails),
    Complaint(ComplaintDetails),
    Delivery(DeliveryDetails),
    Reject(RejectDetails),
    RenderingFailure(RenderingFailureDetails),
    /// Send events and unrecognized kinds
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BounceDetails {
    pub bounce_type: String,
    pub bounce_sub_type: String,
    pub bounced_recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetails {
    pub complaint_feedback_type: String,
    pub complained_recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub processing_time_millis: i64,
    pub smtp_response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectDetails {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderingFailureDetails {
    pub error_message: String,
    pub template_name: String,
}
