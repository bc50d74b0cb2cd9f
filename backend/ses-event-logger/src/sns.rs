//! SNS event batch as delivered to the function entry point
//!
//! Every field is optional so one malformed record cannot fail
//! deserialization of the whole batch.
use serde::{Deserialize, Serialize};

/// `EventSource` of records delivered by SNS
pub const SNS_EVENT_SOURCE: &str = "aws:sns";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsEvent {
    #[serde(default)]
    pub records: Vec<SnsEventRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsEventRecord {
    #[serde(default)]
    pub event_source: Option<String>,
    #[serde(default)]
    pub event_version: Option<String>,
    #[serde(default)]
    pub event_subscription_arn: Option<String>,
    #[serde(default)]
    pub sns: Option<SnsMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsMessage {
    #[serde(default, rename = "Type")]
    pub message_type: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub topic_arn: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    /// Embedded SES notification, JSON text
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SnsEventRecord {
    pub fn is_from_sns(&self) -> bool {
        self.event_source.as_deref() == Some(SNS_EVENT_SOURCE)
    }

    pub fn message(&self) -> Option<&str> {
        self.sns.as_ref().and_then(|sns| sns.message.as_deref())
    }

    pub fn message_id(&self) -> Option<&str> {
        self.sns.as_ref().and_then(|sns| sns.message_id.as_deref())
    }
}
