use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Primary discriminator used by SES event publishing
pub const EVENT_TYPE_FIELD: &str = "eventType";
/// Discriminator used by legacy SES identity notifications
pub const NOTIFICATION_TYPE_FIELD: &str = "notificationType";

/// Untyped notification payload as delivered inside one SNS message.
///
/// Kept as a JSON object so the original document can be preserved verbatim
/// in the processed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawNotification(Map<String, Value>);

impl RawNotification {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Parse a notification from an SNS message body.
    ///
    /// Fails when the body is not JSON or is JSON but not an object.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Event kind as published, preferring `eventType` over `notificationType`
    pub fn event_type(&self) -> Option<&str> {
        self.str_field(EVENT_TYPE_FIELD)
            .or_else(|| self.str_field(NOTIFICATION_TYPE_FIELD))
    }

    /// True when the payload carries either discriminator
    pub fn has_event_type(&self) -> bool {
        self.event_type().is_some()
    }

    /// Copy the legacy `notificationType` into `eventType` when only the
    /// legacy field is present. Returns true if the payload was changed.
    pub fn promote_legacy_type(&mut self) -> bool {
        if self.str_field(EVENT_TYPE_FIELD).is_some() {
            return false;
        }
        match self.str_field(NOTIFICATION_TYPE_FIELD) {
            Some(legacy) => {
                let legacy = legacy.to_string();
                self.0
                    .insert(EVENT_TYPE_FIELD.to_string(), Value::String(legacy));
                true
            }
            None => false,
        }
    }

    /// Look up a string through a JSON pointer, e.g. `/mail/messageId`
    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.value_at(pointer).and_then(Value::as_str)
    }

    /// Look up any value through a JSON pointer
    pub fn value_at(&self, pointer: &str) -> Option<&Value> {
        let (head, rest) = split_pointer(pointer)?;
        let first = self.0.get(head)?;
        if rest.is_empty() {
            Some(first)
        } else {
            first.pointer(rest)
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for RawNotification {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn split_pointer(pointer: &str) -> Option<(&str, &str)> {
    let pointer = pointer.strip_prefix('/')?;
    match pointer.find('/') {
        Some(idx) => Some((&pointer[..idx], &pointer[idx..])),
        None => Some((pointer, "")),
    }
}
