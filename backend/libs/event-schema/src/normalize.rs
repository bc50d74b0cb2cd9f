use crate::kind::EventKind;
use crate::processed::{
    BounceDetails, ComplaintDetails, DeliveryDetails, EventDetails, ProcessedEvent,
    RejectDetails, RenderingFailureDetails,
};
use crate::raw::RawNotification;
use crate::UNKNOWN;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Build a processed record stamped with the current time.
pub fn normalize(raw: &RawNotification) -> ProcessedEvent {
    normalize_at(raw, Utc::now())
}

/// Build a processed record stamped with `now`.
///
/// Never fails: every missing string becomes `"unknown"`, every missing
/// list becomes empty and a missing processing time becomes 0.
pub fn normalize_at(raw: &RawNotification, now: DateTime<Utc>) -> ProcessedEvent {
    let kind = EventKind::parse(raw.event_type().unwrap_or(UNKNOWN));
    let details = extract_details(&kind, raw);

    ProcessedEvent {
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        message_id: text(raw, "/mail/messageId"),
        event_type: kind,
        recipient: raw
            .value_at("/mail/destination")
            .and_then(Value::as_array)
            .and_then(|destinations| destinations.iter().find_map(Value::as_str))
            .unwrap_or(UNKNOWN)
            .to_string(),
        source: text(raw, "/mail/source"),
        subject: raw
            .str_at("/mail/commonHeaders/subject")
            .or_else(|| raw.str_at("/mail/subject"))
            .unwrap_or(UNKNOWN)
            .to_string(),
        details,
        raw_event: raw.clone().into_value(),
    }
}

fn extract_details(kind: &EventKind, raw: &RawNotification) -> EventDetails {
    match kind {
        EventKind::Bounce => EventDetails::Bounce(BounceDetails {
            bounce_type: text(raw, "/bounce/bounceType"),
            bounce_sub_type: text(raw, "/bounce/bounceSubType"),
            bounced_recipients: addresses(raw.value_at("/bounce/bouncedRecipients")),
        }),
        EventKind::Complaint => EventDetails::Complaint(ComplaintDetails {
            complaint_feedback_type: text(raw, "/complaint/complaintFeedbackType"),
            complained_recipients: addresses(raw.value_at("/complaint/complainedRecipients")),
        }),
        EventKind::Delivery => EventDetails::Delivery(DeliveryDetails {
            processing_time_millis: raw
                .value_at("/delivery/processingTimeMillis")
                .and_then(as_integer)
                .unwrap_or(0),
            smtp_response: text(raw, "/delivery/smtpResponse"),
        }),
        EventKind::Reject => EventDetails::Reject(RejectDetails {
            reason: text(raw, "/reject/reason"),
        }),
        // Event publishing nests rendering failures under `failure`
        EventKind::RenderingFailure => EventDetails::RenderingFailure(RenderingFailureDetails {
            error_message: raw
                .str_at("/failure/errorMessage")
                .or_else(|| raw.str_at("/renderingFailure/errorMessage"))
                .unwrap_or(UNKNOWN)
                .to_string(),
            template_name: raw
                .str_at("/failure/templateName")
                .or_else(|| raw.str_at("/renderingFailure/templateName"))
                .unwrap_or(UNKNOWN)
                .to_string(),
        }),
        EventKind::Send | EventKind::Unrecognized(_) => EventDetails::None,
    }
}

fn text(raw: &RawNotification, pointer: &str) -> String {
    raw.str_at(pointer).unwrap_or(UNKNOWN).to_string()
}

/// Recipient lists hold objects with `emailAddress`; plain strings are
/// accepted too.
fn addresses(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|recipients| {
            recipients
                .iter()
                .filter_map(|recipient| match recipient {
                    Value::String(address) => Some(address.clone()),
                    Value::Object(fields) => fields
                        .get("emailAddress")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawNotification {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_addresses_accepts_objects_and_strings() {
        let list = json!([
            { "emailAddress": "a@example.com", "status": "5.1.1" },
            "b@example.com",
            { "status": "no address" },
            42
        ]);
        assert_eq!(
            addresses(Some(&list)),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
        assert!(addresses(None).is_empty());
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(as_integer(&json!(546)), Some(546));
        assert_eq!(as_integer(&json!(12.9)), Some(12));
        assert_eq!(as_integer(&json!("77")), Some(77));
        assert_eq!(as_integer(&json!(null)), None);
    }

    #[test]
    fn test_subject_falls_back_to_mail_subject() {
        let event = normalize(&raw(json!({
            "eventType": "Send",
            "mail": { "subject": "Plain subject" }
        })));
        assert_eq!(event.subject, "Plain subject");
    }

    #[test]
    fn test_missing_discriminator_is_unrecognized() {
        let event = normalize(&raw(json!({ "mail": {} })));
        assert_eq!(event.event_type, EventKind::Unrecognized(UNKNOWN.to_string()));
        assert_eq!(event.details, EventDetails::None);
    }

    #[test]
    fn test_timestamp_is_creation_time() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T10:20:30.123Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = normalize_at(
            &raw(json!({ "eventType": "Send", "mail": { "timestamp": "2020-01-01T00:00:00Z" } })),
            now,
        );
        assert_eq!(event.timestamp, "2024-05-01T10:20:30.123Z");
    }
}
