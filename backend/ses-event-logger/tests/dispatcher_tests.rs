//! Dispatcher tests against a mocked CloudWatch Logs store
//!
//! This test module covers:
//! - Record filtering (source, decode failures, irrelevant payloads)
//! - Legacy notificationType handling
//! - Destination setup once per invocation
//! - Per-record failure isolation
use cloudwatch_logs::*;
use mockall::mock;
use serde_json::{json, Value};
use ses_event_logger::*;
use std::sync::{Arc, Mutex};

mock! {
    pub Store {}

    #[async_trait::async_trait]
    impl LogStore for Store {
        async fn create_log_group(&self, log_group: &str) -> Result<(), StoreError>;
        async fn create_log_stream(&self, log_group: &str, log_stream: &str) -> Result<(), StoreError>;
        async fn describe_log_streams(
            &self,
            log_group: &str,
            prefix: &str,
        ) -> Result<Vec<LogStreamSummary>, StoreError>;
        async fn put_log_events(
            &self,
            log_group: &str,
            log_stream: &str,
            entries: Vec<LogEntry>,
            cursor: Option<AppendCursor>,
        ) -> Result<Option<AppendCursor>, StoreError>;
    }
}

// ============================================
// Test Helpers
// ============================================

fn destination() -> LogDestination {
    LogDestination::new("/ses/test/events", "ses-events")
}

fn dispatcher(store: MockStore) -> Dispatcher {
    Dispatcher::new(LogClient::new(Arc::new(store)), destination())
}

/// Store whose destination already exists and whose stream has no token
fn ready_store() -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_create_log_group()
        .times(1)
        .returning(|group| Err(StoreError::AlreadyExists(group.to_string())));
    store
        .expect_create_log_stream()
        .times(1)
        .returning(|_, stream| Err(StoreError::AlreadyExists(stream.to_string())));
    store
        .expect_describe_log_streams()
        .returning(|_, _| Ok(vec![]));
    store
}

/// Capture every appended message body
fn capture_appends(store: &mut MockStore) -> Arc<Mutex<Vec<String>>> {
    let appended = Arc::new(Mutex::new(Vec::new()));
    let sink = appended.clone();
    store
        .expect_put_log_events()
        .returning(move |_, _, entries, _| {
            let mut sink = sink.lock().unwrap();
            sink.extend(entries.into_iter().map(|entry| entry.message));
            Ok(Some(AppendCursor::from("NEXT")))
        });
    appended
}

fn sns_record(message: &str) -> SnsEventRecord {
    SnsEventRecord {
        event_source: Some("aws:sns".to_string()),
        event_version: Some("1.0".to_string()),
        sns: Some(SnsMessage {
            message_type: Some("Notification".to_string()),
            message_id: Some("sns-msg".to_string()),
            message: Some(message.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn bounce_message() -> String {
    json!({
        "eventType": "Bounce",
        "bounce": {
            "bounceType": "Permanent",
            "bounceSubType": "General",
            "bouncedRecipients": [{ "emailAddress": "recipient@example.com" }]
        },
        "mail": {
            "messageId": "msg-bounce",
            "source": "sender@example.com",
            "destination": ["recipient@example.com"],
            "commonHeaders": { "subject": "Hello" }
        }
    })
    .to_string()
}

fn batch(records: Vec<SnsEventRecord>) -> SnsEvent {
    SnsEvent { records }
}

// ============================================
// Filtering
// ============================================

#[tokio::test]
async fn test_irrelevant_record_and_bounce_append_once() {
    let mut store = ready_store();
    let appended = capture_appends(&mut store);

    let summary = dispatcher(store)
        .handle(&batch(vec![
            sns_record(r#"{"mail":{"messageId":"no-kind"}}"#),
            sns_record(&bounce_message()),
        ]))
        .await
        .unwrap();

    let appended = appended.lock().unwrap();
    assert_eq!(appended.len(), 1);
    let logged: Value = serde_json::from_str(&appended[0]).unwrap();
    assert_eq!(logged["eventType"], "bounce");
    assert_eq!(logged["messageId"], "msg-bounce");
    assert_eq!(logged["bounceType"], "Permanent");
    assert_eq!(logged["bouncedRecipients"], json!(["recipient@example.com"]));

    assert_eq!(summary.received, 2);
    assert_eq!(summary.appended, 1);
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn test_undecodable_payload_does_not_abort_batch() {
    let mut store = ready_store();
    let appended = capture_appends(&mut store);

    let summary = dispatcher(store)
        .handle(&batch(vec![
            sns_record("{not json"),
            sns_record("\"just a string\""),
            sns_record(&bounce_message()),
        ]))
        .await
        .unwrap();

    assert_eq!(appended.lock().unwrap().len(), 1);
    assert_eq!(summary.decode_failures, 2);
    assert_eq!(summary.appended, 1);
}

#[tokio::test]
async fn test_records_from_other_sources_are_skipped() {
    let mut store = ready_store();
    store.expect_put_log_events().never();

    let mut foreign = sns_record(&bounce_message());
    foreign.event_source = Some("aws:sqs".to_string());
    let mut missing = sns_record(&bounce_message());
    missing.event_source = None;

    let summary = dispatcher(store)
        .handle(&batch(vec![foreign, missing]))
        .await
        .unwrap();

    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.appended, 0);
}

#[tokio::test]
async fn test_legacy_notification_type_is_promoted() {
    let mut store = ready_store();
    let appended = capture_appends(&mut store);

    let legacy = json!({
        "notificationType": "Complaint",
        "complaint": {
            "complaintFeedbackType": "abuse",
            "complainedRecipients": [{ "emailAddress": "recipient@example.com" }]
        },
        "mail": { "messageId": "msg-legacy" }
    });

    dispatcher(store)
        .handle(&batch(vec![sns_record(&legacy.to_string())]))
        .await
        .unwrap();

    let appended = appended.lock().unwrap();
    let logged: Value = serde_json::from_str(&appended[0]).unwrap();
    assert_eq!(logged["eventType"], "complaint");
    assert_eq!(logged["complaintFeedbackType"], "abuse");
    assert_eq!(logged["rawEvent"]["eventType"], "Complaint");
    assert_eq!(logged["rawEvent"]["notificationType"], "Complaint");
    assert_eq!(logged["source"], "unknown");
}

// ============================================
// Setup and failures
// ============================================

#[tokio::test]
async fn test_destination_ensured_for_empty_batch() {
    let mut store = MockStore::new();
    store.expect_create_log_group().times(1).returning(|_| Ok(()));
    store
        .expect_create_log_stream()
        .times(1)
        .returning(|_, _| Ok(()));
    store.expect_put_log_events().never();

    let summary = dispatcher(store).handle(&SnsEvent::default()).await.unwrap();
    assert_eq!(summary, BatchSummary::default());
}

#[tokio::test]
async fn test_setup_failure_aborts_invocation() {
    let mut store = MockStore::new();
    store.expect_create_log_group().times(1).returning(|_| {
        Err(StoreError::Service {
            code: "ServiceUnavailableException".to_string(),
            message: "try again".to_string(),
        })
    });
    store.expect_create_log_stream().never();
    store.expect_put_log_events().never();

    let result = dispatcher(store)
        .handle(&batch(vec![sns_record(&bounce_message())]))
        .await;
    assert!(matches!(result, Err(DispatchError::Setup(_))));
}

#[tokio::test]
async fn test_append_failure_is_counted_and_batch_continues() {
    let mut store = ready_store();
    let mut calls = 0;
    store
        .expect_put_log_events()
        .times(2)
        .returning(move |_, _, _, _| {
            calls += 1;
            if calls == 1 {
                Err(StoreError::Service {
                    code: "ThrottlingException".to_string(),
                    message: "Rate exceeded".to_string(),
                })
            } else {
                Ok(None)
            }
        });

    let summary = dispatcher(store)
        .handle(&batch(vec![
            sns_record(&bounce_message()),
            sns_record(&bounce_message()),
        ]))
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.appended, 1);
}

#[tokio::test]
async fn test_conflict_recovered_within_batch() {
    let mut store = ready_store();
    let mut calls = 0;
    store
        .expect_put_log_events()
        .times(2)
        .returning(move |_, _, _, cursor| {
            calls += 1;
            match calls {
                1 => Err(StoreError::SequenceTokenConflict {
                    expected: None,
                    message: "The next expected sequenceToken is: ABC123".to_string(),
                }),
                _ => {
                    assert_eq!(cursor, Some(AppendCursor::from("ABC123")));
                    Ok(None)
                }
            }
        });

    let summary = dispatcher(store)
        .handle(&batch(vec![sns_record(&bounce_message())]))
        .await
        .unwrap();
    assert_eq!(summary.appended, 1);
    assert_eq!(summary.failed, 0);
}

// ============================================
// Entry point
// ============================================

#[tokio::test]
async fn test_handle_invocation_with_fixture_batch() {
    let mut store = ready_store();
    let appended = capture_appends(&mut store);

    let batch: SnsEvent =
        serde_json::from_str(include_str!("../fixtures/sns-batch.json")).unwrap();
    let response = handle_invocation(
        &dispatcher(store),
        &batch,
        &InvocationContext::new("test-request"),
    )
    .await
    .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "Processed 3 SES event notification(s)");
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({ "statusCode": 200, "body": "Processed 3 SES event notification(s)" })
    );

    let appended = appended.lock().unwrap();
    assert_eq!(appended.len(), 2);
    let delivery: Value = serde_json::from_str(&appended[1]).unwrap();
    assert_eq!(delivery["eventType"], "delivery");
    assert_eq!(delivery["processingTimeMillis"], 546);
    assert_eq!(delivery["smtpResponse"], "250 ok dirdel");
    assert_eq!(delivery["subject"], "Welcome");
}

#[tokio::test]
async fn test_handle_invocation_propagates_setup_failure() {
    let mut store = MockStore::new();
    store
        .expect_create_log_group()
        .returning(|_| Err(StoreError::Other("dns error".to_string())));

    let result = handle_invocation(
        &dispatcher(store),
        &SnsEvent::default(),
        &InvocationContext::generate(),
    )
    .await;
    assert!(result.is_err());
}
