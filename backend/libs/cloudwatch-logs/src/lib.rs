//! CloudWatch Logs append client with sequence-token recovery
//!
//! This library writes single records to one CloudWatch Logs stream:
//! - Idempotent creation of the log group and log stream
//! - Lookup of the stream's current upload sequence token
//! - Append with one automatic retry when the sequence token is stale
//!
//! Store access goes through the [`LogStore`] trait so the append protocol
//! can be exercised without AWS. [`CloudWatchLogStore`] is the SDK-backed
//! implementation.
//!
//! # Example
//!
//! ```no_run
//! use cloudwatch_logs::{CloudWatchLogStore, LogClient, LogDestination};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = CloudWatchLogStore::with_region("us-east-1").await;
//!     let client = LogClient::new(Arc::new(store));
//!     let destination = LogDestination::new("/ses/prod/events", "ses-events");
//!
//!     client.ensure_destination(&destination).await?;
//!     let stored = client
//!         .append(&destination, &serde_json::json!({ "hello": "world" }))
//!         .await?;
//!     assert!(stored);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod cursor;
mod error;
mod store;
mod types;

pub use client::LogClient;
pub use cursor::parse_expected_cursor;
pub use error::{LogClientError, LogClientResult, StoreError};
pub use store::{CloudWatchLogStore, LogStore};
pub use types::{AppendCursor, ExpectedCursor, LogDestination, LogEntry, LogStreamSummary};
