use serde::{Deserialize, Serialize};
use std::fmt;

/// Log group and stream receiving the records.
///
/// Built once per process and shared by every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDestination {
    pub log_group: String,
    pub log_stream: String,
}

impl LogDestination {
    pub fn new(log_group: impl Into<String>, log_stream: impl Into<String>) -> Self {
        Self {
            log_group: log_group.into(),
            log_stream: log_stream.into(),
        }
    }
}

impl fmt::Display for LogDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.log_group, self.log_stream)
    }
}

/// Upload sequence token assigned by the store.
///
/// Invalidated by every successful append to the stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppendCursor(String);

impl AppendCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for AppendCursor {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for AppendCursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for AppendCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cursor the store expects for the next append, as reported by a
/// sequence-token conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedCursor {
    Token(AppendCursor),
    /// The stream has no token yet; append without one
    Absent,
}

impl ExpectedCursor {
    pub fn into_cursor(self) -> Option<AppendCursor> {
        match self {
            ExpectedCursor::Token(cursor) => Some(cursor),
            ExpectedCursor::Absent => None,
        }
    }
}

/// One input event of an append batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch
    pub timestamp_millis: i64,
    pub message: String,
}

/// Stream entry returned by a describe call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStreamSummary {
    pub name: String,
    pub upload_sequence_token: Option<AppendCursor>,
}
