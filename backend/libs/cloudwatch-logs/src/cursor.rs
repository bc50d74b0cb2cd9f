use crate::types::{AppendCursor, ExpectedCursor};

/// Marker preceding the token in CloudWatch Logs conflict messages, e.g.
/// `The given sequenceToken is invalid. The next expected sequenceToken is: 4960...`
const TOKEN_MARKER: &str = "sequenceToken is:";

/// Extract the expected cursor from a conflict message.
///
/// Returns `None` when the message does not follow the known pattern.
/// A literal `null` token maps to [`ExpectedCursor::Absent`].
pub fn parse_expected_cursor(message: &str) -> Option<ExpectedCursor> {
    let start = message.rfind(TOKEN_MARKER)? + TOKEN_MARKER.len();
    let token = message[start..]
        .split_whitespace()
        .next()?
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | '"' | '\''));

    match token {
        "" => None,
        "null" => Some(ExpectedCursor::Absent),
        token => Some(ExpectedCursor::Token(AppendCursor::from(token))),
    }
}
