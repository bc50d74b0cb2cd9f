use serde::{Serialize, Serializer};
use std::fmt;

/// SES notification kinds handled by the normalizer.
///
/// SES spells kinds differently depending on the publishing path
/// (`Bounce` vs `bounce`, `Rendering Failure` vs `renderingFailure`);
/// every spelling maps to the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Bounce,
    Complaint,
    Delivery,
    Send,
    Reject,
    RenderingFailure,
    /// Any other kind, kept with its original spelling
    Unrecognized(String),
}

impl EventKind {
    pub fn parse(raw: &str) -> Self {
        let folded: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "bounce" => EventKind::Bounce,
            "complaint" => EventKind::Complaint,
            "delivery" => EventKind::Delivery,
            "send" => EventKind::Send,
            "reject" => EventKind::Reject,
            "renderingfailure" => EventKind::RenderingFailure,
            _ => EventKind::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Bounce => "bounce",
            EventKind::Complaint => "complaint",
            EventKind::Delivery => "delivery",
            EventKind::Send => "send",
            EventKind::Reject => "reject",
            EventKind::RenderingFailure => "renderingFailure",
            EventKind::Unrecognized(original) => original,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventKind::Unrecognized(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
