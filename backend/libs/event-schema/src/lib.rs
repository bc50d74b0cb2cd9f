//! SES event notification schema
//!
//! Turns the free-form JSON published by SES (through SNS) into a flat,
//! fully-populated `ProcessedEvent` that is written to the event log.
//!
//! Two payload shapes exist in the wild:
//! - event publishing (configuration sets): discriminator `eventType`
//! - legacy identity notifications: discriminator `notificationType`
//!
//! Both carry a `mail` section and a kind-specific detail object
//! (`bounce`, `complaint`, `delivery`, ...).
pub mod kind;
pub mod normalize;
pub mod processed;
pub mod raw;

pub use kind::EventKind;
pub use normalize::{normalize, normalize_at};
pub use processed::{
    BounceDetails, ComplaintDetails, DeliveryDetails, EventDetails, ProcessedEvent,
    RejectDetails, RenderingFailureDetails,
};
pub use raw::RawNotification;

/// Placeholder written for any string field missing from the source payload
pub const UNKNOWN: &str = "unknown";
