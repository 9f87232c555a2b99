//! CloudEvents v1.0 envelope with W3C trace context support
//!
//! Every published business fact is wrapped in an [`Envelope`] carrying the
//! CloudEvents metadata consumers key on. Field names follow the CloudEvents
//! wire convention (`specversion`, `traceparent`).

use crate::trace::TraceContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// CloudEvents spec version emitted in every envelope
pub const SPEC_VERSION: &str = "1.0";

/// Transport-neutral CloudEvents envelope around a typed payload
///
/// `id` and `time` are assigned exactly once, at construction, and never
/// mutated afterward. Envelopes are built fresh for each publish call and
/// discarded after the transport accepts the bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// CloudEvents spec version (constant "1.0")
    #[serde(rename = "specversion")]
    pub spec_version: String,

    /// Versioned business fact identifier (e.g., "stickers.added.v1")
    #[serde(rename = "type")]
    pub event_type: String,

    /// Name of the emitting service
    pub source: String,

    /// Unique envelope id, freshly generated per instance
    pub id: String,

    /// Creation instant, RFC 3339 on the wire
    pub time: DateTime<Utc>,

    /// W3C trace-context propagation string, absent when no trace is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceparent: Option<String>,

    /// The business payload
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap a payload with fresh CloudEvents metadata
    ///
    /// Generates a new id, stamps the current instant, and leaves
    /// `traceparent` unset. Construction cannot fail.
    pub fn wrap(
        event_type: impl Into<String>,
        source: impl Into<String>,
        data: T,
    ) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            event_type: event_type.into(),
            source: source.into(),
            id: uuid::Uuid::new_v4().to_string(),
            time: Utc::now(),
            traceparent: None,
            data,
        }
    }

    /// Attach trace context, if a valid sampled context is available
    ///
    /// An absent or invalid context leaves the envelope without a
    /// `traceparent` field; this never fails a publish.
    pub fn with_trace(mut self, trace: Option<&TraceContext>) -> Self {
        self.traceparent = trace.and_then(TraceContext::traceparent);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrap_assigns_id_and_time() {
        let before = Utc::now();
        let envelope = Envelope::wrap(
            "stickers.added.v1",
            "sticker-catalogue",
            json!({"stickerId": "st-1"}),
        );
        let after = Utc::now();

        assert!(!envelope.id.is_empty());
        assert_eq!(envelope.spec_version, "1.0");
        assert_eq!(envelope.event_type, "stickers.added.v1");
        assert_eq!(envelope.source, "sticker-catalogue");
        assert!(envelope.time >= before && envelope.time <= after);
        assert!(envelope.traceparent.is_none());
    }

    #[test]
    fn test_wrap_generates_unique_ids() {
        let a = Envelope::wrap("stickers.added.v1", "sticker-catalogue", json!({}));
        let b = Envelope::wrap("stickers.added.v1", "sticker-catalogue", json!({}));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_traceparent_absent_without_trace() {
        let envelope = Envelope::wrap("stickers.deleted.v1", "sticker-catalogue", json!({}))
            .with_trace(None);

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains("traceparent"));
    }

    #[test]
    fn test_traceparent_present_with_valid_trace() {
        let trace = TraceContext::sampled(
            "4bf92f3577b34da6a3ce929d0e0e4736",
            "00f067aa0ba902b7",
        );
        let envelope = Envelope::wrap("stickers.claimed.v1", "sticker-award", json!({}))
            .with_trace(Some(&trace));

        assert_eq!(
            envelope.traceparent.as_deref(),
            Some("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01")
        );
    }

    #[test]
    fn test_wire_format_field_names() {
        let envelope = Envelope::wrap(
            "stickers.added.v1",
            "sticker-catalogue",
            json!({"stickerId": "st-1"}),
        );

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("\"specversion\":\"1.0\""));
        assert!(json.contains("\"type\":\"stickers.added.v1\""));
        assert!(json.contains("\"source\":\"sticker-catalogue\""));
        assert!(json.contains("\"data\":{\"stickerId\":\"st-1\"}"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let trace = TraceContext::sampled(
            "4bf92f3577b34da6a3ce929d0e0e4736",
            "00f067aa0ba902b7",
        );
        let envelope = Envelope::wrap(
            "stickers.assigned.v1",
            "sticker-award",
            json!({"accountId": "acct-9", "stickerId": "st-3"}),
        )
        .with_trace(Some(&trace));

        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: Envelope<serde_json::Value> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.spec_version, envelope.spec_version);
        assert_eq!(parsed.event_type, envelope.event_type);
        assert_eq!(parsed.source, envelope.source);
        assert_eq!(parsed.id, envelope.id);
        assert_eq!(parsed.time, envelope.time);
        assert_eq!(parsed.traceparent, envelope.traceparent);
        assert_eq!(parsed.data, envelope.data);
    }
}
