//! W3C trace-context formatting for published events
//!
//! The trace context is threaded explicitly from the request-handling layer
//! down to the publish call; this module only formats it. A missing or
//! malformed context must never block a publish.

/// Distributed trace context captured at the call site
///
/// `trace_id` is 32 lowercase hex characters, `span_id` 16, per the W3C
/// trace-context spec. Unsampled or malformed contexts produce no
/// `traceparent` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
    pub sampled: bool,
}

impl TraceContext {
    /// Create a sampled trace context
    pub fn sampled(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            sampled: true,
        }
    }

    /// Whether the ids are well-formed and non-zero
    pub fn is_valid(&self) -> bool {
        is_hex_id(&self.trace_id, 32) && is_hex_id(&self.span_id, 16)
    }

    /// Format as a W3C `traceparent` header value: `00-{traceId}-{spanId}-01`
    ///
    /// Returns `None` for unsampled or invalid contexts.
    pub fn traceparent(&self) -> Option<String> {
        if !self.sampled || !self.is_valid() {
            return None;
        }
        Some(format!("00-{}-{}-01", self.trace_id, self.span_id))
    }
}

/// Non-zero lowercase hex string of exactly `len` characters
fn is_hex_id(id: &str, len: usize) -> bool {
    id.len() == len
        && id.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
        && id.bytes().any(|b| b != b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
    const SPAN_ID: &str = "00f067aa0ba902b7";

    #[test]
    fn test_traceparent_format() {
        let ctx = TraceContext::sampled(TRACE_ID, SPAN_ID);
        assert_eq!(
            ctx.traceparent().unwrap(),
            format!("00-{}-{}-01", TRACE_ID, SPAN_ID)
        );
    }

    #[test]
    fn test_unsampled_context_yields_none() {
        let ctx = TraceContext {
            trace_id: TRACE_ID.to_string(),
            span_id: SPAN_ID.to_string(),
            sampled: false,
        };
        assert!(ctx.traceparent().is_none());
    }

    #[test]
    fn test_all_zero_ids_are_invalid() {
        let ctx = TraceContext::sampled("0".repeat(32), SPAN_ID);
        assert!(!ctx.is_valid());
        assert!(ctx.traceparent().is_none());

        let ctx = TraceContext::sampled(TRACE_ID, "0".repeat(16));
        assert!(ctx.traceparent().is_none());
    }

    #[test]
    fn test_wrong_length_ids_are_invalid() {
        assert!(TraceContext::sampled("abc123", SPAN_ID).traceparent().is_none());
        assert!(TraceContext::sampled(TRACE_ID, "").traceparent().is_none());
    }

    #[test]
    fn test_non_hex_ids_are_invalid() {
        let ctx = TraceContext::sampled("zz".repeat(16), SPAN_ID);
        assert!(ctx.traceparent().is_none());
    }

    #[test]
    fn test_uppercase_hex_is_rejected() {
        let ctx = TraceContext::sampled(TRACE_ID.to_uppercase(), SPAN_ID);
        assert!(ctx.traceparent().is_none());
    }
}
