//! W3C Trace Context propagation for outbound HTTP calls.
//!
//! The registry client stamps a `traceparent` header on every request it
//! sends so the registry can stitch its spans onto ours. The request-id
//! middleware reads the correlation header back out of incoming requests.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::HeaderMap;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Header name for W3C traceparent
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Render the current span's context as a W3C traceparent value.
///
/// Returns `None` when no OpenTelemetry span context is active, which is the
/// normal case when span export is disabled.
pub fn current_traceparent() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return None;
    }

    // version-trace_id-span_id-trace_flags, version fixed at "00"
    Some(format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    ))
}

/// Stamp the current trace context onto an outbound request.
///
/// Without an active sampled span this leaves the request untouched, so
/// callers apply it unconditionally.
pub fn propagate_trace(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match current_traceparent() {
        Some(traceparent) => request.header(TRACEPARENT_HEADER, traceparent),
        None => request,
    }
}

/// Extract the request correlation ID from incoming request headers.
pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_traceparent_without_active_span() {
        // No subscriber is installed here, so there is no span context to
        // render.
        assert_eq!(current_traceparent(), None);
    }

    #[test]
    fn test_extract_request_id() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, "abc-123".parse().unwrap());

        assert_eq!(extract_request_id(&headers), Some("abc-123".to_string()));
    }

    #[test]
    fn test_extract_request_id_missing() {
        assert_eq!(extract_request_id(&HeaderMap::new()), None);
    }
}
