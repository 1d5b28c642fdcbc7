use tracing::{Level, Span};
use uuid::Uuid;

/// Span covering one ticket from dispatch to its terminal event.
pub fn ticket_span(request_id: &Uuid) -> Span {
    tracing::span!(Level::INFO, "ticket", request_id = %request_id)
}

/// Span covering the lifetime of the dispatcher loop.
pub fn dispatcher_span(interval_ms: u64) -> Span {
    tracing::span!(Level::INFO, "dispatcher", interval_ms)
}
