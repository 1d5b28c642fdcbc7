//! Events streamed to the subscriber of a ticket.
//!
//! Every event except `results` is a JSON object tagged by `type`. The
//! report is sent raw, prefixed with [`RESULTS_MARKER`], since it is an HTML
//! document rather than a JSON value.

use serde::Serialize;

pub const RESULTS_MARKER: &str = "results;";

/// Message used when a failure carries no text of its own.
pub const UNKNOWN_ERROR: &str = "An unknown error occured";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    InProgress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TicketEvent {
    Status { status: TicketStatus },
    Queue { position: u32 },
    Error { message: String },
    Log { line: String },
    #[serde(skip)]
    Results { report: String },
    End,
}

impl TicketEvent {
    /// Error event, falling back to [`UNKNOWN_ERROR`] for blank messages.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            TicketEvent::Error {
                message: UNKNOWN_ERROR.to_string(),
            }
        } else {
            TicketEvent::Error { message }
        }
    }

    /// `results` and `error` end a ticket's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketEvent::Results { .. } | TicketEvent::Error { .. })
    }

    /// Wire form of the event, as carried in one SSE `data` payload.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            TicketEvent::Results { report } => Ok(format!("{RESULTS_MARKER}{report}")),
            other => serde_json::to_string(other),
        }
    }
}

/// Frame an encoded payload as one server-sent event. Multi-line payloads
/// become one `data:` field per line.
pub fn sse_frame(payload: &str) -> String {
    let mut frame = String::with_capacity(payload.len() + 8);
    for line in payload.split('\n') {
        frame.push_str("data: ");
        frame.push_str(line.strip_suffix('\r').unwrap_or(line));
        frame.push('\n');
    }
    frame.push('\n');
    frame
}
