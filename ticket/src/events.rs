use corelib::{RequestId, TicketEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Read end of a ticket's event channel. There is exactly one per ticket.
///
/// `next` returns `None` once the ticket has closed its channel, which
/// always happens right after the terminal `results` or `error` event.
#[derive(Debug)]
pub struct TicketEvents {
    request_id: RequestId,
    rx: UnboundedReceiver<TicketEvent>,
}

impl TicketEvents {
    pub(crate) fn new(request_id: RequestId, rx: UnboundedReceiver<TicketEvent>) -> Self {
        Self { request_id, rx }
    }

    /// A stream that yields `event` and then ends.
    pub fn single(request_id: RequestId, event: TicketEvent) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(event);
        Self { request_id, rx }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub async fn next(&mut self) -> Option<TicketEvent> {
        self.rx.recv().await
    }

    /// Next buffered event without waiting.
    pub fn try_next(&mut self) -> Option<TicketEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain until the channel closes.
    pub async fn collect(mut self) -> Vec<TicketEvent> {
        let mut out = Vec::new();
        while let Some(ev) = self.next().await {
            out.push(ev);
        }
        out
    }
}
