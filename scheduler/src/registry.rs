//! Live tickets keyed by request id.
//!
//! A ticket is present from the moment it is accepted into the job queue
//! until its terminal event has been sent. Late subscribers find their
//! ticket here, and queue-position updates fan out from here.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use corelib::{RequestId, SimulationInput};
use ticket::{Ticket, TicketError, TicketListener};

use crate::queue::JobQueue;
use crate::types::{Admission, QueueError};

#[derive(Clone, Default)]
pub struct TicketRegistry {
    inner: Arc<RwLock<HashMap<RequestId, Arc<Ticket>>>>,
}

impl TicketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ticket for `input`, offer it to `queue` and register it if the
    /// queue accepts it.
    ///
    /// Position assignment, the offer and the insert happen under the write
    /// lock, so a ticket the dispatcher picks up is always already registered
    /// and positions stay consistent under concurrent submissions.
    pub fn admit(
        &self,
        input: SimulationInput,
        queue: &JobQueue,
        listener: Arc<dyn TicketListener>,
    ) -> Admission {
        let mut tickets = self.inner.write();

        let position = u32::try_from(tickets.len() + 1).unwrap_or(u32::MAX);
        let ticket = Arc::new(Ticket::new(input, position));
        ticket.register_listener(listener);

        match queue.offer(ticket.clone()) {
            Ok(()) => {
                tickets.insert(ticket.request_id(), ticket.clone());
                info!(request_id = %ticket.request_id(), position, "ticket queued");
                Admission::Queued(ticket)
            }
            Err(err) => {
                drop(tickets);
                warn!(request_id = %ticket.request_id(), error = %err, "ticket rejected");
                let reason = match err {
                    QueueError::Full { .. } => TicketError::QueueFull,
                    QueueError::Duplicate(id) => TicketError::Duplicate(id),
                };
                ticket.reject(&reason);
                Admission::Rejected(ticket)
            }
        }
    }

    pub fn get(&self, id: &RequestId) -> Option<Arc<Ticket>> {
        self.inner.read().get(id).cloned()
    }

    pub fn remove(&self, id: &RequestId) -> Option<Arc<Ticket>> {
        let removed = self.inner.write().remove(id);
        if removed.is_some() {
            debug!(request_id = %id, "ticket evicted");
        }
        removed
    }

    pub fn contains(&self, id: &RequestId) -> bool {
        self.inner.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Advance every registered ticket except `started`.
    ///
    /// Tickets that are no longer queued ignore the call.
    pub fn advance_all_except(&self, started: &RequestId) -> usize {
        let tickets = self.inner.read();
        let mut advanced = 0;
        for (id, ticket) in tickets.iter() {
            if id != started {
                ticket.advance();
                advanced += 1;
            }
        }
        advanced
    }
}

/// Lifecycle listener that keeps the registry in step with the tickets.
///
/// When a ticket starts, every other registered ticket moves up one place;
/// when it finishes, it is evicted.
pub struct QueueBroadcaster {
    registry: TicketRegistry,
}

impl QueueBroadcaster {
    pub fn new(registry: TicketRegistry) -> Self {
        Self { registry }
    }
}

impl TicketListener for QueueBroadcaster {
    fn on_begin(&self, ticket: &Ticket) {
        let notified = self.registry.advance_all_except(&ticket.request_id());
        debug!(notified, "queue positions advanced");
    }

    fn on_completed(&self, ticket: &Ticket) {
        self.registry.remove(&ticket.request_id());
    }
}
