use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use ticket::Ticket;

use crate::types::QueueError;

/// Reference capacity of the pending-ticket queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Bounded FIFO of tickets waiting for the dispatcher.
///
/// Any number of producers may `offer`; the dispatcher is the only consumer.
/// Neither operation blocks beyond the short critical section.
pub struct JobQueue {
    capacity: usize,
    pending: Mutex<VecDeque<Arc<Ticket>>>,
}

impl JobQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            pending: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append `ticket`, or fail immediately when the queue is at capacity.
    pub fn offer(&self, ticket: Arc<Ticket>) -> Result<(), QueueError> {
        let mut pending = self.pending.lock();

        if pending.len() >= self.capacity {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }

        let id = ticket.request_id();
        if pending.iter().any(|t| t.request_id() == id) {
            return Err(QueueError::Duplicate(id));
        }

        pending.push_back(ticket);
        Ok(())
    }

    /// Head of the queue, if any ticket is waiting.
    pub fn poll(&self) -> Option<Arc<Ticket>> {
        self.pending.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::SimulationInput;

    fn ticket() -> Arc<Ticket> {
        Arc::new(Ticket::new(SimulationInput::new("priest=x"), 1))
    }

    #[test]
    fn poll_returns_tickets_in_offer_order() {
        let q = JobQueue::new(4);
        let (a, b, c) = (ticket(), ticket(), ticket());

        q.offer(a.clone()).unwrap();
        q.offer(b.clone()).unwrap();
        q.offer(c.clone()).unwrap();

        assert_eq!(q.poll().unwrap().request_id(), a.request_id());
        assert_eq!(q.poll().unwrap().request_id(), b.request_id());
        assert_eq!(q.poll().unwrap().request_id(), c.request_id());
        assert!(q.poll().is_none());
    }

    #[test]
    fn offer_fails_at_capacity_and_recovers_after_poll() {
        let q = JobQueue::new(2);
        q.offer(ticket()).unwrap();
        q.offer(ticket()).unwrap();

        assert_eq!(q.offer(ticket()), Err(QueueError::Full { capacity: 2 }));
        assert_eq!(q.len(), 2);

        q.poll();
        assert!(q.offer(ticket()).is_ok());
    }

    #[test]
    fn same_ticket_cannot_be_queued_twice() {
        let q = JobQueue::new(4);
        let t = ticket();

        q.offer(t.clone()).unwrap();
        assert_eq!(q.offer(t.clone()), Err(QueueError::Duplicate(t.request_id())));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn default_capacity_is_64() {
        assert_eq!(JobQueue::default().capacity(), 64);
        assert_eq!(JobQueue::new(0).capacity(), 1);
    }
}
