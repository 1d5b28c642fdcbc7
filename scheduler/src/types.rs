//! Shared types used by the scheduler subsystem.

use std::sync::Arc;

use corelib::RequestId;
use thiserror::Error;
use ticket::Ticket;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("job queue is full ({capacity} pending)")]
    Full { capacity: usize },

    #[error("request {0} is already queued")]
    Duplicate(RequestId),
}

/// Outcome of handing a new request to the scheduler.
#[derive(Debug, Clone)]
pub enum Admission {
    /// Registered and waiting in the job queue.
    Queued(Arc<Ticket>),
    /// Refused by the queue. The ticket already carries its error event and
    /// is not registered anywhere.
    Rejected(Arc<Ticket>),
}

impl Admission {
    pub fn ticket(&self) -> &Arc<Ticket> {
        match self {
            Admission::Queued(t) | Admission::Rejected(t) => t,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Admission::Queued(_))
    }
}
