use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use corelib::{RequestId, SimulationInput, TicketEvent};
use executor::SimulationRunner;
use ticket::TicketEvents;

use crate::engine::Dispatcher;
use crate::queue::JobQueue;
use crate::registry::{QueueBroadcaster, TicketRegistry};
use crate::types::Admission;

pub const JOB_NOT_FOUND: &str =
    "Simulation job not found. This is a backend problem; please check back later.";

/// Entry point for request handlers: submit inputs, attach subscribers and
/// start the dispatcher that drains the queue.
pub struct SimulationService {
    registry: TicketRegistry,
    queue: Arc<JobQueue>,
    broadcaster: Arc<QueueBroadcaster>,
}

impl SimulationService {
    pub fn new(queue_capacity: usize) -> Self {
        let registry = TicketRegistry::new();
        Self {
            broadcaster: Arc::new(QueueBroadcaster::new(registry.clone())),
            registry,
            queue: Arc::new(JobQueue::new(queue_capacity)),
        }
    }

    /// Queue a new simulation. A rejected admission has already emitted its
    /// error event; subscribe through the returned ticket to read it.
    pub fn submit(&self, input: SimulationInput) -> Admission {
        self.registry
            .admit(input, &self.queue, self.broadcaster.clone())
    }

    /// Attach to a live ticket's event stream.
    ///
    /// Unknown ids, finished tickets and tickets whose stream was already
    /// taken all get a stream holding a single not-found error.
    pub fn subscribe(&self, request_id: &RequestId) -> TicketEvents {
        self.registry
            .get(request_id)
            .and_then(|ticket| ticket.subscribe())
            .unwrap_or_else(|| TicketEvents::single(*request_id, TicketEvent::error(JOB_NOT_FOUND)))
    }

    pub fn dispatcher(&self, runner: Arc<dyn SimulationRunner>, interval: Duration) -> Dispatcher {
        Dispatcher::new(self.queue.clone(), runner, interval)
    }

    /// Spawn the dispatcher loop; it stops when `cancel` fires.
    pub fn start(
        &self,
        runner: Arc<dyn SimulationRunner>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        self.dispatcher(runner, interval).spawn(cancel)
    }

    pub fn registry(&self) -> &TicketRegistry {
        &self.registry
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }
}
