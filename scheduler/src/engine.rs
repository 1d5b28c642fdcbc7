//! The dispatch loop.
//!
//! On every wake it polls the job queue once and, if a ticket is waiting,
//! runs it to completion before waiting for the next wake. Only this loop
//! ever executes tickets, so at most one simulation runs at any time and
//! tickets start in queue order.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info};

use common::logger::dispatcher_span;
use executor::SimulationRunner;

use crate::queue::JobQueue;

/// Reference wake period of the dispatcher.
pub const DEFAULT_DISPATCH_INTERVAL: Duration = Duration::from_secs(5);

pub struct Dispatcher {
    queue: Arc<JobQueue>,
    runner: Arc<dyn SimulationRunner>,
    interval: Duration,
}

impl Dispatcher {
    pub fn new(queue: Arc<JobQueue>, runner: Arc<dyn SimulationRunner>, interval: Duration) -> Self {
        Self {
            queue,
            runner,
            interval,
        }
    }

    /// Run the loop on its own task until `cancel` fires.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        let span = dispatcher_span(self.interval.as_millis() as u64);
        tokio::spawn(self.run(cancel).instrument(span))
    }

    /// Run the loop until `cancel` fires. A ticket already running when
    /// cancellation is requested is finished first.
    ///
    /// The first wake is one full period after start. After a job that
    /// outlasts the period the next wake is immediate, so the gap between
    /// two job starts is max(period, previous job duration).
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_ms = self.interval.as_millis() as u64,
            capacity = self.queue.capacity(),
            "dispatcher started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.dispatch_once().await;
                }
            }
        }

        info!(pending = self.queue.len(), "dispatcher stopped");
    }

    /// Poll the queue once and run the head ticket, if any. Returns whether
    /// a ticket was run.
    pub async fn dispatch_once(&self) -> bool {
        let Some(ticket) = self.queue.poll() else {
            return false;
        };

        let request_id = ticket.request_id();
        info!(%request_id, pending = self.queue.len(), "executing ticket");

        // Run on a separate task so a panic inside one job cannot take the
        // loop down with it. Awaiting it keeps execution serial.
        let runner = self.runner.clone();
        let running = ticket.clone();
        let job = tokio::spawn(async move { running.submit(runner.as_ref()).await });

        if let Err(e) = job.await {
            error!(%request_id, error = %e, "ticket execution aborted");
            ticket.abort("The simulation was aborted unexpectedly.");
        }

        true
    }
}
