//! Per-request state machine and event channel.
//!
//! A ticket is created `Queued`, moves to `Running` when the dispatcher
//! submits it, and ends `Completed` or `Failed`. The terminal event is the
//! last thing ever written to its channel; the write end is dropped right
//! after it.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{Instrument, debug, error, info, warn};

use common::logger::ticket_span;
use corelib::{RequestId, SimulationInput, TicketEvent, TicketStatus, render_config};
use executor::{RunOutput, SimulationRunner};

use crate::error::TicketError;
use crate::events::TicketEvents;
use crate::model::TicketState;

/// Lifecycle hooks, invoked from the dispatcher while it owns the ticket.
///
/// `on_begin` runs after the `in-progress` status event and before the
/// simulation starts. `on_completed` runs exactly once, after the terminal
/// event.
pub trait TicketListener: Send + Sync {
    fn on_begin(&self, _ticket: &Ticket) {}
    fn on_completed(&self, _ticket: &Ticket) {}
}

struct TicketInner {
    state: TicketState,
    queue_position: u32,
    /// `None` once the channel is closed.
    tx: Option<UnboundedSender<TicketEvent>>,
}

pub struct Ticket {
    input: SimulationInput,
    inner: Mutex<TicketInner>,
    rx: Mutex<Option<UnboundedReceiver<TicketEvent>>>,
    listener: OnceCell<Arc<dyn TicketListener>>,
}

impl Ticket {
    pub fn new(input: SimulationInput, queue_position: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            input,
            inner: Mutex::new(TicketInner {
                state: TicketState::Queued,
                queue_position,
                tx: Some(tx),
            }),
            rx: Mutex::new(Some(rx)),
            listener: OnceCell::new(),
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.input.request_id()
    }

    pub fn input(&self) -> &SimulationInput {
        &self.input
    }

    pub fn state(&self) -> TicketState {
        self.inner.lock().state
    }

    pub fn queue_position(&self) -> u32 {
        self.inner.lock().queue_position
    }

    /// Install the lifecycle listener. Only the first call takes effect.
    pub fn register_listener(&self, listener: Arc<dyn TicketListener>) -> bool {
        self.listener.set(listener).is_ok()
    }

    /// Take the read end of the event channel. Returns `None` if it was
    /// already handed out.
    pub fn subscribe(&self) -> Option<TicketEvents> {
        self.rx
            .lock()
            .take()
            .map(|rx| TicketEvents::new(self.request_id(), rx))
    }

    /// Move one place closer to the head of the queue.
    ///
    /// Only meaningful while `Queued`; later calls are ignored.
    pub fn advance(&self) {
        let mut inner = self.inner.lock();
        if inner.state != TicketState::Queued {
            debug!(request_id = %self.request_id(), state = %inner.state, "advance ignored");
            return;
        }

        inner.queue_position = inner.queue_position.saturating_sub(1);
        let position = inner.queue_position;
        Self::emit_locked(&mut inner, TicketEvent::Queue { position });
    }

    /// Fail a ticket that never made it into the queue. It gives up its
    /// provisional position, since it never held a place in line.
    pub fn reject(&self, err: &TicketError) {
        let mut inner = self.inner.lock();
        if inner.state != TicketState::Queued {
            warn!(request_id = %self.request_id(), state = %inner.state, "reject ignored");
            return;
        }

        info!(request_id = %self.request_id(), error = %err, "ticket rejected");
        Self::emit_locked(&mut inner, TicketEvent::error(err.to_string()));
        inner.state = TicketState::Failed;
        inner.queue_position = 0;
        inner.tx = None;
    }

    /// Run the ticket to completion. Blocks the caller for the duration of
    /// the simulation.
    pub async fn submit(&self, runner: &dyn SimulationRunner) {
        let span = ticket_span(&self.request_id());
        self.submit_inner(runner).instrument(span).await
    }

    async fn submit_inner(&self, runner: &dyn SimulationRunner) {
        {
            let mut inner = self.inner.lock();
            if inner.state != TicketState::Queued {
                warn!(state = %inner.state, "submit ignored for ticket that is not queued");
                return;
            }
            inner.state = TicketState::Running;
            Self::emit_locked(
                &mut inner,
                TicketEvent::Status {
                    status: TicketStatus::InProgress,
                },
            );
        }

        info!(
            fight_style = %self.input.fight_style(),
            scaling = self.input.enable_scaling(),
            enemies = self.input.number_of_enemies(),
            "ticket running"
        );

        if let Some(listener) = self.listener.get() {
            listener.on_begin(self);
        }

        let config = render_config(&self.input);
        let outcome = runner
            .run(&config, self.input.enable_scaling())
            .await
            .map_err(TicketError::from);

        self.finish(outcome);

        if let Some(listener) = self.listener.get() {
            listener.on_completed(self);
        }
    }

    /// Force a ticket whose execution died (for example a panicking runner)
    /// into `Failed`, so its subscriber and listener still see an end.
    /// Does nothing if the ticket already reached a terminal state.
    pub fn abort(&self, message: &str) {
        {
            let mut inner = self.inner.lock();
            if inner.state.is_terminal() {
                return;
            }
            error!(request_id = %self.request_id(), message, "ticket aborted");
            Self::emit_locked(&mut inner, TicketEvent::error(message));
            inner.state = TicketState::Failed;
            inner.tx = None;
        }

        if let Some(listener) = self.listener.get() {
            listener.on_completed(self);
        }
    }

    fn finish(&self, outcome: Result<RunOutput, TicketError>) {
        let mut inner = self.inner.lock();

        match outcome {
            Ok(output) => {
                if let Some(line) = output.log {
                    Self::emit_locked(&mut inner, TicketEvent::Log { line });
                }
                Self::emit_locked(
                    &mut inner,
                    TicketEvent::Results {
                        report: output.report,
                    },
                );
                inner.state = TicketState::Completed;
                info!("ticket completed");
            }
            Err(err) => {
                error!(error = %err, "ticket failed");
                Self::emit_locked(&mut inner, TicketEvent::error(err.to_string()));
                inner.state = TicketState::Failed;
            }
        }

        inner.tx = None;
    }

    fn emit_locked(inner: &mut TicketInner, event: TicketEvent) {
        let Some(tx) = inner.tx.as_ref() else {
            warn!(?event, "event emitted after channel close; dropped");
            return;
        };

        // The subscriber may have gone away; the ticket still runs to the end.
        if tx.send(event).is_err() {
            debug!("subscriber dropped; event discarded");
        }
    }
}

impl std::fmt::Debug for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Ticket")
            .field("request_id", &self.request_id())
            .field("state", &inner.state)
            .field("queue_position", &inner.queue_position)
            .finish()
    }
}
