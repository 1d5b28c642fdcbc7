use std::fmt;

/// Lifecycle of a ticket. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketState {
    Queued,
    Running,
    Completed,
    Failed,
}

impl TicketState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketState::Completed | TicketState::Failed)
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketState::Queued => "Queued",
            TicketState::Running => "Running",
            TicketState::Completed => "Completed",
            TicketState::Failed => "Failed",
        };
        f.write_str(s)
    }
}
