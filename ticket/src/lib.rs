pub mod error;
pub mod events;
pub mod model;
pub mod ticket;

pub use error::TicketError;
pub use events::TicketEvents;
pub use model::TicketState;
pub use ticket::{Ticket, TicketListener};
