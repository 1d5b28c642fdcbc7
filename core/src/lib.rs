pub mod config_writer;
pub mod error;
pub mod event;
pub mod models;
pub mod profile;

pub use config_writer::render_config;
pub use error::InputError;
pub use event::{TicketEvent, TicketStatus};
pub use models::{FightStyle, RequestId, SimulationInput};
pub use profile::SanitizedProfile;
