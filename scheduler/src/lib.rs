pub mod config;
pub mod engine;
pub mod queue;
pub mod registry;
pub mod service;
pub mod types;

pub use config::ServiceConfig;
pub use engine::Dispatcher;
pub use queue::JobQueue;
pub use registry::{QueueBroadcaster, TicketRegistry};
pub use service::SimulationService;
pub use types::{Admission, QueueError};
