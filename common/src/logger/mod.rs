mod init;
mod spans;

pub use init::init_logger;
pub use spans::{dispatcher_span, ticket_span};
