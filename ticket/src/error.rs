use corelib::RequestId;
use executor::RunError;
use thiserror::Error;

/// Failures that end a ticket. The `Display` text is what the subscriber
/// sees in the `error` event.
#[derive(Error, Debug)]
pub enum TicketError {
    #[error("The job queue is full. Please check back later.")]
    QueueFull,

    #[error("request {0} is already queued")]
    Duplicate(RequestId),

    #[error(transparent)]
    Run(#[from] RunError),
}
