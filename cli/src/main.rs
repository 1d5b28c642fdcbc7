mod cli;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use common::logger::init_logger;
use corelib::{RequestId, TicketEvent, event::sse_frame};
use executor::ProcessRunner;
use scheduler::SimulationService;
use ticket::TicketEvents;

use crate::cli::Cli;

/// How long a running simulation may keep going after shutdown is requested.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("simqueue");

    let cli = Cli::parse();
    let cfg = cli.service_config();
    let inputs = cli.build_inputs()?;

    info!(
        executable = %cfg.runner.executable.display(),
        queue_capacity = cfg.queue_capacity,
        interval_ms = cfg.dispatch_interval.as_millis() as u64,
        tickets = inputs.len(),
        "starting simqueue"
    );

    let service = SimulationService::new(cfg.queue_capacity);
    let runner = Arc::new(ProcessRunner::new(cfg.runner.clone()));
    let cancel = CancellationToken::new();
    let dispatcher = service.start(runner, cfg.dispatch_interval, cancel.clone());

    let mut printers = Vec::with_capacity(inputs.len());
    for input in inputs {
        // Rejected tickets are never registered, so read their error event
        // straight from the ticket rather than through the registry.
        let admission = service.submit(input);
        let ticket = admission.ticket();
        let events = ticket
            .subscribe()
            .unwrap_or_else(|| service.subscribe(&ticket.request_id()));
        printers.push(tokio::spawn(print_stream(events)));
    }

    tokio::select! {
        results = futures::future::join_all(printers) => {
            for result in results {
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => error!(error = %e, "failed to write event stream"),
                    Err(e) => error!(error = %e, "event printer panicked"),
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("shutdown signal received; pending tickets are abandoned");
        }
    }

    cancel.cancel();
    if tokio::time::timeout(SHUTDOWN_GRACE, dispatcher).await.is_err() {
        warn!(grace = ?SHUTDOWN_GRACE, "dispatcher did not stop in time");
    }

    Ok(())
}

/// Write every event of one ticket to stdout, then the closing `end` frame.
async fn print_stream(mut events: TicketEvents) -> anyhow::Result<()> {
    let request_id = events.request_id();

    while let Some(event) = events.next().await {
        write_frame(request_id, &event)?;
    }
    write_frame(request_id, &TicketEvent::End)
}

fn write_frame(request_id: RequestId, event: &TicketEvent) -> anyhow::Result<()> {
    let payload = event.encode()?;

    let mut out = std::io::stdout().lock();
    write!(out, "id: {request_id}\n{}", sse_frame(&payload))?;
    out.flush()?;
    Ok(())
}
