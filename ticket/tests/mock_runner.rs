use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use executor::{RunError, RunOutput, SimulationRunner};

#[derive(Clone)]
pub enum Behavior {
    Report { report: String, log: Option<String> },
    Timeout,
    IoError(String),
}

/// Records every call and answers with a canned outcome.
pub struct MockRunner {
    behavior: Behavior,
    pub calls: Mutex<Vec<(String, bool)>>,
    pub trace: Arc<Mutex<Vec<&'static str>>>,
}

impl MockRunner {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
            trace: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn report(report: &str) -> Self {
        Self::new(Behavior::Report {
            report: report.to_string(),
            log: None,
        })
    }
}

#[async_trait]
impl SimulationRunner for MockRunner {
    async fn run(&self, config: &str, enable_scaling: bool) -> Result<RunOutput, RunError> {
        self.calls.lock().push((config.to_string(), enable_scaling));
        self.trace.lock().push("run");

        match &self.behavior {
            Behavior::Report { report, log } => Ok(RunOutput {
                report: report.clone(),
                log: log.clone(),
            }),
            Behavior::Timeout => Err(RunError::Timeout(Duration::from_secs(60))),
            Behavior::IoError(msg) => Err(RunError::Io(io::Error::other(msg.clone()))),
        }
    }
}
