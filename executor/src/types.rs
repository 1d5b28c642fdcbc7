//! Common types and the runner abstraction used by tickets.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Anything able to turn a rendered configuration into a report.
///
/// Implementations block the caller for the whole run; the dispatcher relies
/// on that to keep at most one simulation in flight.
#[async_trait]
pub trait SimulationRunner: Send + Sync {
    async fn run(&self, config: &str, enable_scaling: bool) -> Result<RunOutput, RunError>;
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Full contents of the report file.
    pub report: String,
    /// Captured standard output of the simulator, when log capture is on.
    pub log: Option<String>,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Execution timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to launch {}: {source}", executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("simulation exited unsuccessfully ({0})")]
    ExitStatus(ExitStatus),

    #[error("simulation finished without writing a report")]
    MissingReport,

    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Path of the simulator executable.
    pub executable: PathBuf,

    /// Directory that receives the input, report and log files of a run.
    /// The simulator is started with this as its working directory.
    pub work_dir: PathBuf,

    /// Wall clock limit for a run without scale factors.
    pub run_timeout: Duration,

    /// Wall clock limit when scale factors are calculated. Each scaled stat
    /// costs roughly another full run, so this is much larger.
    pub scaling_timeout: Duration,

    /// Redirect the simulator's stdout to a log file and return it.
    pub capture_logs: bool,
}

impl RunnerConfig {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            work_dir: std::env::temp_dir(),
            run_timeout: Duration::from_secs(60),
            scaling_timeout: Duration::from_secs(600),
            capture_logs: true,
        }
    }

    pub fn timeout_for(&self, enable_scaling: bool) -> Duration {
        if enable_scaling {
            self.scaling_timeout
        } else {
            self.run_timeout
        }
    }
}
