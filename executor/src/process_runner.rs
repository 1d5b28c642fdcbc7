//! Runs the external simulator against a rendered configuration.
//!
//! Every run gets its own input, report and log file in the configured work
//! directory. They are held as [`TempPath`]s, so they are removed when the
//! run returns, whichever way it returns.

use std::io::{self, Write};
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tempfile::{Builder, TempPath};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::types::{RunError, RunOutput, RunnerConfig, SimulationRunner};

pub struct ProcessRunner {
    cfg: RunnerConfig,
}

impl ProcessRunner {
    pub fn new(cfg: RunnerConfig) -> Self {
        Self { cfg }
    }

    async fn execute(
        &self,
        files: &ScratchFiles,
        enable_scaling: bool,
    ) -> Result<RunOutput, RunError> {
        let limit = self.cfg.timeout_for(enable_scaling);
        let input_name = display_name(&files.input);
        let report_name = display_name(&files.report);

        let stdout = match &files.log {
            Some((_, handle)) => Stdio::from(handle.try_clone()?),
            None => Stdio::null(),
        };

        let mut cmd = Command::new(&self.cfg.executable);
        cmd.current_dir(&self.cfg.work_dir)
            .arg(&input_name)
            .arg(format!("html={report_name}"))
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
            executable: self.cfg.executable.clone(),
            source,
        })?;

        info!(
            pid = child.id(),
            input = %input_name,
            report = %report_name,
            timeout_ms = limit.as_millis() as u64,
            "simulation started"
        );

        let status = match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => status?,
            Err(_elapsed) => {
                // Kill and reap before the scratch files go away.
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "failed to kill timed out simulation");
                }
                if let Err(e) = child.wait().await {
                    warn!(error = %e, "failed to reap killed simulation");
                }
                warn!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "simulation timed out and was killed"
                );
                return Err(RunError::Timeout(limit));
            }
        };

        debug!(
            %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "simulation exited"
        );

        if !status.success() {
            return Err(RunError::ExitStatus(status));
        }

        let report = match tokio::fs::read(&files.report).await {
            Ok(bytes) => lossy(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(RunError::MissingReport),
            Err(e) => return Err(e.into()),
        };
        let log = match &files.log {
            Some((path, _)) => Some(lossy(tokio::fs::read(path).await?)),
            None => None,
        };

        Ok(RunOutput { report, log })
    }
}

#[async_trait]
impl SimulationRunner for ProcessRunner {
    async fn run(&self, config: &str, enable_scaling: bool) -> Result<RunOutput, RunError> {
        let files = ScratchFiles::create(&self.cfg.work_dir, config, self.cfg.capture_logs)?;
        self.execute(&files, enable_scaling).await
    }
}

/// Per-run files. Dropping this removes all of them.
struct ScratchFiles {
    input: TempPath,
    report: TempPath,
    log: Option<(TempPath, std::fs::File)>,
}

impl ScratchFiles {
    fn create(dir: &Path, config: &str, capture_logs: bool) -> Result<Self, RunError> {
        let mut input = Builder::new()
            .prefix("simc_input_")
            .suffix(".txt")
            .tempfile_in(dir)?;
        input.write_all(config.as_bytes())?;
        input.flush()?;
        let input = input.into_temp_path();

        // Only the name is reserved; the simulator creates the report itself.
        let report = Builder::new()
            .prefix("simc_output_")
            .suffix(".html")
            .make_in(dir, |path| {
                if path.exists() {
                    Err(io::Error::from(io::ErrorKind::AlreadyExists))
                } else {
                    Ok(())
                }
            })?
            .into_temp_path();

        let log = if capture_logs {
            let named = Builder::new()
                .prefix("simc_logs_")
                .suffix(".txt")
                .tempfile_in(dir)?;
            let handle = named.as_file().try_clone()?;
            Some((named.into_temp_path(), handle))
        } else {
            None
        };

        Ok(Self { input, report, log })
    }
}

/// Simulator output is not guaranteed to be valid UTF-8.
fn lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
