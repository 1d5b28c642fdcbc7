use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use executor::RunnerConfig;

use crate::engine::DEFAULT_DISPATCH_INTERVAL;
use crate::queue::DEFAULT_QUEUE_CAPACITY;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// How the simulator binary is invoked, where its scratch files live and
    /// how long a run may take.
    pub runner: RunnerConfig,

    /// Maximum number of tickets waiting for the dispatcher. Submissions
    /// beyond this are rejected immediately with a queue-full error.
    pub queue_capacity: usize,

    /// Wake period of the dispatcher loop.
    ///
    /// A new job starts at most once per period, and never before the
    /// previous job has finished.
    pub dispatch_interval: Duration,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let executable = std::env::var("SIMC_EXECUTABLE").unwrap_or_else(|_| "simc".to_string());

        let mut runner = RunnerConfig::new(executable);
        if let Ok(dir) = std::env::var("SIMC_WORK_DIR") {
            runner.work_dir = PathBuf::from(dir);
        }
        runner.run_timeout = Duration::from_secs(env_or("SIMC_RUN_TIMEOUT_SECS", 60));
        runner.scaling_timeout = Duration::from_secs(env_or("SIMC_SCALING_TIMEOUT_SECS", 600));
        runner.capture_logs = env_or("SIMC_CAPTURE_LOGS", true);

        Self {
            runner,
            queue_capacity: env_or("SIMC_QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY),
            dispatch_interval: Duration::from_millis(env_or(
                "SIMC_DISPATCH_INTERVAL_MS",
                DEFAULT_DISPATCH_INTERVAL.as_millis() as u64,
            )),
        }
    }
}

/// Parse `key` from the environment, keeping `default` when it is unset or
/// malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring malformed environment value");
            default
        }),
        Err(_) => default,
    }
}
