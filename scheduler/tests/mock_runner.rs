use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use executor::{RunError, RunOutput, SimulationRunner};

/// Runner that takes `delay` per job and records when and what it ran.
#[derive(Default)]
pub struct SlowRunner {
    pub delay: Duration,
    pub panic_on: Option<String>,
    pub runs: Mutex<Vec<(String, Instant)>>,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
}

impl SlowRunner {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    /// Character names of the profiles run so far, in run order.
    pub fn run_order(&self) -> Vec<String> {
        self.runs.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn start_times(&self) -> Vec<Instant> {
        self.runs.lock().iter().map(|(_, at)| *at).collect()
    }
}

/// Extracts `<name>` from a `priest=<name>` profile line in the config.
pub fn character_name(config: &str) -> String {
    config
        .lines()
        .find_map(|l| l.strip_prefix("priest="))
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl SimulationRunner for SlowRunner {
    async fn run(&self, config: &str, _enable_scaling: bool) -> Result<RunOutput, RunError> {
        let name = character_name(config);
        self.runs.lock().push((name.clone(), Instant::now()));

        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.as_deref() == Some(name.as_str()) {
            panic!("runner blew up on {name}");
        }

        Ok(RunOutput {
            report: format!("<html>{name}</html>"),
            log: None,
        })
    }
}
