pub mod process_runner;
pub mod types;

pub use process_runner::ProcessRunner;
pub use types::{RunError, RunOutput, RunnerConfig, SimulationRunner};
