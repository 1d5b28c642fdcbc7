use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use corelib::{FightStyle, SimulationInput};
use scheduler::ServiceConfig;

#[derive(Debug, Parser)]
#[clap(name = "simqueue", version)]
pub struct Cli {
    /// Profile file to simulate; repeat for several tickets. `-` reads stdin.
    #[clap(long = "profile", required = true)]
    pub profiles: Vec<PathBuf>,

    /// Simulator executable (overrides SIMC_EXECUTABLE)
    #[clap(long)]
    pub executable: Option<PathBuf>,

    /// Directory for per-run scratch files (overrides SIMC_WORK_DIR)
    #[clap(long)]
    pub work_dir: Option<PathBuf>,

    #[clap(long, default_value = "Patchwerk")]
    pub fight_style: FightStyle,

    /// Disable the bloodlust override
    #[clap(long)]
    pub no_bloodlust: bool,

    /// Calculate scale factors (much slower)
    #[clap(long)]
    pub scaling: bool,

    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub enemies: u32,

    /// Dispatcher wake period in milliseconds (overrides SIMC_DISPATCH_INTERVAL_MS)
    #[clap(long)]
    pub interval_ms: Option<u64>,

    /// Pending ticket limit (overrides SIMC_QUEUE_CAPACITY)
    #[clap(long)]
    pub queue_capacity: Option<usize>,
}

impl Cli {
    /// Environment defaults with command line overrides applied on top.
    pub fn service_config(&self) -> ServiceConfig {
        let mut cfg = ServiceConfig::from_env();

        if let Some(exe) = &self.executable {
            cfg.runner.executable = exe.clone();
        }
        if let Some(dir) = &self.work_dir {
            cfg.runner.work_dir = dir.clone();
        }
        if let Some(ms) = self.interval_ms {
            cfg.dispatch_interval = Duration::from_millis(ms);
        }
        if let Some(capacity) = self.queue_capacity {
            cfg.queue_capacity = capacity;
        }

        cfg
    }

    /// One input per `--profile`, all sharing the fight settings.
    pub fn build_inputs(&self) -> anyhow::Result<Vec<SimulationInput>> {
        self.profiles
            .iter()
            .map(|path| {
                let profile = read_profile(path)?;
                let input = SimulationInput::new(profile)
                    .with_fight_style(self.fight_style)
                    .with_bloodlust(!self.no_bloodlust)
                    .with_scaling(self.scaling)
                    .with_number_of_enemies(self.enemies)?;
                Ok(input)
            })
            .collect()
    }
}

fn read_profile(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read profile from stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fight_settings() {
        let cli = Cli::try_parse_from([
            "simqueue",
            "--profile",
            "a.simc",
            "--profile",
            "b.simc",
            "--fight-style",
            "HecticAddCleave",
            "--no-bloodlust",
            "--scaling",
            "--enemies",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.profiles.len(), 2);
        assert_eq!(cli.fight_style, FightStyle::HecticAddCleave);
        assert!(cli.no_bloodlust);
        assert!(cli.scaling);
        assert_eq!(cli.enemies, 5);
    }

    #[test]
    fn rejects_zero_enemies_and_unknown_styles() {
        assert!(Cli::try_parse_from(["simqueue", "--profile", "a", "--enemies", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["simqueue", "--profile", "a", "--fight-style", "Raid"]).is_err()
        );
    }

    #[test]
    fn flags_override_service_config() {
        let cli = Cli::try_parse_from([
            "simqueue",
            "--profile",
            "a",
            "--executable",
            "/opt/simc/simc",
            "--interval-ms",
            "250",
            "--queue-capacity",
            "3",
        ])
        .unwrap();

        let cfg = cli.service_config();
        assert_eq!(cfg.runner.executable, PathBuf::from("/opt/simc/simc"));
        assert_eq!(cfg.dispatch_interval, Duration::from_millis(250));
        assert_eq!(cfg.queue_capacity, 3);
    }
}
