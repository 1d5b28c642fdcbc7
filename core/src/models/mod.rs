use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

pub mod simulation_input;

pub use simulation_input::{RequestId, SimulationInput};

/// Encounter archetype handed to the simulator through `fight_style=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FightStyle {
    #[default]
    Patchwerk,
    HecticAddCleave,
    HelterSkelter,
    Ultraxion,
    LightMovement,
    HeavyMovement,
    BeastLord,
    CastingPatchwerk,
}

impl FightStyle {
    pub const ALL: [FightStyle; 8] = [
        FightStyle::Patchwerk,
        FightStyle::HecticAddCleave,
        FightStyle::HelterSkelter,
        FightStyle::Ultraxion,
        FightStyle::LightMovement,
        FightStyle::HeavyMovement,
        FightStyle::BeastLord,
        FightStyle::CastingPatchwerk,
    ];

    /// Name written verbatim into the generated configuration.
    pub fn display_name(&self) -> &'static str {
        match self {
            FightStyle::Patchwerk => "Patchwerk",
            FightStyle::HecticAddCleave => "HecticAddCleave",
            FightStyle::HelterSkelter => "HelterSkelter",
            FightStyle::Ultraxion => "Ultraxion",
            FightStyle::LightMovement => "LightMovement",
            FightStyle::HeavyMovement => "HeavyMovement",
            FightStyle::BeastLord => "BeastLord",
            FightStyle::CastingPatchwerk => "CastingPatchwerk",
        }
    }
}

impl fmt::Display for FightStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FightStyle {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FightStyle::ALL
            .iter()
            .copied()
            .find(|style| style.display_name() == s)
            .ok_or_else(|| InputError::UnknownFightStyle(s.to_string()))
    }
}
