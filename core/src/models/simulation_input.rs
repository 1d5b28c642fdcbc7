use uuid::Uuid;

use crate::error::InputError;
use crate::models::FightStyle;
use crate::profile::SanitizedProfile;

pub type RequestId = Uuid;

/// One requested simulation. Immutable once built; the request id is minted
/// at construction and identifies the ticket for its whole lifetime.
#[derive(Debug, Clone)]
pub struct SimulationInput {
    request_id: RequestId,
    enable_bloodlust: bool,
    enable_scaling: bool,
    number_of_enemies: u32,
    fight_style: FightStyle,
    profile: String,
}

impl SimulationInput {
    /// Bloodlust on, scaling off, a single Patchwerk target.
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            enable_bloodlust: true,
            enable_scaling: false,
            number_of_enemies: 1,
            fight_style: FightStyle::default(),
            profile: profile.into(),
        }
    }

    pub fn with_bloodlust(mut self, enabled: bool) -> Self {
        self.enable_bloodlust = enabled;
        self
    }

    pub fn with_scaling(mut self, enabled: bool) -> Self {
        self.enable_scaling = enabled;
        self
    }

    pub fn with_fight_style(mut self, style: FightStyle) -> Self {
        self.fight_style = style;
        self
    }

    pub fn with_number_of_enemies(mut self, count: u32) -> Result<Self, InputError> {
        if count == 0 {
            return Err(InputError::InvalidEnemyCount(count));
        }
        self.number_of_enemies = count;
        Ok(self)
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn enable_bloodlust(&self) -> bool {
        self.enable_bloodlust
    }

    pub fn enable_scaling(&self) -> bool {
        self.enable_scaling
    }

    pub fn number_of_enemies(&self) -> u32 {
        self.number_of_enemies
    }

    pub fn fight_style(&self) -> FightStyle {
        self.fight_style
    }

    /// Single-pass view of the profile lines that survive sanitization.
    pub fn profile(&self) -> SanitizedProfile<'_> {
        SanitizedProfile::new(&self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_plain_single_target_fight() {
        let input = SimulationInput::new("priest=\"x\"");
        assert!(input.enable_bloodlust());
        assert!(!input.enable_scaling());
        assert_eq!(input.number_of_enemies(), 1);
        assert_eq!(input.fight_style(), FightStyle::Patchwerk);
    }

    #[test]
    fn request_ids_are_unique_and_stable() {
        let a = SimulationInput::new("");
        let b = SimulationInput::new("");
        assert_ne!(a.request_id(), b.request_id());

        let id = a.request_id();
        let a = a.with_scaling(true).with_bloodlust(false);
        assert_eq!(a.request_id(), id);
    }

    #[test]
    fn zero_enemies_is_rejected() {
        let err = SimulationInput::new("").with_number_of_enemies(0).unwrap_err();
        assert_eq!(err, InputError::InvalidEnemyCount(0));
    }
}
