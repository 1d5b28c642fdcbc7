//! Renders the simulator input file for a [`SimulationInput`].
//!
//! The directive set and order are fixed; only the fight style, bloodlust
//! override, scaling block, sanitized profile and target count vary.

use crate::models::SimulationInput;

/// Stats the simulator computes scale factors for when scaling is enabled.
pub const SCALE_STATS: &str = "str,agi,int,crit,haste,mastery,vers";

pub fn render_config(input: &SimulationInput) -> String {
    let mut out = String::new();

    push_line(&mut out, "item_db_source=local");
    push_line(&mut out, "target_error=0");
    push_line(&mut out, "iterations=0");
    push_line(&mut out, "default_world_lag=0.1");
    push_line(&mut out, "max_time=300");
    push_line(&mut out, "vary_combat_length=0.2");
    push_line(&mut out, &format!("fight_style={}", input.fight_style()));
    push_line(&mut out, "tmi_window_global=6");
    push_line(&mut out, "target_level+=3");
    push_line(&mut out, "target_race=Humanoid");
    push_line(&mut out, "optimal_raid=0");
    push_line(
        &mut out,
        &format!("override.bloodlust={}", u8::from(input.enable_bloodlust())),
    );
    push_line(&mut out, "override.bleeding=1");
    push_line(&mut out, "override.mortal_wounds=1");
    push_line(&mut out, "threads=4");
    push_line(&mut out, "process_priority=Low");
    if input.enable_scaling() {
        push_line(&mut out, "calculate_scale_factors=1");
        push_line(&mut out, &format!("scale_only={SCALE_STATS}"));
    }
    push_line(&mut out, "statistics_level=1");
    push_line(&mut out, "");

    for line in input.profile() {
        push_line(&mut out, line);
    }

    push_line(&mut out, "");
    push_line(
        &mut out,
        &format!("desired_targets={}", input.number_of_enemies()),
    );
    push_line(&mut out, "dps_plot_stat=none");

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FightStyle;

    const PROFILE: &str = "priest=\"Anduin\"\nlevel=60\nrace=human\nspec=shadow\niterations=9999\n";

    #[test]
    fn renders_exact_text_without_scaling() {
        let input = SimulationInput::new(PROFILE)
            .with_fight_style(FightStyle::HecticAddCleave)
            .with_bloodlust(false)
            .with_number_of_enemies(3)
            .unwrap();

        let expected = "\
item_db_source=local
target_error=0
iterations=0
default_world_lag=0.1
max_time=300
vary_combat_length=0.2
fight_style=HecticAddCleave
tmi_window_global=6
target_level+=3
target_race=Humanoid
optimal_raid=0
override.bloodlust=0
override.bleeding=1
override.mortal_wounds=1
threads=4
process_priority=Low
statistics_level=1

priest=\"Anduin\"
level=60
race=human
spec=shadow

desired_targets=3
dps_plot_stat=none
";
        assert_eq!(render_config(&input), expected);
    }

    #[test]
    fn scaling_block_sits_before_statistics_level() {
        let input = SimulationInput::new(PROFILE).with_scaling(true);
        let config = render_config(&input);

        assert_eq!(config.matches("calculate_scale_factors=1").count(), 1);
        assert!(config.contains(
            "process_priority=Low\ncalculate_scale_factors=1\nscale_only=str,agi,int,crit,haste,mastery,vers\nstatistics_level=1\n"
        ));
        assert!(config.contains("override.bloodlust=1\n"));
    }

    #[test]
    fn scaling_disabled_never_requests_scale_factors() {
        for style in FightStyle::ALL {
            let input = SimulationInput::new(PROFILE).with_fight_style(style);
            let config = render_config(&input);
            assert!(!config.contains("calculate_scale_factors"));
            assert!(config.contains(&format!("fight_style={}\n", style.display_name())));
        }
    }

    #[test]
    fn directives_hidden_behind_carriage_returns_are_dropped() {
        let input = SimulationInput::new("priest=x\rthreads=64\riterations=100000");
        let config = render_config(&input);

        assert!(!config.contains('\r'));
        assert!(!config.contains("threads=64"));
        assert!(!config.contains("iterations=100000"));
        assert!(config.contains("\n\npriest=x\n\ndesired_targets=1\n"));
    }

    #[test]
    fn empty_profile_keeps_the_separator_lines() {
        let config = render_config(&SimulationInput::new(""));
        assert!(config.ends_with("statistics_level=1\n\n\ndesired_targets=1\ndps_plot_stat=none\n"));
    }
}
