//! Allow-list filter for user supplied profile text.
//!
//! Only character definition lines make it into the generated configuration.
//! Anything that could steer the simulator itself (iterations, threads,
//! output paths, ...) is dropped silently before it reaches disk.

use std::str::Split;

const ALLOWED_TOKENS: &[&str] = &[
    // Classes
    "priest",
    "warlock",
    "shaman",
    "druid",
    "warrior",
    "hunter",
    "mage",
    "monk",
    "demonhunter",
    "deathknight",
    "paladin",
    "rogue",
    // Item slots
    "head",
    "neck",
    "shoulder",
    "back",
    "chest",
    "wrist",
    "hands",
    "waist",
    "legs",
    "feet",
    "finger1",
    "finger2",
    "trinket1",
    "trinket2",
    "main_hand",
    "off_hand",
    // Common tokens
    "class",
    "talents",
    "artifact",
    "position",
    "level",
    "role",
    "spec",
    "crucible",
];

/// Allied races the simulator does not implement.
const DENIED_RACES: &[&str] = &[
    "nightborne",
    "lightforged_draenei",
    "highmountain_druid",
    "mechagnome",
];

/// Line terminators: `\n`, `\r\n` and a lone `\r`. The empty piece between
/// `\r` and `\n` is a blank line and gets dropped like any other.
const LINE_BREAKS: [char; 2] = ['\n', '\r'];

/// Lazy, single-pass iterator over the accepted lines of a profile.
pub struct SanitizedProfile<'a> {
    lines: Split<'a, [char; 2]>,
}

impl<'a> SanitizedProfile<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.split(LINE_BREAKS),
        }
    }
}

impl<'a> Iterator for SanitizedProfile<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.by_ref().find(|line| is_accepted(line))
    }
}

/// Decide whether a single profile line may be forwarded to the simulator.
pub fn is_accepted(line: &str) -> bool {
    if line.is_empty() || line.starts_with('#') {
        return false;
    }

    let fields = split_fields(line);
    if fields.len() < 2 {
        return false;
    }

    let token = fields[0];
    if ALLOWED_TOKENS.contains(&token) {
        return true;
    }

    match token {
        "race" => !DENIED_RACES.contains(&fields[1]),
        _ => false,
    }
}

/// `=`-separated fields with trailing empty fields removed, so `talents=`
/// counts as a single field.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split('=').collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(raw: &str) -> Vec<&str> {
        SanitizedProfile::new(raw).collect()
    }

    #[test]
    fn strips_comments_blanks_denied_races_and_unknown_tokens() {
        let raw = "race=nightborne\nclass=priest\n#comment\n\nbadtoken=1\n";
        assert_eq!(sanitize(raw), vec!["class=priest"]);
    }

    #[test]
    fn non_denied_race_passes_through() {
        assert_eq!(sanitize("race=orc\n"), vec!["race=orc"]);
    }

    #[test]
    fn every_denied_race_is_dropped() {
        for race in DENIED_RACES {
            assert!(sanitize(&format!("race={race}")).is_empty(), "{race}");
        }
    }

    #[test]
    fn lines_without_a_value_are_dropped() {
        assert!(sanitize("talents").is_empty());
        assert!(sanitize("talents=").is_empty());
        assert!(sanitize("talents==").is_empty());
        assert_eq!(sanitize("talents==x"), vec!["talents==x"]);
    }

    #[test]
    fn simulator_directives_cannot_be_injected() {
        let raw = "iterations=100000\nthreads=64\nhtml=/etc/passwd\nhead=,id=1\n";
        assert_eq!(sanitize(raw), vec!["head=,id=1"]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let raw = "mage=\"Frosty\"\r\nspec=frost\r\n";
        assert_eq!(sanitize(raw), vec!["mage=\"Frosty\"", "spec=frost"]);
    }

    #[test]
    fn lone_carriage_return_ends_a_line() {
        let raw = "priest=x\rthreads=64\riterations=100000\rspec=holy\n";
        assert_eq!(sanitize(raw), vec!["priest=x", "spec=holy"]);
    }

    #[test]
    fn comment_marker_only_counts_at_line_start() {
        assert_eq!(sanitize("neck=,id=5 # note"), vec!["neck=,id=5 # note"]);
        assert!(sanitize(" #indented=1").is_empty());
    }
}
