use crate::character::PartyMember;
use crate::monsters::Monster;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encounter difficulty tier, ordered from trivial to hopeless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Cakewalk,
    Easy,
    Normal,
    Hard,
    Deadly,
    Impossible,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 6] {
        [
            Difficulty::Cakewalk,
            Difficulty::Easy,
            Difficulty::Normal,
            Difficulty::Hard,
            Difficulty::Deadly,
            Difficulty::Impossible,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Cakewalk => "Cakewalk",
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Deadly => "Deadly",
            Difficulty::Impossible => "Impossible",
        }
    }

    /// First letter, used as the encounter id suffix.
    pub fn letter(&self) -> char {
        match self {
            Difficulty::Cakewalk => 'C',
            Difficulty::Easy => 'E',
            Difficulty::Normal => 'N',
            Difficulty::Hard => 'H',
            Difficulty::Deadly => 'D',
            Difficulty::Impossible => 'I',
        }
    }

    pub fn from_letter(letter: char) -> Option<Difficulty> {
        Self::all().into_iter().find(|d| d.letter() == letter)
    }

    /// How many rounds a fight at this tier is expected to last.
    pub fn expected_rounds(&self) -> u32 {
        match self {
            Difficulty::Cakewalk => 1,
            Difficulty::Easy => 3,
            Difficulty::Normal => 5,
            Difficulty::Hard => 6,
            Difficulty::Deadly => 8,
            Difficulty::Impossible => 10,
        }
    }

    /// The tier directly below, None for Cakewalk.
    pub fn previous(&self) -> Option<Difficulty> {
        match self {
            Difficulty::Cakewalk => None,
            Difficulty::Easy => Some(Difficulty::Cakewalk),
            Difficulty::Normal => Some(Difficulty::Easy),
            Difficulty::Hard => Some(Difficulty::Normal),
            Difficulty::Deadly => Some(Difficulty::Hard),
            Difficulty::Impossible => Some(Difficulty::Deadly),
        }
    }

    /// Uniform draw over all tiers.
    pub fn random(rng: &mut impl Rng) -> Difficulty {
        let tiers = Self::all();
        tiers[rng.gen_range(0..tiers.len())]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
    #[default]
    Undecided,
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Victory => "Victory",
            Outcome::Defeat => "Defeat",
            Outcome::Undecided => "Undecided",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterResult {
    pub outcome: Outcome,
    pub total_rounds: u32,
    pub details: String,
}

/// A labeled training record: one party against one monster group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: String,
    pub difficulty: Difficulty,
    pub party: Vec<PartyMember>,
    pub monsters: Vec<Monster>,
    pub outcome: EncounterResult,
    /// Raw XP of the monster group
    #[serde(default)]
    pub monster_xp: u32,
    /// False when the monster group is only the closest miss of its XP window
    #[serde(default = "exact_by_default")]
    pub exact_budget: bool,
}

fn exact_by_default() -> bool {
    true
}

impl Encounter {
    pub fn new(
        index: u64,
        difficulty: Difficulty,
        party: Vec<PartyMember>,
        monsters: Vec<Monster>,
        outcome: EncounterResult,
    ) -> Self {
        Self {
            id: format_id(index, difficulty),
            difficulty,
            party,
            monster_xp: 0,
            monsters,
            outcome,
            exact_budget: true,
        }
    }

    pub fn with_budget(mut self, monster_xp: u32, exact: bool) -> Self {
        self.monster_xp = monster_xp;
        self.exact_budget = exact;
        self
    }

    pub fn party_levels(&self) -> Vec<u32> {
        self.party.iter().map(|m| m.level).collect()
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.id)
    }
}

/// `E{index:08}-{letter}`, e.g. `E00000042-H`.
pub fn format_id(index: u64, difficulty: Difficulty) -> String {
    format!("E{:08}-{}", index, difficulty.letter())
}
