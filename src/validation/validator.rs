//! Structural checks on generated encounters.

use crate::character::{AttributeType, PartyMember};
use crate::core::constants::{MAX_LEVEL, MAX_MONSTERS, MAX_PARTY_SIZE, MIN_LEVEL, NUM_SKILLS};
use crate::encounter::{Difficulty, Encounter, Outcome};
use crate::monsters::Monster;
use serde::{Deserialize, Serialize};

const ID_DIGITS: usize = 8;

/// True for ids shaped `E########-X`: eight digits and one uppercase letter.
pub fn is_valid_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() == ID_DIGITS + 3
        && bytes[0] == b'E'
        && bytes[1..=ID_DIGITS].iter().all(u8::is_ascii_digit)
        && bytes[ID_DIGITS + 1] == b'-'
        && bytes[ID_DIGITS + 2].is_ascii_uppercase()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub encounter_id: String,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Bounds a party member's numbers must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberBounds {
    /// Upper bound for STR and CON, which features can push past 20
    pub max_physical: i32,
    pub max_other: i32,
    pub min_hit_points: i32,
    pub min_armor_class: i32,
    pub min_proficiency: i32,
    pub min_hit_die: u32,
    pub max_hit_die: u32,
    pub min_speed: i32,
    pub min_initiative: i32,
}

impl Default for MemberBounds {
    fn default() -> Self {
        Self {
            max_physical: 24,
            max_other: 20,
            min_hit_points: 5,
            min_armor_class: 9,
            min_proficiency: 2,
            min_hit_die: 6,
            max_hit_die: 12,
            min_speed: 25,
            min_initiative: -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterValidator {
    pub max_party_size: usize,
    pub max_monsters: usize,
    pub member: MemberBounds,
}

impl Default for EncounterValidator {
    fn default() -> Self {
        Self {
            max_party_size: MAX_PARTY_SIZE,
            max_monsters: MAX_MONSTERS,
            member: MemberBounds::default(),
        }
    }
}

impl EncounterValidator {
    pub fn validate_encounter(&self, encounter: &Encounter) -> ValidationResult {
        let mut errors = Vec::new();

        if !is_valid_id(&encounter.id) {
            errors.push(format!("malformed id '{}'", encounter.id));
        } else if encounter.id.chars().last().and_then(Difficulty::from_letter)
            != Some(encounter.difficulty)
        {
            errors.push(format!(
                "id suffix does not match difficulty {}",
                encounter.difficulty
            ));
        }

        let party_size = encounter.party.len();
        if party_size == 0 || party_size > self.max_party_size {
            errors.push(format!(
                "party size {} outside 1..={}",
                party_size, self.max_party_size
            ));
        }
        for member in &encounter.party {
            self.check_member(member, &mut errors);
        }

        let monster_count = encounter.monsters.len();
        if monster_count == 0 || monster_count > self.max_monsters {
            errors.push(format!(
                "monster count {} outside 1..={}",
                monster_count, self.max_monsters
            ));
        }
        for monster in &encounter.monsters {
            check_monster(monster, &mut errors);
        }

        if encounter.outcome.outcome == Outcome::Undecided {
            errors.push("outcome is undecided".to_string());
        }

        ValidationResult {
            encounter_id: encounter.id.clone(),
            errors,
        }
    }

    fn check_member(&self, member: &PartyMember, errors: &mut Vec<String>) {
        let bounds = &self.member;
        let who = &member.id;

        if member.class.is_empty() {
            errors.push(format!("{}: empty class", who));
        }
        if member.race.is_empty() {
            errors.push(format!("{}: empty race", who));
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&member.level) {
            errors.push(format!("{}: level {} outside 1..=20", who, member.level));
        }

        for attr in AttributeType::all() {
            let max = match attr {
                AttributeType::Strength | AttributeType::Constitution => bounds.max_physical,
                _ => bounds.max_other,
            };
            let value = member.attributes.value(attr);
            if !(1..=max).contains(&value) {
                errors.push(format!(
                    "{}: {} {} outside 1..={}",
                    who,
                    attr.abbrev(),
                    value,
                    max
                ));
            }
        }

        if member.hit_points < bounds.min_hit_points {
            errors.push(format!(
                "{}: hit points {} below {}",
                who, member.hit_points, bounds.min_hit_points
            ));
        }
        if member.armor_class < bounds.min_armor_class {
            errors.push(format!(
                "{}: armor class {} below {}",
                who, member.armor_class, bounds.min_armor_class
            ));
        }
        if member.proficiency_bonus < bounds.min_proficiency {
            errors.push(format!(
                "{}: proficiency bonus {} below {}",
                who, member.proficiency_bonus, bounds.min_proficiency
            ));
        }
        if member.skills.len() != NUM_SKILLS {
            errors.push(format!(
                "{}: {} skills instead of {}",
                who, member.skills.len(), NUM_SKILLS
            ));
        }
        if !(bounds.min_hit_die..=bounds.max_hit_die).contains(&member.hit_die) {
            errors.push(format!(
                "{}: hit die d{} outside d{}..=d{}",
                who, member.hit_die, bounds.min_hit_die, bounds.max_hit_die
            ));
        }
        if member.speed < bounds.min_speed {
            errors.push(format!("{}: speed {} below {}", who, member.speed, bounds.min_speed));
        }
        if member.initiative < bounds.min_initiative {
            errors.push(format!(
                "{}: initiative {} below {}",
                who, member.initiative, bounds.min_initiative
            ));
        }
    }
}

fn check_monster(monster: &Monster, errors: &mut Vec<String>) {
    if monster.name.trim().is_empty() {
        errors.push(format!("{}: empty monster name", monster.id));
    }
}
