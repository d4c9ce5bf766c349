//! Party member assembly: identity, attributes, equipment, traits, progression, derived stats.

use super::attributes::{
    apply_ability_bonuses, apply_save_proficiencies, assign_standard_array, AttributeType,
    Attributes,
};
use super::derived_stats::{apply_diamond_soul, feature_defenses, DerivedStats};
use super::equipment::resolve_loadout;
use super::progression::{resolve_progression, Feature, ProgressionInput};
use super::skills::{standard_skills, Skill};
use super::spellcasting::SpellBook;
use super::traits::{resolve_proficiencies, resolve_traits, trait_resistances};
use crate::core::constants::{BASE_PROFICIENCY_BONUS, LEVELS_PER_PROFICIENCY_STEP};
use crate::core::error::{GenError, Result};
use crate::items::Loadout;
use crate::reference::{ClassRecord, RaceRecord, ReferenceData};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Proficiency bonus for a character level: 2 + (level - 1) / 4.
pub fn proficiency_bonus(level: u32) -> i32 {
    BASE_PROFICIENCY_BONUS + (level.max(1) as i32 - 1) / LEVELS_PER_PROFICIENCY_STEP as i32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyMember {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub class: String,
    pub subclass: Option<String>,
    pub race: String,
    pub subrace: Option<String>,
    pub hit_die: u32,
    pub proficiency_bonus: i32,
    pub attributes: Attributes,
    pub skills: Vec<Skill>,
    pub hit_points: i32,
    pub armor_class: i32,
    pub initiative: i32,
    pub speed: i32,
    pub traits: Vec<String>,
    pub proficiencies: Vec<String>,
    pub resistances: Vec<String>,
    pub immunities: Vec<String>,
    pub vulnerabilities: Vec<String>,
    pub features: Vec<Feature>,
    pub spellcasting_ability: Option<AttributeType>,
    pub spellbook: SpellBook,
    pub class_specific: Map<String, Value>,
    pub subclass_specific: Map<String, Value>,
    pub loadout: Loadout,
}

impl PartyMember {
    pub fn has_feature(&self, index: &str) -> bool {
        self.features.iter().any(|f| f.index == index)
    }

    pub fn is_proficient(&self, index: &str) -> bool {
        self.proficiencies.iter().any(|p| p == index)
    }

    /// Modifier of the spellcasting ability, 0 for non-casters.
    pub fn spellcasting_modifier(&self) -> i32 {
        self.spellcasting_ability
            .map(|a| self.attributes.modifier(a))
            .unwrap_or(0)
    }
}

/// Builds random party members from reference data.
///
/// Class and race can be pinned, which the tests rely on.
pub struct CharacterBuilder<'a> {
    data: &'a ReferenceData,
    class: Option<String>,
    race: Option<String>,
}

impl<'a> CharacterBuilder<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        Self {
            data,
            class: None,
            race: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    fn pick_class(&self, rng: &mut impl Rng) -> Result<&'a ClassRecord> {
        match &self.class {
            Some(index) => self.data.class(index),
            None => {
                let classes: Vec<&ClassRecord> = self.data.classes().collect();
                classes
                    .choose(rng)
                    .copied()
                    .ok_or_else(|| GenError::Configuration("no classes in reference data".into()))
            }
        }
    }

    fn pick_race(&self, rng: &mut impl Rng) -> Result<&'a RaceRecord> {
        match &self.race {
            Some(index) => self.data.race(index),
            None => {
                let races: Vec<&RaceRecord> = self.data.races().collect();
                races
                    .choose(rng)
                    .copied()
                    .ok_or_else(|| GenError::Configuration("no races in reference data".into()))
            }
        }
    }

    /// Builds member number `number` (1-based) at `level`.
    pub fn build(&self, number: usize, level: u32, rng: &mut impl Rng) -> Result<PartyMember> {
        let data = self.data;

        // Identity
        let class = self.pick_class(rng)?;
        let race = self.pick_race(rng)?;
        let subclass = match class.subclasses.choose(rng) {
            Some(index) => Some(data.subclass(index)?),
            None => None,
        };
        let subrace = match race.subraces.choose(rng) {
            Some(index) => Some(data.subrace(index)?),
            None => None,
        };

        // Attributes (before level bonuses)
        let mut attributes = assign_standard_array(rng);
        apply_ability_bonuses(&mut attributes, &race.ability_bonuses);
        if let Some(subrace) = subrace {
            apply_ability_bonuses(&mut attributes, &subrace.ability_bonuses);
        }

        // Equipment
        let loadout = resolve_loadout(
            class,
            attributes.value(AttributeType::Strength),
            data,
            rng,
        )?;

        // Traits and proficiencies
        let trait_records = resolve_traits(race, subrace, data, rng)?;
        let traits: Vec<String> = trait_records.iter().map(|t| t.index.clone()).collect();
        let mut resistances = trait_resistances(&trait_records);
        let proficiencies = resolve_proficiencies(race, subrace, class, &trait_records, rng);

        // Progression
        let subclass_index = subclass.map(|s| s.index.as_str());
        let progression = resolve_progression(
            ProgressionInput {
                class,
                subclass: subclass_index,
                level,
                proficiencies: &proficiencies,
                traits: &traits,
            },
            &mut attributes,
            data,
            rng,
        )?;

        // Saves
        let proficiency_bonus = proficiency_bonus(level);
        apply_save_proficiencies(&mut attributes, &class.saving_throws, proficiency_bonus);
        if progression.has_feature("diamond-soul") {
            apply_diamond_soul(&mut attributes, &class.saving_throws, proficiency_bonus);
        }

        // Derived stats
        let derived = DerivedStats::calculate(
            &attributes,
            &loadout,
            level,
            class.hit_die,
            race.speed,
            &traits,
            &progression.features,
            rng,
        );
        let mut immunities = Vec::new();
        feature_defenses(
            &progression.features,
            &mut resistances,
            &mut immunities,
            rng,
        );
        let skills = standard_skills(
            &attributes,
            proficiency_bonus,
            &proficiencies,
            &progression.expertise(),
        );

        let member = PartyMember {
            id: format!("member-{}", number),
            name: format!("{} {}", race.name, class.name),
            level,
            class: class.index.clone(),
            subclass: subclass.map(|s| s.index.clone()),
            race: race.index.clone(),
            subrace: subrace.map(|s| s.index.clone()),
            hit_die: class.hit_die,
            proficiency_bonus,
            attributes,
            skills,
            hit_points: derived.hit_points,
            armor_class: derived.armor_class,
            initiative: derived.initiative,
            speed: derived.speed,
            traits,
            proficiencies,
            resistances,
            immunities,
            vulnerabilities: Vec::new(),
            features: progression.features,
            spellcasting_ability: class
                .spellcasting_ability
                .as_deref()
                .and_then(AttributeType::from_code),
            spellbook: progression.spellbook,
            class_specific: progression.class_specific,
            subclass_specific: progression.subclass_specific,
            loadout,
        };

        tracing::debug!(
            id = %member.id,
            class = %member.class,
            race = %member.race,
            level,
            hp = member.hit_points,
            ac = member.armor_class,
            "built party member"
        );
        Ok(member)
    }
}
