//! Reference-data records as they are stored in the JSON document.
//!
//! Records cross-reference each other by `index` strings. They are never mutated after loading.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A "choose K of these indices" block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub choose: usize,
    #[serde(default)]
    pub from: Vec<String>,
}

impl Choice {
    /// Draws up to `choose` distinct entries that are not already in `exclude`.
    pub fn draw(&self, exclude: &[String], rng: &mut impl Rng) -> Vec<String> {
        let open: Vec<&String> = self.from.iter().filter(|i| !exclude.contains(i)).collect();
        open.choose_multiple(rng, self.choose)
            .map(|i| (*i).clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityBonus {
    /// Ability code: str, dex, con, int, wis or cha.
    pub ability: String,
    pub bonus: i32,
}

fn default_speed() -> i32 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceRecord {
    pub index: String,
    pub name: String,
    #[serde(default = "default_speed")]
    pub speed: i32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    #[serde(default)]
    pub starting_proficiencies: Vec<String>,
    #[serde(default)]
    pub starting_proficiency_options: Option<Choice>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub subraces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubraceRecord {
    pub index: String,
    pub name: String,
    pub race: String,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    #[serde(default)]
    pub starting_proficiencies: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitRecord {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub proficiencies: Vec<String>,
    #[serde(default)]
    pub proficiency_choices: Option<Choice>,
    #[serde(default)]
    pub damage_resistances: Vec<String>,
    /// Nested "pick one sub-trait" (e.g. draconic ancestry colours).
    #[serde(default)]
    pub subtrait_options: Option<Choice>,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartingEquipment {
    pub equipment: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

/// Starting-equipment choice: `choose` entries from an option set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentChoice {
    pub choose: usize,
    pub from: OptionSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "option_set_type", rename_all = "snake_case")]
pub enum OptionSet {
    OptionsArray { options: Vec<EquipmentOption> },
    EquipmentCategory { equipment_category: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "option_type", rename_all = "snake_case")]
pub enum EquipmentOption {
    CountedReference { count: u32, of: String },
    Multiple { items: Vec<EquipmentOption> },
    Choice { choice: EquipmentChoice },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub index: String,
    pub name: String,
    pub hit_die: u32,
    /// Ability codes with saving-throw proficiency.
    #[serde(default)]
    pub saving_throws: Vec<String>,
    #[serde(default)]
    pub proficiencies: Vec<String>,
    #[serde(default)]
    pub proficiency_choices: Vec<Choice>,
    #[serde(default)]
    pub starting_equipment: Vec<StartingEquipment>,
    #[serde(default)]
    pub starting_equipment_options: Vec<EquipmentChoice>,
    #[serde(default)]
    pub spellcasting_ability: Option<String>,
    #[serde(default)]
    pub subclasses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubclassRecord {
    pub index: String,
    pub name: String,
    pub class: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellcastingProgression {
    #[serde(default)]
    pub cantrips_known: u32,
    #[serde(default)]
    pub spells_known: u32,
    /// Slots per spell level, index 0 = 1st-level slots.
    #[serde(default)]
    pub spell_slots: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub class: String,
    #[serde(default)]
    pub subclass: Option<String>,
    pub level: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub spellcasting: Option<SpellcastingProgression>,
    #[serde(default)]
    pub class_specific: Option<Map<String, Value>>,
    #[serde(default)]
    pub subclass_specific: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prerequisite {
    Feature { feature: String },
    Spell { spell: String },
    Level { level: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpecific {
    #[serde(default)]
    pub expertise_options: Option<Choice>,
    #[serde(default)]
    pub enemy_type_options: Option<Choice>,
    #[serde(default)]
    pub terrain_type_options: Option<Choice>,
    #[serde(default)]
    pub subfeature_options: Option<Choice>,
    /// Invocation feature indices available to this feature.
    #[serde(default)]
    pub invocations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub index: String,
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub subclass: Option<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub prerequisites: Vec<Prerequisite>,
    #[serde(default)]
    pub feature_specific: Option<FeatureSpecific>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDc {
    pub dc_type: String,
    /// "half" or "none".
    #[serde(default)]
    pub dc_success: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellDamage {
    #[serde(default)]
    pub damage_type: Option<String>,
    #[serde(default)]
    pub damage_at_slot_level: BTreeMap<u32, String>,
    #[serde(default)]
    pub damage_at_character_level: BTreeMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellRecord {
    pub index: String,
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub subclasses: Vec<String>,
    /// "melee" or "ranged" for spell attacks.
    #[serde(default)]
    pub attack_type: Option<String>,
    #[serde(default)]
    pub dc: Option<SpellDc>,
    #[serde(default)]
    pub damage: Option<SpellDamage>,
    #[serde(default)]
    pub heal_at_slot_level: BTreeMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDamage {
    pub damage_dice: String,
    pub damage_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorClassRecord {
    pub base: i32,
    #[serde(default)]
    pub dex_bonus: bool,
    #[serde(default)]
    pub max_bonus: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub index: String,
    pub name: String,
    /// "weapon", "armor" or "adventuring-gear".
    pub equipment_category: String,
    #[serde(default)]
    pub weapon_category: Option<String>,
    #[serde(default)]
    pub weapon_range: Option<String>,
    #[serde(default)]
    pub damage: Option<WeaponDamage>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub armor_category: Option<String>,
    #[serde(default)]
    pub armor_class: Option<ArmorClassRecord>,
    #[serde(default)]
    pub str_minimum: i32,
    #[serde(default)]
    pub stealth_disadvantage: bool,
    #[serde(default)]
    pub gear_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCategoryRecord {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub equipment: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpeed {
    #[serde(default)]
    pub walk: Option<String>,
    #[serde(default)]
    pub swim: Option<String>,
    #[serde(default)]
    pub fly: Option<String>,
    #[serde(default)]
    pub burrow: Option<String>,
    #[serde(default)]
    pub climb: Option<String>,
    #[serde(default)]
    pub hover: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterProficiency {
    /// `skill-<name>` or `saving-throw-<abbr>`.
    pub proficiency: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDamage {
    pub damage_type: String,
    pub damage_dice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDc {
    pub dc_type: String,
    pub dc_value: i32,
    #[serde(default)]
    pub success_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionUsage {
    /// "recharge on roll", "recharge after rest" or "per day".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub times: Option<u32>,
    #[serde(default)]
    pub dice: Option<String>,
    #[serde(default)]
    pub min_value: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiattackEntry {
    pub action_name: String,
    #[serde(default = "one")]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterActionRecord {
    pub name: String,
    #[serde(default)]
    pub attack_bonus: Option<i32>,
    #[serde(default)]
    pub damage: Vec<ActionDamage>,
    #[serde(default)]
    pub dc: Option<ActionDc>,
    #[serde(default)]
    pub usage: Option<ActionUsage>,
    #[serde(default)]
    pub multiattack: Vec<MultiattackEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpellcastingRecord {
    pub ability: String,
    pub dc: i32,
    pub modifier: i32,
    /// Slots per spell level.
    #[serde(default)]
    pub slots: BTreeMap<u32, u32>,
    #[serde(default)]
    pub spells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub armor_class: i32,
    pub hit_points: i32,
    #[serde(default)]
    pub speed: MonsterSpeed,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    #[serde(default)]
    pub proficiencies: Vec<MonsterProficiency>,
    #[serde(default)]
    pub damage_vulnerabilities: Vec<String>,
    #[serde(default)]
    pub damage_resistances: Vec<String>,
    #[serde(default)]
    pub damage_immunities: Vec<String>,
    #[serde(default)]
    pub condition_immunities: Vec<String>,
    pub challenge_rating: f64,
    pub proficiency_bonus: i32,
    pub xp: u32,
    #[serde(default)]
    pub actions: Vec<MonsterActionRecord>,
    #[serde(default)]
    pub spellcasting: Option<MonsterSpellcastingRecord>,
}

/// The complete reference document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceDocument {
    pub races: Vec<RaceRecord>,
    pub subraces: Vec<SubraceRecord>,
    pub traits: Vec<TraitRecord>,
    pub classes: Vec<ClassRecord>,
    pub subclasses: Vec<SubclassRecord>,
    pub levels: Vec<LevelRecord>,
    pub features: Vec<FeatureRecord>,
    pub spells: Vec<SpellRecord>,
    pub equipment: Vec<EquipmentRecord>,
    pub equipment_categories: Vec<EquipmentCategoryRecord>,
    pub monsters: Vec<MonsterRecord>,
}
