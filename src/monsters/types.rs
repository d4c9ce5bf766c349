use crate::character::spellcasting::{highest_slot_level, Spell};
use crate::character::{monster_skills, AttributeType, Attributes, Skill};
use crate::core::constants::HOVER_SPEED_VALUE;
use crate::core::error::Result;
use crate::reference::{
    ActionDamage, ActionDc, ActionUsage, MonsterActionRecord, MonsterRecord, MonsterSpeed,
    MultiattackEntry, ReferenceData,
};
use serde::{Deserialize, Serialize};

const SAVE_PREFIX: &str = "saving-throw-";

/// A stat-block action, tagged by how it lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonsterAction {
    /// Attack roll against AC.
    Attack {
        name: String,
        attack_bonus: i32,
        damage: Vec<ActionDamage>,
        #[serde(default)]
        usage: Option<ActionUsage>,
    },
    /// Saving throw against a DC.
    SavingThrow {
        name: String,
        dc: ActionDc,
        damage: Vec<ActionDamage>,
        #[serde(default)]
        usage: Option<ActionUsage>,
    },
    /// Several other actions in one turn.
    Multiattack {
        name: String,
        entries: Vec<MultiattackEntry>,
    },
    /// Anything without damage.
    Utility { name: String },
}

impl MonsterAction {
    pub fn from_record(record: &MonsterActionRecord) -> Self {
        let name = record.name.clone();
        if !record.multiattack.is_empty() {
            return MonsterAction::Multiattack {
                name,
                entries: record.multiattack.clone(),
            };
        }
        if record.damage.is_empty() {
            return MonsterAction::Utility { name };
        }
        match (record.attack_bonus, &record.dc) {
            (Some(attack_bonus), _) => MonsterAction::Attack {
                name,
                attack_bonus,
                damage: record.damage.clone(),
                usage: record.usage.clone(),
            },
            (None, Some(dc)) => MonsterAction::SavingThrow {
                name,
                dc: dc.clone(),
                damage: record.damage.clone(),
                usage: record.usage.clone(),
            },
            (None, None) => MonsterAction::Utility { name },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MonsterAction::Attack { name, .. }
            | MonsterAction::SavingThrow { name, .. }
            | MonsterAction::Multiattack { name, .. }
            | MonsterAction::Utility { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpellcasting {
    pub ability: String,
    pub dc: i32,
    pub modifier: i32,
    /// Slots per spell level, index 0 = 1st level.
    pub slots: Vec<u32>,
    pub spells: Vec<Spell>,
}

impl MonsterSpellcasting {
    pub fn highest_slot_level(&self) -> u32 {
        highest_slot_level(&self.slots)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: String,
    pub index: String,
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub challenge_rating: f64,
    pub xp: u32,
    pub hit_points: i32,
    pub armor_class: i32,
    pub proficiency_bonus: i32,
    pub speed: MonsterSpeed,
    pub attributes: Attributes,
    pub skills: Vec<Skill>,
    pub resistances: Vec<String>,
    pub immunities: Vec<String>,
    pub vulnerabilities: Vec<String>,
    pub condition_immunities: Vec<String>,
    pub actions: Vec<MonsterAction>,
    pub spellcasting: Option<MonsterSpellcasting>,
}

impl Monster {
    /// Builds monster number `number` (1-based) from its stat block.
    ///
    /// Spells named by the spellcasting block must exist in the reference data.
    pub fn from_record(
        record: &MonsterRecord,
        number: usize,
        data: &ReferenceData,
    ) -> Result<Self> {
        let mut attributes = Attributes::from_values([
            record.strength,
            record.dexterity,
            record.constitution,
            record.intelligence,
            record.wisdom,
            record.charisma,
        ]);

        // Listed saves replace the derived ones
        let mut listed_skills = Vec::new();
        for prof in &record.proficiencies {
            if let Some(code) = prof.proficiency.strip_prefix(SAVE_PREFIX) {
                if let Some(attr) = AttributeType::from_code(code) {
                    attributes.get_mut(attr).set_save(prof.value);
                }
            } else if Skill::is_skill_index(&prof.proficiency) {
                listed_skills.push((prof.proficiency.clone(), prof.value));
            }
        }

        let spellcasting = match &record.spellcasting {
            Some(block) => {
                let mut spells = Vec::with_capacity(block.spells.len());
                for index in &block.spells {
                    spells.push(Spell::from_record(data.spell(index)?));
                }
                let top = block.slots.keys().max().copied().unwrap_or(0) as usize;
                let mut slots = vec![0; top];
                for (&level, &count) in &block.slots {
                    if level >= 1 {
                        slots[level as usize - 1] = count;
                    }
                }
                Some(MonsterSpellcasting {
                    ability: block.ability.clone(),
                    dc: block.dc,
                    modifier: block.modifier,
                    slots,
                    spells,
                })
            }
            None => None,
        };

        Ok(Self {
            id: format!("monster-{}", number),
            index: record.index.clone(),
            name: record.name.clone(),
            size: record.size.clone(),
            kind: record.kind.clone(),
            challenge_rating: record.challenge_rating,
            xp: record.xp,
            hit_points: record.hit_points,
            armor_class: record.armor_class,
            proficiency_bonus: record.proficiency_bonus,
            speed: record.speed.clone(),
            skills: monster_skills(&attributes, &listed_skills),
            attributes,
            resistances: record.damage_resistances.clone(),
            immunities: record.damage_immunities.clone(),
            vulnerabilities: record.damage_vulnerabilities.clone(),
            condition_immunities: record.condition_immunities.clone(),
            actions: record.actions.iter().map(MonsterAction::from_record).collect(),
            spellcasting,
        })
    }

    pub fn action(&self, name: &str) -> Option<&MonsterAction> {
        self.actions.iter().find(|a| a.name() == name)
    }

    /// Movement score: walk + fly, half of swim/burrow/climb, flat bonus for hover.
    pub fn speed_value(&self) -> f64 {
        let feet = |s: &Option<String>| s.as_deref().map(parse_feet).unwrap_or(0) as f64;
        let speed = &self.speed;
        let mut value = feet(&speed.walk) + feet(&speed.fly);
        value += (feet(&speed.swim) + feet(&speed.burrow) + feet(&speed.climb)) * 0.5;
        if speed.hover {
            value += HOVER_SPEED_VALUE as f64;
        }
        value
    }

    /// Sum of modifiers of the skills the stat block lists.
    pub fn proficient_skill_total(&self) -> i32 {
        self.skills
            .iter()
            .filter(|s| s.proficient)
            .map(|s| s.modifier)
            .sum()
    }
}

/// Leading number of a speed string such as `"30 ft."`; 0 when absent.
pub fn parse_feet(speed: &str) -> i32 {
    speed
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}
