//! Runtime spells, the spells-known formula and random spell draws.

use super::attributes::{AttributeType, Attributes};
use crate::reference::{ReferenceData, SpellDamage, SpellDc, SpellRecord};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A spell as carried by a combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub index: String,
    pub name: String,
    pub level: u32,
    pub attack_type: Option<String>,
    pub dc: Option<SpellDc>,
    pub damage: Option<SpellDamage>,
    #[serde(default)]
    pub heal_at_slot_level: BTreeMap<u32, String>,
    /// Uses per long rest, when the spell is not cast from slots.
    #[serde(default)]
    pub uses_per_long_rest: Option<u32>,
}

impl Spell {
    pub fn from_record(record: &SpellRecord) -> Self {
        Self {
            index: record.index.clone(),
            name: record.name.clone(),
            level: record.level,
            attack_type: record.attack_type.clone(),
            dc: record.dc.clone(),
            damage: record.damage.clone(),
            heal_at_slot_level: record.heal_at_slot_level.clone(),
            uses_per_long_rest: None,
        }
    }

    /// A spell usable a fixed number of times per long rest.
    pub fn limited(record: &SpellRecord, uses: u32) -> Self {
        Self {
            uses_per_long_rest: Some(uses),
            ..Self::from_record(record)
        }
    }

    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    pub fn deals_damage(&self) -> bool {
        self.damage.as_ref().is_some_and(|d| {
            !d.damage_at_slot_level.is_empty() || !d.damage_at_character_level.is_empty()
        })
    }

    pub fn heals(&self) -> bool {
        !self.heal_at_slot_level.is_empty()
    }

    pub fn damage_type(&self) -> Option<&str> {
        self.damage.as_ref().and_then(|d| d.damage_type.as_deref())
    }

    /// True when a successful save still takes half damage.
    pub fn half_on_save(&self) -> bool {
        self.dc.as_ref().is_some_and(|dc| dc.dc_success == "half")
    }
}

/// Slots plus everything a caster knows, split into cantrips and leveled spells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellBook {
    /// Slots per spell level, index 0 = 1st level.
    pub slots: Vec<u32>,
    pub cantrips: Vec<Spell>,
    pub spells: Vec<Spell>,
}

impl SpellBook {
    /// Adds a spell to the matching list unless it is already known.
    pub fn learn(&mut self, spell: Spell) {
        if self.knows(&spell.index) {
            return;
        }
        if spell.is_cantrip() {
            self.cantrips.push(spell);
        } else {
            self.spells.push(spell);
        }
    }

    pub fn knows(&self, index: &str) -> bool {
        self.all().any(|s| s.index == index)
    }

    pub fn all(&self) -> impl Iterator<Item = &Spell> {
        self.cantrips.iter().chain(self.spells.iter())
    }

    pub fn highest_slot_level(&self) -> u32 {
        highest_slot_level(&self.slots)
    }

    pub fn is_empty(&self) -> bool {
        self.cantrips.is_empty() && self.spells.is_empty()
    }
}

/// Highest spell level with at least one slot (0 without slots).
pub fn highest_slot_level(slots: &[u32]) -> u32 {
    slots
        .iter()
        .rposition(|&n| n > 0)
        .map(|i| i as u32 + 1)
        .unwrap_or(0)
}

/// Number of leveled spells a class knows at `level`.
///
/// Prepared casters derive it from their casting ability; everyone else uses the table value.
/// A casting class always knows at least one spell.
pub fn spells_known(class: &str, level: u32, attrs: &Attributes, table_value: u32) -> u32 {
    let level = level as i32;
    let known = match class {
        "cleric" | "druid" => attrs.modifier(AttributeType::Wisdom) + level,
        "paladin" => attrs.modifier(AttributeType::Charisma) + level / 2,
        "ranger" => attrs.modifier(AttributeType::Wisdom) + level / 2,
        "wizard" => attrs.modifier(AttributeType::Intelligence) + level,
        _ => table_value as i32,
    };
    known.max(1) as u32
}

/// Spells between `min_level` and `max_level` castable by the class or subclass and not yet known.
pub fn eligible_spells<'a>(
    data: &'a ReferenceData,
    class: &str,
    subclass: Option<&str>,
    min_level: u32,
    max_level: u32,
    known: &[Spell],
) -> Vec<&'a SpellRecord> {
    data.spells()
        .filter(|s| s.level >= min_level && s.level <= max_level)
        .filter(|s| {
            s.classes.iter().any(|c| c == class)
                || subclass.is_some_and(|sc| s.subclasses.iter().any(|x| x == sc))
        })
        .filter(|s| !known.iter().any(|k| k.index == s.index))
        .collect()
}

/// Draws up to `count` distinct spells from a pool.
pub fn draw_spells(pool: &[&SpellRecord], count: usize, rng: &mut impl Rng) -> Vec<Spell> {
    pool.choose_multiple(rng, count)
        .map(|record| Spell::from_record(record))
        .collect()
}

/// Appends spells whose index is not present yet.
pub fn merge_unique(into: &mut Vec<Spell>, spells: impl IntoIterator<Item = Spell>) {
    for spell in spells {
        if !into.iter().any(|s| s.index == spell.index) {
            into.push(spell);
        }
    }
}
