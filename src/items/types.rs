use crate::reference::EquipmentRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponCategory {
    Simple,
    Martial,
}

impl WeaponCategory {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponCategory::Simple => "Simple",
            WeaponCategory::Martial => "Martial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponRange {
    Melee,
    Ranged,
}

impl WeaponRange {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponRange::Melee => "Melee",
            WeaponRange::Ranged => "Ranged",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
    Shield,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub index: String,
    pub name: String,
    pub category: WeaponCategory,
    pub range: WeaponRange,
    pub damage_dice: String,
    pub damage_type: String,
    pub properties: Vec<String>,
    pub equipped: bool,
}

impl Weapon {
    pub fn has_property(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }

    /// Proficiency strings that would cover this weapon, most specific first.
    pub fn proficiency_keys(&self) -> [String; 4] {
        let category = self.category.name().to_ascii_lowercase();
        let range = self.range.name().to_ascii_lowercase();
        [
            self.index.to_ascii_lowercase(),
            format!("{category}-{range}-weapons"),
            format!("{category}-weapons"),
            format!("{range}-weapons"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub index: String,
    pub name: String,
    pub category: ArmorCategory,
    pub base_ac: i32,
    pub dex_bonus: bool,
    pub max_dex_bonus: Option<i32>,
    pub str_minimum: i32,
    pub stealth_disadvantage: bool,
    pub equipped: bool,
}

impl Armor {
    pub fn is_shield(&self) -> bool {
        self.category == ArmorCategory::Shield
    }

    /// AC granted by this body armor for a given Dexterity modifier.
    pub fn armor_class(&self, dex_modifier: i32) -> i32 {
        if !self.dex_bonus {
            return self.base_ac;
        }
        match self.max_dex_bonus {
            Some(cap) => self.base_ac + dex_modifier.min(cap),
            None => self.base_ac + dex_modifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammunition {
    pub index: String,
    pub name: String,
    pub quantity: u32,
    pub equipped: bool,
}

/// Tagged equipment variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Equipment {
    Weapon(Weapon),
    Armor(Armor),
    Ammunition(Ammunition),
}

impl Equipment {
    /// Converts a reference record. Gear that is none of the three kinds yields None.
    pub fn from_record(record: &EquipmentRecord, quantity: u32) -> Option<Equipment> {
        match record.equipment_category.as_str() {
            "weapon" => {
                let range = match record.weapon_range.as_deref() {
                    Some("Ranged") => WeaponRange::Ranged,
                    _ => WeaponRange::Melee,
                };
                let category = match record.weapon_category.as_deref() {
                    Some("Martial") => WeaponCategory::Martial,
                    _ => WeaponCategory::Simple,
                };
                let (damage_dice, damage_type) = record
                    .damage
                    .as_ref()
                    .map(|d| (d.damage_dice.clone(), d.damage_type.clone()))
                    .unwrap_or_else(|| ("0".to_string(), String::new()));
                Some(Equipment::Weapon(Weapon {
                    index: record.index.clone(),
                    name: record.name.clone(),
                    category,
                    range,
                    damage_dice,
                    damage_type,
                    properties: record.properties.clone(),
                    equipped: false,
                }))
            }
            "armor" => {
                let category = match record.armor_category.as_deref() {
                    Some("Light") => ArmorCategory::Light,
                    Some("Medium") => ArmorCategory::Medium,
                    Some("Heavy") => ArmorCategory::Heavy,
                    _ => ArmorCategory::Shield,
                };
                let ac = record.armor_class.as_ref();
                Some(Equipment::Armor(Armor {
                    index: record.index.clone(),
                    name: record.name.clone(),
                    category,
                    base_ac: ac.map(|a| a.base).unwrap_or(0),
                    dex_bonus: ac.map(|a| a.dex_bonus).unwrap_or(false),
                    max_dex_bonus: ac.and_then(|a| a.max_bonus),
                    str_minimum: record.str_minimum,
                    stealth_disadvantage: record.stealth_disadvantage,
                    equipped: false,
                }))
            }
            _ if record.gear_category.as_deref() == Some("ammunition") => {
                Some(Equipment::Ammunition(Ammunition {
                    index: record.index.clone(),
                    name: record.name.clone(),
                    quantity,
                    equipped: true,
                }))
            }
            _ => None,
        }
    }
}

/// A combatant's partitioned gear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub melee_weapons: Vec<Weapon>,
    pub ranged_weapons: Vec<Weapon>,
    pub armor: Vec<Armor>,
    pub ammunition: Vec<Ammunition>,
}

impl Loadout {
    pub fn push(&mut self, item: Equipment) {
        match item {
            Equipment::Weapon(w) if w.range == WeaponRange::Ranged => self.ranged_weapons.push(w),
            Equipment::Weapon(w) => self.melee_weapons.push(w),
            Equipment::Armor(a) => self.armor.push(a),
            Equipment::Ammunition(a) => self.ammunition.push(a),
        }
    }

    pub fn equipped_melee(&self) -> impl Iterator<Item = &Weapon> {
        self.melee_weapons.iter().filter(|w| w.equipped)
    }

    pub fn equipped_ranged(&self) -> impl Iterator<Item = &Weapon> {
        self.ranged_weapons.iter().filter(|w| w.equipped)
    }

    pub fn body_armor(&self) -> Option<&Armor> {
        self.armor.iter().find(|a| a.equipped && !a.is_shield())
    }

    pub fn shield_equipped(&self) -> bool {
        self.armor.iter().any(|a| a.equipped && a.is_shield())
    }

    pub fn is_empty(&self) -> bool {
        self.melee_weapons.is_empty()
            && self.ranged_weapons.is_empty()
            && self.armor.is_empty()
            && self.ammunition.is_empty()
    }
}
