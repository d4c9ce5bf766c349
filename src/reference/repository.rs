//! Read-only repository over the reference document.
//!
//! Loaded once per run and passed by reference into every component that needs lookups.

use super::types::*;
use crate::core::error::{GenError, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

fn index_by<T, F>(items: Vec<T>, key: F) -> HashMap<String, T>
where
    F: Fn(&T) -> &str,
{
    items
        .into_iter()
        .map(|item| (key(&item).to_string(), item))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    races: HashMap<String, RaceRecord>,
    subraces: HashMap<String, SubraceRecord>,
    traits: HashMap<String, TraitRecord>,
    classes: HashMap<String, ClassRecord>,
    subclasses: HashMap<String, SubclassRecord>,
    levels: Vec<LevelRecord>,
    features: HashMap<String, FeatureRecord>,
    spells: HashMap<String, SpellRecord>,
    equipment: HashMap<String, EquipmentRecord>,
    categories: HashMap<String, EquipmentCategoryRecord>,
    monsters: HashMap<String, MonsterRecord>,
    // Stable orderings for uniform random draws.
    race_order: Vec<String>,
    class_order: Vec<String>,
    spell_order: Vec<String>,
    monster_order: Vec<String>,
    checksum: String,
}

impl ReferenceData {
    pub fn from_document(doc: ReferenceDocument) -> Self {
        Self::from_document_with_checksum(doc, String::new())
    }

    fn from_document_with_checksum(doc: ReferenceDocument, checksum: String) -> Self {
        let race_order = doc.races.iter().map(|r| r.index.clone()).collect();
        let class_order = doc.classes.iter().map(|c| c.index.clone()).collect();
        let spell_order = doc.spells.iter().map(|s| s.index.clone()).collect();
        let monster_order = doc.monsters.iter().map(|m| m.index.clone()).collect();

        Self {
            races: index_by(doc.races, |r| &r.index),
            subraces: index_by(doc.subraces, |r| &r.index),
            traits: index_by(doc.traits, |t| &t.index),
            classes: index_by(doc.classes, |c| &c.index),
            subclasses: index_by(doc.subclasses, |s| &s.index),
            levels: doc.levels,
            features: index_by(doc.features, |f| &f.index),
            spells: index_by(doc.spells, |s| &s.index),
            equipment: index_by(doc.equipment, |e| &e.index),
            categories: index_by(doc.equipment_categories, |c| &c.index),
            monsters: index_by(doc.monsters, |m| &m.index),
            race_order,
            class_order,
            spell_order,
            monster_order,
            checksum,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: ReferenceDocument = serde_json::from_str(json)?;
        let checksum = format!("{:x}", Sha256::digest(json.as_bytes()));
        let data = Self::from_document_with_checksum(doc, checksum);
        if data.classes.is_empty() || data.races.is_empty() || data.monsters.is_empty() {
            return Err(GenError::Configuration(
                "reference data must contain at least one race, class and monster".to_string(),
            ));
        }
        Ok(data)
    }

    /// Loads the reference document from disk. An unreadable file is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            GenError::Configuration(format!(
                "cannot read reference data {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// SHA-256 of the source document, empty when built in memory.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn race(&self, index: &str) -> Result<&RaceRecord> {
        self.races
            .get(index)
            .ok_or_else(|| GenError::lookup("race", index))
    }

    pub fn subrace(&self, index: &str) -> Result<&SubraceRecord> {
        self.subraces
            .get(index)
            .ok_or_else(|| GenError::lookup("subrace", index))
    }

    pub fn trait_(&self, index: &str) -> Result<&TraitRecord> {
        self.traits
            .get(index)
            .ok_or_else(|| GenError::lookup("trait", index))
    }

    pub fn class(&self, index: &str) -> Result<&ClassRecord> {
        self.classes
            .get(index)
            .ok_or_else(|| GenError::lookup("class", index))
    }

    pub fn subclass(&self, index: &str) -> Result<&SubclassRecord> {
        self.subclasses
            .get(index)
            .ok_or_else(|| GenError::lookup("subclass", index))
    }

    pub fn feature(&self, index: &str) -> Result<&FeatureRecord> {
        self.features
            .get(index)
            .ok_or_else(|| GenError::lookup("feature", index))
    }

    pub fn spell(&self, index: &str) -> Result<&SpellRecord> {
        self.spells
            .get(index)
            .ok_or_else(|| GenError::lookup("spell", index))
    }

    pub fn find_spell(&self, index: &str) -> Option<&SpellRecord> {
        self.spells.get(index)
    }

    pub fn equipment(&self, index: &str) -> Result<&EquipmentRecord> {
        self.equipment
            .get(index)
            .ok_or_else(|| GenError::lookup("equipment", index))
    }

    pub fn category(&self, index: &str) -> Result<&EquipmentCategoryRecord> {
        self.categories
            .get(index)
            .ok_or_else(|| GenError::lookup("equipment category", index))
    }

    pub fn monster(&self, index: &str) -> Result<&MonsterRecord> {
        self.monsters
            .get(index)
            .ok_or_else(|| GenError::lookup("monster", index))
    }

    /// Races in document order.
    pub fn races(&self) -> impl Iterator<Item = &RaceRecord> {
        self.race_order.iter().filter_map(|i| self.races.get(i))
    }

    /// Classes in document order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassRecord> {
        self.class_order.iter().filter_map(|i| self.classes.get(i))
    }

    /// Spells in document order.
    pub fn spells(&self) -> impl Iterator<Item = &SpellRecord> {
        self.spell_order.iter().filter_map(|i| self.spells.get(i))
    }

    /// Every monster, in document order, as a selection candidate.
    pub fn monster_candidates(&self) -> Vec<&MonsterRecord> {
        self.monster_order
            .iter()
            .filter_map(|i| self.monsters.get(i))
            .collect()
    }

    /// Level entries of a class (and optionally its subclass) exactly at `level`.
    pub fn levels_for<'a>(
        &'a self,
        class: &'a str,
        subclass: Option<&'a str>,
        level: u32,
    ) -> impl Iterator<Item = &'a LevelRecord> + 'a {
        self.levels.iter().filter(move |l| {
            l.class == class
                && l.level == level
                && match &l.subclass {
                    None => true,
                    Some(sc) => Some(sc.as_str()) == subclass,
                }
        })
    }

    /// Every catalog feature belonging to a class.
    pub fn class_features<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a FeatureRecord> {
        self.features.values().filter(move |f| f.class == class)
    }
}
