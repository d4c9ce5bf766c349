//! Level-by-level feature collection, specialization and spell progression.

use super::attributes::{apply_primal_champion, apply_score_improvements, Attributes};
use super::bonus_spells;
use super::spellcasting::{draw_spells, eligible_spells, spells_known, SpellBook};
use crate::core::error::Result;
use crate::reference::{ClassRecord, FeatureRecord, Prerequisite, ReferenceData};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

const ELDRITCH_INVOCATIONS: &str = "eldritch-invocations";
const INVOCATIONS_KNOWN_KEY: &str = "invocations_known";
const SCORE_IMPROVEMENT_MARKER: &str = "ability-score-improvement";

/// Resolved specialization of a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureSpec {
    Expertise { skills: Vec<String> },
    FavoredEnemy { enemies: Vec<String> },
    FavoredTerrain { terrains: Vec<String> },
    Subfeature { features: Vec<String> },
    Invocation { invocations: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub index: String,
    pub name: String,
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<FeatureSpec>,
}

impl Feature {
    fn from_record(record: &FeatureRecord, level: u32) -> Self {
        Self {
            index: record.index.clone(),
            name: record.name.clone(),
            level,
            spec: None,
        }
    }
}

/// What a character brings into the progression walk.
#[derive(Debug, Clone, Copy)]
pub struct ProgressionInput<'a> {
    pub class: &'a ClassRecord,
    pub subclass: Option<&'a str>,
    pub level: u32,
    pub proficiencies: &'a [String],
    pub traits: &'a [String],
}

/// Everything the walk produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progression {
    pub features: Vec<Feature>,
    pub spellbook: SpellBook,
    pub class_specific: Map<String, Value>,
    pub subclass_specific: Map<String, Value>,
    pub score_improvements: u32,
}

impl Progression {
    pub fn has_feature(&self, index: &str) -> bool {
        self.features.iter().any(|f| f.index == index)
    }

    /// Skills that gained expertise through features.
    pub fn expertise(&self) -> Vec<String> {
        let mut skills: Vec<String> = Vec::new();
        for feature in &self.features {
            if let Some(FeatureSpec::Expertise { skills: chosen }) = &feature.spec {
                for skill in chosen {
                    if !skills.contains(skill) {
                        skills.push(skill.clone());
                    }
                }
            }
        }
        skills
    }
}

/// Walks levels `1..=input.level`, mutating `attrs` for score improvements.
pub fn resolve_progression(
    input: ProgressionInput<'_>,
    attrs: &mut Attributes,
    data: &ReferenceData,
    rng: &mut impl Rng,
) -> Result<Progression> {
    let mut progression = Progression::default();
    let class = input.class;

    for level in 1..=input.level {
        let records: Vec<_> = data.levels_for(&class.index, input.subclass, level).collect();

        for record in &records {
            for index in &record.features {
                add_feature(&mut progression, index, level, &input, data, rng)?;
            }
        }

        if level < input.level {
            continue;
        }

        progression.score_improvements = progression
            .features
            .iter()
            .filter(|f| f.index.contains(SCORE_IMPROVEMENT_MARKER))
            .count() as u32;
        apply_score_improvements(attrs, progression.score_improvements, rng);
        if progression.has_feature("primal-champion") {
            apply_primal_champion(attrs);
        }

        for record in &records {
            if let Some(block) = &record.class_specific {
                progression
                    .class_specific
                    .extend(block.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            if let Some(block) = &record.subclass_specific {
                progression
                    .subclass_specific
                    .extend(block.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }

        if let Some(table) = records.iter().rev().find_map(|r| r.spellcasting.as_ref()) {
            let book = &mut progression.spellbook;
            book.slots = table.spell_slots.clone();
            let highest = book.highest_slot_level();

            if highest > 0 {
                let count = spells_known(&class.index, level, attrs, table.spells_known);
                let pool =
                    eligible_spells(data, &class.index, input.subclass, 1, highest, &book.spells);
                for spell in draw_spells(&pool, count as usize, rng) {
                    book.learn(spell);
                }
            }
            if table.cantrips_known > 0 {
                let pool =
                    eligible_spells(data, &class.index, input.subclass, 0, 0, &book.cantrips);
                for spell in draw_spells(&pool, table.cantrips_known as usize, rng) {
                    book.learn(spell);
                }
            }
        }

        choose_invocations(&mut progression, data, rng)?;
    }

    bonus_spells::apply_trait_spells(
        input.traits,
        input.level,
        data,
        &mut progression.spellbook,
        rng,
    );
    bonus_spells::apply_feature_spells(
        &progression.features,
        data,
        &mut progression.spellbook,
        rng,
    );
    bonus_spells::apply_subclass_spells(
        &class.index,
        input.subclass,
        input.level,
        &progression.features,
        data,
        &mut progression.spellbook,
    );

    prune_unmet_prerequisites(&mut progression, &class.index, input.level, data);

    tracing::debug!(
        class = %class.index,
        level = input.level,
        features = progression.features.len(),
        spells = progression.spellbook.spells.len(),
        cantrips = progression.spellbook.cantrips.len(),
        "resolved progression"
    );
    Ok(progression)
}

fn add_feature(
    progression: &mut Progression,
    index: &str,
    level: u32,
    input: &ProgressionInput<'_>,
    data: &ReferenceData,
    rng: &mut impl Rng,
) -> Result<()> {
    if progression.has_feature(index) {
        return Ok(());
    }
    let record = data.feature(index)?;
    let mut feature = Feature::from_record(record, level);
    feature.spec = resolve_spec(record, progression, input, rng);

    let subfeatures = match &feature.spec {
        Some(FeatureSpec::Subfeature { features }) => features.clone(),
        _ => Vec::new(),
    };
    progression.features.push(feature);

    for sub in subfeatures {
        if !progression.has_feature(&sub) {
            let record = data.feature(&sub)?;
            progression.features.push(Feature::from_record(record, level));
        }
    }
    Ok(())
}

fn resolve_spec(
    record: &FeatureRecord,
    progression: &Progression,
    input: &ProgressionInput<'_>,
    rng: &mut impl Rng,
) -> Option<FeatureSpec> {
    let specific = record.feature_specific.as_ref()?;

    if let Some(options) = &specific.expertise_options {
        let already = progression.expertise();
        let proficient: Vec<String> = options
            .from
            .iter()
            .filter(|o| input.proficiencies.contains(o) && !already.contains(o))
            .cloned()
            .collect();
        let skills = if proficient.is_empty() {
            options.draw(&already, rng)
        } else {
            proficient
                .choose_multiple(rng, options.choose)
                .cloned()
                .collect()
        };
        return Some(FeatureSpec::Expertise { skills });
    }
    if let Some(options) = &specific.enemy_type_options {
        return Some(FeatureSpec::FavoredEnemy {
            enemies: options.draw(&[], rng),
        });
    }
    if let Some(options) = &specific.terrain_type_options {
        return Some(FeatureSpec::FavoredTerrain {
            terrains: options.draw(&[], rng),
        });
    }
    if let Some(options) = &specific.subfeature_options {
        let owned: Vec<String> = progression.features.iter().map(|f| f.index.clone()).collect();
        return Some(FeatureSpec::Subfeature {
            features: options.draw(&owned, rng),
        });
    }
    None
}

fn choose_invocations(
    progression: &mut Progression,
    data: &ReferenceData,
    rng: &mut impl Rng,
) -> Result<()> {
    let Some(count) = progression
        .class_specific
        .get(INVOCATIONS_KNOWN_KEY)
        .and_then(Value::as_u64)
    else {
        return Ok(());
    };
    let Some(position) = progression
        .features
        .iter()
        .position(|f| f.index == ELDRITCH_INVOCATIONS)
    else {
        return Ok(());
    };

    let record = data.feature(ELDRITCH_INVOCATIONS)?;
    let available = record
        .feature_specific
        .as_ref()
        .map(|s| s.invocations.as_slice())
        .unwrap_or_default();
    let chosen: Vec<String> = available
        .choose_multiple(rng, count as usize)
        .cloned()
        .collect();

    let level = progression.features[position].level;
    for index in &chosen {
        if !progression.has_feature(index) {
            let invocation = data.feature(index)?;
            progression
                .features
                .push(Feature::from_record(invocation, level));
        }
    }
    progression.features[position].spec = Some(FeatureSpec::Invocation {
        invocations: chosen,
    });
    Ok(())
}

/// Removes every catalog feature of the class whose declared prerequisites are not all met.
pub fn prune_unmet_prerequisites(
    progression: &mut Progression,
    class: &str,
    level: u32,
    data: &ReferenceData,
) {
    let unmet: HashSet<&str> = data
        .class_features(class)
        .filter(|f| {
            !f.prerequisites
                .iter()
                .all(|p| prerequisite_met(p, progression, level))
        })
        .map(|f| f.index.as_str())
        .collect();

    let before = progression.features.len();
    progression
        .features
        .retain(|f| !unmet.contains(f.index.as_str()));
    let removed = before - progression.features.len();
    if removed > 0 {
        tracing::debug!(removed, "pruned features with unmet prerequisites");
    }
}

fn prerequisite_met(prerequisite: &Prerequisite, progression: &Progression, level: u32) -> bool {
    match prerequisite {
        Prerequisite::Feature { feature } => progression.has_feature(feature),
        Prerequisite::Spell { spell } => progression.spellbook.knows(spell),
        Prerequisite::Level { level: required } => level >= *required,
    }
}
