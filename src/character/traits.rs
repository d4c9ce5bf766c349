//! Racial traits and the proficiency list they feed into.

use crate::core::error::Result;
use crate::reference::{ClassRecord, RaceRecord, ReferenceData, SubraceRecord, TraitRecord};
use rand::Rng;

/// Resolves race and subrace traits, plus one level of sub-trait choice.
///
/// Traits that carry a `parent` are only reachable through their parent's options.
pub fn resolve_traits<'a>(
    race: &RaceRecord,
    subrace: Option<&SubraceRecord>,
    data: &'a ReferenceData,
    rng: &mut impl Rng,
) -> Result<Vec<&'a TraitRecord>> {
    let indices = race
        .traits
        .iter()
        .chain(subrace.into_iter().flat_map(|s| s.traits.iter()));

    let mut traits: Vec<&TraitRecord> = Vec::new();
    for index in indices {
        let record = data.trait_(index)?;
        if record.parent.is_none() && !traits.iter().any(|t| t.index == record.index) {
            traits.push(record);
        }
    }

    let mut subtraits = Vec::new();
    for record in &traits {
        if let Some(options) = &record.subtrait_options {
            for index in options.draw(&[], rng) {
                subtraits.push(data.trait_(&index)?);
            }
        }
    }
    traits.extend(subtraits);

    Ok(traits)
}

/// Damage resistances granted by a trait list, deduplicated.
pub fn trait_resistances(traits: &[&TraitRecord]) -> Vec<String> {
    let mut resistances: Vec<String> = Vec::new();
    for damage_type in traits.iter().flat_map(|t| t.damage_resistances.iter()) {
        if !resistances.contains(damage_type) {
            resistances.push(damage_type.clone());
        }
    }
    resistances
}

/// Fixed proficiencies first, then the random choices, deduplicated in order.
pub fn resolve_proficiencies(
    race: &RaceRecord,
    subrace: Option<&SubraceRecord>,
    class: &ClassRecord,
    traits: &[&TraitRecord],
    rng: &mut impl Rng,
) -> Vec<String> {
    let mut known: Vec<String> = Vec::new();
    let mut add = |known: &mut Vec<String>, items: &[String]| {
        for item in items {
            if !known.contains(item) {
                known.push(item.clone());
            }
        }
    };

    add(&mut known, &race.starting_proficiencies);
    if let Some(subrace) = subrace {
        add(&mut known, &subrace.starting_proficiencies);
    }
    add(&mut known, &class.proficiencies);
    for record in traits {
        add(&mut known, &record.proficiencies);
    }

    if let Some(options) = &race.starting_proficiency_options {
        let drawn = options.draw(&known, rng);
        add(&mut known, &drawn);
    }
    for choice in &class.proficiency_choices {
        let drawn = choice.draw(&known, rng);
        add(&mut known, &drawn);
    }
    for record in traits {
        if let Some(options) = &record.proficiency_choices {
            let drawn = options.draw(&known, rng);
            add(&mut known, &drawn);
        }
    }

    known
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GenError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DATA: &str = r#"{
        "races": [
            {"index": "dragonborn", "name": "Dragonborn",
             "traits": ["draconic-ancestry", "breath-weapon"]},
            {"index": "dwarf", "name": "Dwarf", "speed": 25,
             "starting_proficiencies": ["battleaxe", "handaxe"],
             "traits": ["dwarven-resilience"], "subraces": ["hill-dwarf"]},
            {"index": "ghost", "name": "Ghost", "traits": ["vanished"]}
        ],
        "subraces": [
            {"index": "hill-dwarf", "name": "Hill Dwarf", "race": "dwarf",
             "traits": ["dwarven-toughness", "dwarven-resilience"]}
        ],
        "traits": [
            {"index": "draconic-ancestry", "name": "Draconic Ancestry",
             "subtrait_options": {"choose": 1, "from": ["draconic-ancestry-red", "draconic-ancestry-white"]}},
            {"index": "draconic-ancestry-red", "name": "Red", "parent": "draconic-ancestry",
             "damage_resistances": ["fire"]},
            {"index": "draconic-ancestry-white", "name": "White", "parent": "draconic-ancestry",
             "damage_resistances": ["cold"]},
            {"index": "breath-weapon", "name": "Breath Weapon"},
            {"index": "dwarven-resilience", "name": "Dwarven Resilience",
             "damage_resistances": ["poison"]},
            {"index": "dwarven-toughness", "name": "Dwarven Toughness"}
        ],
        "classes": [
            {"index": "rogue", "name": "Rogue", "hit_die": 8,
             "proficiencies": ["light-armor", "handaxe"],
             "proficiency_choices": [{"choose": 2, "from":
                ["skill-stealth", "skill-acrobatics", "skill-deception"]}]}
        ],
        "monsters": [{"index": "rat", "name": "Rat", "armor_class": 10, "hit_points": 1,
                      "strength": 2, "dexterity": 11, "constitution": 9, "intelligence": 2,
                      "wisdom": 10, "charisma": 4, "challenge_rating": 0,
                      "proficiency_bonus": 2, "xp": 10}]
    }"#;

    #[test]
    fn test_subtrait_choice_adds_one_ancestry() {
        let data = ReferenceData::from_json_str(DATA).unwrap();
        let race = data.race("dragonborn").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let traits = resolve_traits(race, None, &data, &mut rng).unwrap();

        assert_eq!(traits.len(), 3);
        let ancestry = traits
            .iter()
            .filter(|t| t.parent.as_deref() == Some("draconic-ancestry"))
            .count();
        assert_eq!(ancestry, 1);
        let resistances = trait_resistances(&traits);
        assert_eq!(resistances.len(), 1);
        assert!(resistances[0] == "fire" || resistances[0] == "cold");
    }

    #[test]
    fn test_subrace_traits_are_merged_once() {
        let data = ReferenceData::from_json_str(DATA).unwrap();
        let race = data.race("dwarf").unwrap();
        let subrace = data.subrace("hill-dwarf").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let traits = resolve_traits(race, Some(subrace), &data, &mut rng).unwrap();
        let names: Vec<&str> = traits.iter().map(|t| t.index.as_str()).collect();
        assert_eq!(names, vec!["dwarven-resilience", "dwarven-toughness"]);
        assert_eq!(trait_resistances(&traits), vec!["poison".to_string()]);
    }

    #[test]
    fn test_missing_trait_is_lookup_error() {
        let data = ReferenceData::from_json_str(DATA).unwrap();
        let race = data.race("ghost").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = resolve_traits(race, None, &data, &mut rng).unwrap_err();
        assert!(matches!(err, GenError::ReferenceLookup { kind: "trait", .. }));
    }

    #[test]
    fn test_proficiencies_are_deduplicated_with_choices() {
        let data = ReferenceData::from_json_str(DATA).unwrap();
        let race = data.race("dwarf").unwrap();
        let class = data.class("rogue").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let profs = resolve_proficiencies(race, None, class, &[], &mut rng);

        assert_eq!(profs.iter().filter(|p| *p == "handaxe").count(), 1);
        assert_eq!(profs.iter().filter(|p| p.starts_with("skill-")).count(), 2);
        assert_eq!(&profs[..2], &["battleaxe".to_string(), "handaxe".to_string()]);
    }
}
