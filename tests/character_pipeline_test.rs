//! Integration test: party member generation against the bundled sample data
//!
//! Builds members of every class across the level bands and checks the
//! attribute, defense, spell and feature rules that span several modules.

use encounter_forge::character::{
    proficiency_bonus, AttributeType, CharacterBuilder, FeatureSpec, PartyMember,
};
use encounter_forge::combat::extra_attacks;
use encounter_forge::encounter::{Difficulty, Encounter, EncounterResult, Outcome};
use encounter_forge::monsters::Monster;
use encounter_forge::reference::ReferenceData;
use encounter_forge::validation::EncounterValidator;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

const CLASSES: [&str; 12] = [
    "barbarian", "bard", "cleric", "druid", "fighter", "monk", "paladin", "ranger", "rogue",
    "sorcerer", "warlock", "wizard",
];

fn sample_data() -> ReferenceData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/srd_sample.json");
    ReferenceData::load(&path).expect("bundled sample data should load")
}

fn build(data: &ReferenceData, class: &str, race: &str, level: u32, seed: u64) -> PartyMember {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    CharacterBuilder::new(data)
        .with_class(class)
        .with_race(race)
        .build(1, level, &mut rng)
        .unwrap_or_else(|e| panic!("{race} {class} L{level} seed {seed} failed: {e}"))
}

// =============================================================================
// Every class at every band
// =============================================================================

#[test]
fn test_every_class_builds_across_level_bands() {
    let data = sample_data();
    for (i, class) in CLASSES.iter().enumerate() {
        for level in [1, 5, 11, 20] {
            let mut rng = ChaCha8Rng::seed_from_u64(i as u64 * 100 + level as u64);
            let member = CharacterBuilder::new(&data)
                .with_class(*class)
                .build(1, level, &mut rng)
                .unwrap_or_else(|e| panic!("{class} L{level} failed: {e}"));

            assert_eq!(member.class, *class);
            assert_eq!(member.level, level);
            assert_eq!(member.skills.len(), 18, "{class} L{level} skill count");
            assert_eq!(member.proficiency_bonus, proficiency_bonus(level));
            assert!(member.hit_points >= 1, "{class} L{level} hp {}", member.hit_points);
            assert!(!member.features.is_empty(), "{class} L{level} has no features");
            assert!(member.subclass.is_some(), "{class} should pick its subclass");
        }
    }
}

#[test]
fn test_same_seed_builds_same_member() {
    let data = sample_data();
    let a = build(&data, "bard", "half-elf", 9, 77);
    let b = build(&data, "bard", "half-elf", 9, 77);
    assert_eq!(a, b);
}

// =============================================================================
// Attributes
// =============================================================================

#[test]
fn test_human_keeps_standard_array_plus_racial_bonus() {
    let data = sample_data();
    for seed in 0..10 {
        let member = build(&data, "fighter", "human", 1, seed);
        // 72 from the standard array, +1 to each of six abilities
        assert_eq!(member.attributes.total(), 78, "seed {seed}");
    }
}

#[test]
fn test_score_improvements_add_two_points_each() {
    let data = sample_data();
    // Seven improvements at fighter level 20
    let fighter = build(&data, "fighter", "human", 20, 3);
    assert_eq!(fighter.attributes.total(), 78 + 14);

    // Five improvements plus Primal Champion's +4 STR and +4 CON
    let barbarian = build(&data, "barbarian", "human", 20, 3);
    assert!(barbarian.has_feature("primal-champion"));
    assert_eq!(barbarian.attributes.total(), 78 + 10 + 8);
}

#[test]
fn test_saving_throw_proficiency_follows_class() {
    let data = sample_data();
    let wizard = build(&data, "wizard", "human", 5, 8);
    let int = AttributeType::Intelligence;
    let str_ = AttributeType::Strength;
    assert_eq!(wizard.attributes.save(int), wizard.attributes.modifier(int) + 3);
    assert_eq!(wizard.attributes.save(str_), wizard.attributes.modifier(str_));
}

// =============================================================================
// Race traits and defenses
// =============================================================================

#[test]
fn test_hill_dwarf_traits() {
    let data = sample_data();
    let member = build(&data, "wizard", "dwarf", 1, 4);
    assert_eq!(member.subrace.as_deref(), Some("hill-dwarf"));
    assert_eq!(member.speed, 25);
    assert!(member.resistances.iter().any(|r| r == "poison"));
    assert!(member.traits.iter().any(|t| t == "dwarven-toughness"));

    // Full d6 at level 1, plus one from Dwarven Toughness
    let con = member.attributes.modifier(AttributeType::Constitution);
    assert_eq!(member.hit_points, (6 + con + 1).max(1));
}

#[test]
fn test_dragonborn_gets_one_ancestry() {
    let data = sample_data();
    for seed in 0..10 {
        let member = build(&data, "fighter", "dragonborn", 3, seed);
        let ancestries = member
            .traits
            .iter()
            .filter(|t| t.starts_with("draconic-ancestry-"))
            .count();
        assert_eq!(ancestries, 1, "seed {seed}");
        assert_eq!(member.resistances.len(), 1, "seed {seed}: {:?}", member.resistances);
    }
}

#[test]
fn test_tiefling_infernal_legacy() {
    let data = sample_data();
    let member = build(&data, "warlock", "tiefling", 5, 12);
    assert!(member.resistances.iter().any(|r| r == "fire"));
    for spell in ["thaumaturgy", "hellish-rebuke", "darkness"] {
        assert!(member.spellbook.knows(spell), "tiefling should know {spell}");
    }

    let young = build(&data, "fighter", "tiefling", 2, 12);
    assert!(young.spellbook.knows("thaumaturgy"));
    assert!(!young.spellbook.knows("hellish-rebuke"));
    assert!(!young.spellbook.knows("darkness"));
}

// =============================================================================
// Class features
// =============================================================================

#[test]
fn test_fighter_extra_attacks_stack() {
    let data = sample_data();
    assert_eq!(extra_attacks(&build(&data, "fighter", "human", 4, 1)), 0);
    assert_eq!(extra_attacks(&build(&data, "fighter", "human", 5, 1)), 1);
    assert_eq!(extra_attacks(&build(&data, "fighter", "human", 11, 1)), 2);
    assert_eq!(extra_attacks(&build(&data, "fighter", "human", 20, 1)), 3);
}

#[test]
fn test_monk_unarmored_defense_and_movement() {
    let data = sample_data();
    for seed in 0..5 {
        let monk = build(&data, "monk", "human", 5, seed);
        let dex = monk.attributes.modifier(AttributeType::Dexterity);
        let wis = monk.attributes.modifier(AttributeType::Wisdom);
        assert!(monk.loadout.body_armor().is_none());
        assert_eq!(monk.armor_class, 10 + dex + wis, "seed {seed}");
        assert_eq!(monk.speed, 40, "seed {seed}");
    }
}

#[test]
fn test_rogue_expertise_doubles_proficiency() {
    let data = sample_data();
    for seed in 0..10 {
        let rogue = build(&data, "rogue", "human", 1, seed);
        let chosen = rogue
            .features
            .iter()
            .find_map(|f| match &f.spec {
                Some(FeatureSpec::Expertise { skills }) => Some(skills.clone()),
                _ => None,
            })
            .expect("rogue level 1 has expertise");
        assert_eq!(chosen.len(), 2, "seed {seed}");

        for skill in rogue.skills.iter().filter(|s| s.expertise) {
            assert!(skill.proficient);
            let base = rogue.attributes.modifier(skill.ability);
            assert_eq!(skill.modifier, base + 2 * rogue.proficiency_bonus, "{}", skill.index);
        }
    }
}

#[test]
fn test_warlock_invocations_respect_prerequisites() {
    let data = sample_data();
    for seed in 0..20 {
        let warlock = build(&data, "warlock", "human", 20, seed);
        assert_eq!(
            warlock.class_specific.get("invocations_known").and_then(|v| v.as_u64()),
            Some(8)
        );
        let chosen = warlock
            .features
            .iter()
            .find_map(|f| match &f.spec {
                Some(FeatureSpec::Invocation { invocations }) => Some(invocations.len()),
                _ => None,
            });
        assert_eq!(chosen, Some(8), "seed {seed}");

        if warlock.has_feature("agonizing-blast") || warlock.has_feature("repelling-blast") {
            assert!(warlock.spellbook.knows("eldritch-blast"), "seed {seed}");
        }
        for needs_blade in ["thirsting-blade", "lifedrinker"] {
            if warlock.has_feature(needs_blade) {
                assert!(warlock.has_feature("pact-of-the-blade"), "seed {seed}");
            }
        }
        if warlock.has_feature("book-of-ancient-secrets") {
            assert!(warlock.has_feature("pact-of-the-tome"), "seed {seed}");
        }
    }
}

#[test]
fn test_warlock_mystic_arcanum_once_per_rest() {
    let data = sample_data();
    let warlock = build(&data, "warlock", "human", 20, 5);
    for level in 6..=9 {
        let arcanum = warlock
            .spellbook
            .spells
            .iter()
            .find(|s| s.level == level)
            .unwrap_or_else(|| panic!("no level {level} arcanum"));
        assert_eq!(arcanum.uses_per_long_rest, Some(1));
    }
}

#[test]
fn test_wizard_slots_and_cantrips() {
    let data = sample_data();
    let wizard = build(&data, "wizard", "human", 5, 21);
    assert_eq!(wizard.spellbook.slots, vec![4, 3, 2]);
    assert_eq!(wizard.spellbook.cantrips.len(), 4);
    assert_eq!(wizard.spellcasting_ability, Some(AttributeType::Intelligence));
    assert!(wizard.spellbook.spells.iter().all(|s| (1..=3).contains(&s.level)));

    let expected = wizard.attributes.modifier(AttributeType::Intelligence) + 5;
    assert_eq!(wizard.spellbook.spells.len() as i32, expected.max(1));
}

#[test]
fn test_land_druid_picks_one_terrain() {
    let data = sample_data();
    let druid = build(&data, "druid", "human", 3, 2);
    let terrains = druid.features.iter().find_map(|f| match &f.spec {
        Some(FeatureSpec::FavoredTerrain { terrains }) => Some(terrains.len()),
        _ => None,
    });
    assert_eq!(terrains, Some(1));
}

// =============================================================================
// Generated members pass validation
// =============================================================================

#[test]
fn test_low_level_members_pass_member_checks() {
    let data = sample_data();
    let goblin = Monster::from_record(data.monster("goblin").expect("goblin"), 1, &data)
        .expect("goblin builds");
    let validator = EncounterValidator::default();

    for seed in 0..60 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let level = (seed % 5) as u32 + 1;
        let member = CharacterBuilder::new(&data)
            .build(1, level, &mut rng)
            .expect("random member builds");
        let result = EncounterResult {
            outcome: Outcome::Victory,
            total_rounds: 1,
            details: String::new(),
        };
        let encounter = Encounter::new(
            seed + 1,
            Difficulty::Easy,
            vec![member],
            vec![goblin.clone()],
            result,
        );
        let report = validator.validate_encounter(&encounter);
        assert!(report.errors.is_empty(), "seed {seed}: {:?}", report.errors);
    }
}
