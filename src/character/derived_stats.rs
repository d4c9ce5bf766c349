use super::attributes::{AttributeType, Attributes};
use super::progression::Feature;
use crate::core::constants::*;
use crate::items::Loadout;
use rand::seq::SliceRandom;
use rand::Rng;

const FIGHTING_STYLE_DEFENSE: [&str; 3] = [
    "fighting-style-defense",
    "fighter-fighting-style-defense",
    "ranger-fighting-style-defense",
];

const DAMAGE_TYPES: [&str; 13] = [
    "acid",
    "bludgeoning",
    "cold",
    "fire",
    "force",
    "lightning",
    "necrotic",
    "piercing",
    "poison",
    "psychic",
    "radiant",
    "slashing",
    "thunder",
];

fn has(features: &[Feature], index: &str) -> bool {
    features.iter().any(|f| f.index == index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedStats {
    pub hit_points: i32,
    pub armor_class: i32,
    pub initiative: i32,
    pub speed: i32,
}

impl DerivedStats {
    /// Computes HP, AC, initiative and speed for a finished character.
    ///
    /// # Arguments
    /// * `level` - Character level
    /// * `hit_die` - Class hit die size
    /// * `race_speed` - Base walking speed of the race
    /// * `traits` - Resolved trait indices
    /// * `features` - Resolved features after pruning
    #[allow(clippy::too_many_arguments)]
    pub fn calculate(
        attrs: &Attributes,
        loadout: &Loadout,
        level: u32,
        hit_die: u32,
        race_speed: i32,
        traits: &[String],
        features: &[Feature],
        rng: &mut impl Rng,
    ) -> Self {
        let dwarven_toughness = traits.iter().any(|t| t == "dwarven-toughness");
        Self {
            hit_points: hit_points(attrs, level, hit_die, dwarven_toughness, features, rng),
            armor_class: armor_class(attrs, loadout, features),
            // Initiative = DEX_mod
            initiative: attrs.modifier(AttributeType::Dexterity),
            speed: speed(race_speed, loadout, features),
        }
    }
}

pub fn armor_class(attrs: &Attributes, loadout: &Loadout, features: &[Feature]) -> i32 {
    let dex_mod = attrs.modifier(AttributeType::Dexterity);
    let body = loadout.body_armor();
    let shield = loadout.shield_equipped();

    // AC = 10 + DEX_mod, or whatever the body armor grants
    let mut ac = match body {
        Some(armor) => armor.armor_class(dex_mod),
        None => UNARMORED_BASE_AC + dex_mod,
    };

    if body.is_none() {
        if has(features, "barbarian-unarmored-defense") {
            ac = UNARMORED_BASE_AC + dex_mod + attrs.modifier(AttributeType::Constitution);
        }
        if has(features, "draconic-resilience") {
            ac = ac.max(DRACONIC_RESILIENCE_BASE_AC + dex_mod);
        }
        if has(features, "monk-unarmored-defense") && !shield {
            ac = UNARMORED_BASE_AC + dex_mod + attrs.modifier(AttributeType::Wisdom);
        }
    } else if FIGHTING_STYLE_DEFENSE.iter().any(|f| has(features, f)) {
        ac += DEFENSE_STYLE_AC_BONUS;
    }

    if shield {
        ac += SHIELD_AC_BONUS;
    }
    ac
}

/// Level 1 takes the full hit die; later levels roll it. Never below 1.
pub fn hit_points(
    attrs: &Attributes,
    level: u32,
    hit_die: u32,
    dwarven_toughness: bool,
    features: &[Feature],
    rng: &mut impl Rng,
) -> i32 {
    let con_mod = attrs.modifier(AttributeType::Constitution);
    let die = hit_die.max(1) as i32;

    let mut hp = die + con_mod;
    for _ in 2..=level {
        hp += rng.gen_range(1..=die) + con_mod;
    }

    if dwarven_toughness {
        hp += level as i32;
    }
    if has(features, "draconic-resilience") {
        hp += level as i32;
    }
    hp.max(1)
}

pub fn speed(race_speed: i32, loadout: &Loadout, features: &[Feature]) -> i32 {
    let mut speed = race_speed;
    if has(features, "fast-movement") {
        speed += FAST_MOVEMENT_BONUS;
    }
    if has(features, "unarmored-movement-1")
        && loadout.body_armor().is_none()
        && !loadout.shield_equipped()
    {
        speed += FAST_MOVEMENT_BONUS;
    }
    speed
}

/// Diamond Soul: proficiency on every save that is not proficient already.
pub fn apply_diamond_soul(attrs: &mut Attributes, proficient_saves: &[String], proficiency_bonus: i32) {
    for attr in AttributeType::all() {
        let already = proficient_saves
            .iter()
            .any(|code| AttributeType::from_code(code) == Some(attr));
        if !already {
            attrs.get_mut(attr).add_save_bonus(proficiency_bonus);
        }
    }
}

/// Resistances and immunities granted by class features.
pub fn feature_defenses(
    features: &[Feature],
    resistances: &mut Vec<String>,
    immunities: &mut Vec<String>,
    rng: &mut impl Rng,
) {
    let push = |list: &mut Vec<String>, tag: &str| {
        if !list.iter().any(|t| t == tag) {
            list.push(tag.to_string());
        }
    };

    if has(features, "natures-ward") || has(features, "purity-of-body") {
        push(immunities, "poison");
    }
    if has(features, "fiendish-resilience") {
        if let Some(tag) = DAMAGE_TYPES.choose(rng) {
            push(resistances, tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Armor, ArmorCategory};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn feature(index: &str) -> Feature {
        Feature {
            index: index.into(),
            name: index.into(),
            level: 1,
            spec: None,
        }
    }

    fn armor(category: ArmorCategory, base: i32, dex_bonus: bool, max: Option<i32>) -> Armor {
        Armor {
            index: "armor".into(),
            name: "Armor".into(),
            category,
            base_ac: base,
            dex_bonus,
            max_dex_bonus: max,
            str_minimum: 0,
            stealth_disadvantage: false,
            equipped: true,
        }
    }

    fn shield() -> Armor {
        armor(ArmorCategory::Shield, 2, false, None)
    }

    #[test]
    fn test_unarmored_ac() {
        let attrs = Attributes::from_values([10, 14, 10, 10, 10, 10]);
        assert_eq!(armor_class(&attrs, &Loadout::default(), &[]), 12);
    }

    #[test]
    fn test_medium_armor_caps_dex_and_shield_adds_two() {
        let attrs = Attributes::from_values([10, 18, 10, 10, 10, 10]);
        let mut loadout = Loadout::default();
        loadout.armor.push(armor(ArmorCategory::Medium, 14, true, Some(2)));
        assert_eq!(armor_class(&attrs, &loadout, &[]), 16);
        loadout.armor.push(shield());
        assert_eq!(armor_class(&attrs, &loadout, &[]), 18);
    }

    #[test]
    fn test_barbarian_unarmored_defense() {
        let attrs = Attributes::from_values([15, 14, 16, 10, 10, 8]);
        let features = vec![feature("barbarian-unarmored-defense")];
        assert_eq!(armor_class(&attrs, &Loadout::default(), &features), 15);
    }

    #[test]
    fn test_monk_unarmored_defense_lost_with_shield() {
        let attrs = Attributes::from_values([10, 16, 10, 10, 16, 8]);
        let features = vec![feature("monk-unarmored-defense")];
        assert_eq!(armor_class(&attrs, &Loadout::default(), &features), 16);

        let mut loadout = Loadout::default();
        loadout.armor.push(shield());
        assert_eq!(armor_class(&attrs, &loadout, &features), 15);
    }

    #[test]
    fn test_draconic_resilience_floor() {
        let attrs = Attributes::from_values([10, 12, 10, 10, 10, 16]);
        let features = vec![feature("draconic-resilience")];
        assert_eq!(armor_class(&attrs, &Loadout::default(), &features), 14);
    }

    #[test]
    fn test_defense_style_needs_body_armor() {
        let attrs = Attributes::from_values([16, 10, 14, 10, 10, 10]);
        let features = vec![feature("fighter-fighting-style-defense")];
        assert_eq!(armor_class(&attrs, &Loadout::default(), &features), 10);

        let mut loadout = Loadout::default();
        loadout.armor.push(armor(ArmorCategory::Heavy, 16, false, None));
        assert_eq!(armor_class(&attrs, &loadout, &features), 17);
    }

    #[test]
    fn test_hit_points_bounds() {
        let attrs = Attributes::from_values([10, 10, 14, 10, 10, 10]);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let hp = hit_points(&attrs, 5, 10, false, &[], &mut rng);
            // 12 at level 1, then 4 rolls of 1d10+2
            assert!((12 + 4 * 3..=12 + 4 * 12).contains(&hp), "hp {} out of range", hp);
        }
    }

    #[test]
    fn test_hit_points_level_one_is_fixed_and_floored() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let sturdy = Attributes::from_values([10, 10, 16, 10, 10, 10]);
        assert_eq!(hit_points(&sturdy, 1, 8, true, &[], &mut rng), 12);

        let frail = Attributes::from_values([10, 10, 1, 10, 10, 10]);
        assert_eq!(hit_points(&frail, 1, 4, false, &[], &mut rng), 1);
    }

    #[test]
    fn test_speed_bonuses() {
        let features = vec![feature("fast-movement"), feature("unarmored-movement-1")];
        assert_eq!(speed(30, &Loadout::default(), &features), 50);

        let mut loadout = Loadout::default();
        loadout.armor.push(armor(ArmorCategory::Light, 11, true, None));
        assert_eq!(speed(30, &loadout, &features), 40);
    }

    #[test]
    fn test_diamond_soul_skips_proficient_saves() {
        let mut attrs = Attributes::from_values([10; 6]);
        apply_diamond_soul(&mut attrs, &["str".into(), "dex".into()], 4);
        assert_eq!(attrs.save(AttributeType::Strength), 0);
        assert_eq!(attrs.save(AttributeType::Wisdom), 4);
        assert_eq!(attrs.save(AttributeType::Charisma), 4);
    }

    #[test]
    fn test_feature_defenses() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut resistances = Vec::new();
        let mut immunities = Vec::new();
        feature_defenses(
            &[feature("purity-of-body"), feature("fiendish-resilience")],
            &mut resistances,
            &mut immunities,
            &mut rng,
        );
        assert_eq!(immunities, vec!["poison".to_string()]);
        assert_eq!(resistances.len(), 1);
    }
}
