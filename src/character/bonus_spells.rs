//! Spells granted outside the class spell list: racial traits, features and subclass tables.
//!
//! Listed spells that are absent from the reference data are skipped with a debug log.

use super::progression::{Feature, FeatureSpec};
use super::spellcasting::{Spell, SpellBook};
use crate::reference::{ReferenceData, SpellRecord};
use rand::seq::SliceRandom;
use rand::Rng;

/// Circle of the Land spells per terrain, tiers 1-4 (druid levels 3, 5, 7, 9).
pub const CIRCLE_SPELLS: [(&str, [[&str; 2]; 4]); 8] = [
    (
        "arctic",
        [
            ["hold-person", "spike-growth"],
            ["sleet-storm", "slow"],
            ["freedom-of-movement", "ice-storm"],
            ["commune-with-nature", "cone-of-cold"],
        ],
    ),
    (
        "coast",
        [
            ["mirror-image", "misty-step"],
            ["water-breathing", "water-walk"],
            ["control-water", "freedom-of-movement"],
            ["conjure-elemental", "scrying"],
        ],
    ),
    (
        "desert",
        [
            ["blur", "silence"],
            ["create-food-and-water", "protection-from-energy"],
            ["blight", "hallucinatory-terrain"],
            ["insect-plague", "wall-of-stone"],
        ],
    ),
    (
        "forest",
        [
            ["barkskin", "spider-climb"],
            ["call-lightning", "plant-growth"],
            ["divination", "freedom-of-movement"],
            ["commune-with-nature", "tree-stride"],
        ],
    ),
    (
        "grassland",
        [
            ["invisibility", "pass-without-trace"],
            ["daylight", "haste"],
            ["divination", "freedom-of-movement"],
            ["dream", "insect-plague"],
        ],
    ),
    (
        "mountain",
        [
            ["spider-climb", "spike-growth"],
            ["lightning-bolt", "meld-into-stone"],
            ["stone-shape", "stoneskin"],
            ["passwall", "wall-of-stone"],
        ],
    ),
    (
        "swamp",
        [
            ["darkness", "melfs-acid-arrow"],
            ["water-walk", "stinking-cloud"],
            ["freedom-of-movement", "locate-creature"],
            ["insect-plague", "scrying"],
        ],
    ),
    (
        "underdark",
        [
            ["spider-climb", "web"],
            ["gaseous-form", "stinking-cloud"],
            ["greater-invisibility", "stone-shape"],
            ["cloudkill", "insect-plague"],
        ],
    ),
];

/// Oath spells by paladin level.
pub const OATH_SPELLS: [(&str, [(u32, [&str; 2]); 5]); 3] = [
    (
        "devotion",
        [
            (3, ["protection-from-evil-and-good", "sanctuary"]),
            (5, ["lesser-restoration", "zone-of-truth"]),
            (9, ["beacon-of-hope", "dispel-magic"]),
            (13, ["freedom-of-movement", "guardian-of-faith"]),
            (17, ["commune", "flame-strike"]),
        ],
    ),
    (
        "ancients",
        [
            (3, ["ensnaring-strike", "speak-with-animals"]),
            (5, ["moonbeam", "misty-step"]),
            (9, ["plant-growth", "protection-from-energy"]),
            (13, ["ice-storm", "stoneskin"]),
            (17, ["commune-with-nature", "tree-stride"]),
        ],
    ),
    (
        "vengeance",
        [
            (3, ["bane", "hunters-mark"]),
            (5, ["hold-person", "misty-step"]),
            (9, ["haste", "protection-from-energy"]),
            (13, ["banishment", "dimension-door"]),
            (17, ["hold-monster", "scrying"]),
        ],
    ),
];

/// Domain spells, tiers 1-5 unlocked by the `domain-spells-<tier>` features.
pub const DOMAIN_SPELLS: [(&str, [[&str; 2]; 5]); 7] = [
    (
        "knowledge",
        [
            ["command", "identify"],
            ["augury", "suggestion"],
            ["nondetection", "speak-with-dead"],
            ["arcane-eye", "confusion"],
            ["legend-lore", "scrying"],
        ],
    ),
    (
        "life",
        [
            ["bless", "cure-wounds"],
            ["lesser-restoration", "spiritual-weapon"],
            ["beacon-of-hope", "revivify"],
            ["death-ward", "guardian-of-faith"],
            ["mass-cure-wounds", "raise-dead"],
        ],
    ),
    (
        "light",
        [
            ["burning-hands", "faerie-fire"],
            ["flaming-sphere", "scorching-ray"],
            ["daylight", "fireball"],
            ["guardian-of-faith", "wall-of-fire"],
            ["flame-strike", "scrying"],
        ],
    ),
    (
        "nature",
        [
            ["animal-friendship", "entangle"],
            ["barkskin", "spike-growth"],
            ["plant-growth", "wind-wall"],
            ["dominate-beast", "grasping-vine"],
            ["insect-plague", "tree-stride"],
        ],
    ),
    (
        "tempest",
        [
            ["fog-cloud", "thunderwave"],
            ["gust-of-wind", "shatter"],
            ["call-lightning", "sleet-storm"],
            ["control-water", "ice-storm"],
            ["destructive-wave", "insect-plague"],
        ],
    ),
    (
        "trickery",
        [
            ["charm-person", "disguise-self"],
            ["mirror-image", "pass-without-trace"],
            ["blink", "dispel-magic"],
            ["dimension-door", "polymorph"],
            ["dominate-person", "modify-memory"],
        ],
    ),
    (
        "war",
        [
            ["divine-favor", "shield-of-faith"],
            ["magic-weapon", "spiritual-weapon"],
            ["crusaders-mantle", "spirit-guardians"],
            ["freedom-of-movement", "stoneskin"],
            ["flame-strike", "hold-monster"],
        ],
    ),
];

/// (feature index, highest spell level, spell count)
const MAGICAL_SECRETS: [(&str, u32, usize); 4] = [
    ("additional-magical-secrets", 3, 2),
    ("magical-secrets-1", 5, 2),
    ("magical-secrets-2", 7, 2),
    ("magical-secrets-3", 9, 2),
];

const MYSTIC_ARCANUM: [(&str, u32); 4] = [
    ("mystic-arcanum-6th-level", 6),
    ("mystic-arcanum-7th-level", 7),
    ("mystic-arcanum-8th-level", 8),
    ("mystic-arcanum-9th-level", 9),
];

const PACT_OF_THE_TOME_CANTRIPS: usize = 3;

fn learn_listed(book: &mut SpellBook, data: &ReferenceData, indices: &[&str], source: &str) {
    for index in indices {
        match data.find_spell(index) {
            Some(record) => book.learn(Spell::from_record(record)),
            None => tracing::debug!(spell = %index, source, "listed spell not in reference data"),
        }
    }
}

fn learn_random<'a>(
    book: &mut SpellBook,
    pool: impl Iterator<Item = &'a SpellRecord>,
    count: usize,
    uses_per_long_rest: Option<u32>,
    rng: &mut impl Rng,
) {
    let open: Vec<&SpellRecord> = pool.filter(|s| !book.knows(&s.index)).collect();
    for record in open.choose_multiple(rng, count) {
        let spell = match uses_per_long_rest {
            Some(uses) => Spell::limited(record, uses),
            None => Spell::from_record(record),
        };
        book.learn(spell);
    }
}

fn has_feature(features: &[Feature], index: &str) -> bool {
    features.iter().any(|f| f.index == index)
}

/// Racial spellcasting traits.
pub fn apply_trait_spells(
    traits: &[String],
    level: u32,
    data: &ReferenceData,
    book: &mut SpellBook,
    rng: &mut impl Rng,
) {
    if traits.iter().any(|t| t == "high-elf-cantrip") {
        let wizard_cantrips = data
            .spells()
            .filter(|s| s.level == 0 && s.classes.iter().any(|c| c == "wizard"));
        learn_random(book, wizard_cantrips, 1, None, rng);
    }

    if traits.iter().any(|t| t == "infernal-legacy") {
        learn_listed(book, data, &["thaumaturgy"], "infernal-legacy");
        for (min_level, index) in [(3, "hellish-rebuke"), (5, "darkness")] {
            if level < min_level {
                continue;
            }
            match data.find_spell(index) {
                Some(record) => book.learn(Spell::limited(record, 1)),
                None => tracing::debug!(spell = %index, "infernal legacy spell missing"),
            }
        }
    }
}

/// Spells granted by class features.
pub fn apply_feature_spells(
    features: &[Feature],
    data: &ReferenceData,
    book: &mut SpellBook,
    rng: &mut impl Rng,
) {
    for (feature, max_level, count) in MAGICAL_SECRETS {
        if has_feature(features, feature) {
            let pool = data.spells().filter(move |s| s.level <= max_level);
            learn_random(book, pool, count, None, rng);
        }
    }

    if has_feature(features, "pact-of-the-tome") {
        let cantrips = data.spells().filter(|s| s.level == 0);
        learn_random(book, cantrips, PACT_OF_THE_TOME_CANTRIPS, None, rng);
    }

    for (feature, spell_level) in MYSTIC_ARCANUM {
        if has_feature(features, feature) {
            let pool = data
                .spells()
                .filter(move |s| s.level == spell_level && s.classes.iter().any(|c| c == "warlock"));
            learn_random(book, pool, 1, Some(1), rng);
        }
    }

    if has_feature(features, "bonus-cantrip") {
        let druid_cantrips = data
            .spells()
            .filter(|s| s.level == 0 && s.classes.iter().any(|c| c == "druid"));
        learn_random(book, druid_cantrips, 1, None, rng);
    }
}

/// Terrain recorded on a Circle of the Land feature, if any.
pub fn land_terrain(features: &[Feature]) -> Option<&str> {
    features
        .iter()
        .filter(|f| f.index.starts_with("circle-spells"))
        .find_map(|f| match &f.spec {
            Some(FeatureSpec::FavoredTerrain { terrains }) => terrains.first().map(String::as_str),
            _ => None,
        })
}

/// Fixed subclass spell lists: druid circles, paladin oaths and cleric domains.
pub fn apply_subclass_spells(
    class: &str,
    subclass: Option<&str>,
    level: u32,
    features: &[Feature],
    data: &ReferenceData,
    book: &mut SpellBook,
) {
    match class {
        "druid" => {
            let Some(terrain) = land_terrain(features) else {
                return;
            };
            let Some((_, tiers)) = CIRCLE_SPELLS.iter().find(|(t, _)| *t == terrain) else {
                tracing::debug!(terrain, "no circle spell table for terrain");
                return;
            };
            for (tier, spells) in tiers.iter().enumerate() {
                if has_feature(features, &format!("circle-spells-{}", tier + 1)) {
                    learn_listed(book, data, spells, "circle-spells");
                }
            }
        }
        "paladin" => {
            if !has_feature(features, "oath-spells") {
                return;
            }
            let Some(oath) = subclass else { return };
            if let Some((_, table)) = OATH_SPELLS.iter().find(|(o, _)| *o == oath) {
                for (unlock, spells) in table.iter().filter(|(unlock, _)| level >= *unlock) {
                    tracing::trace!(unlock, "oath spells");
                    learn_listed(book, data, spells, "oath-spells");
                }
            }
        }
        "cleric" => {
            let Some(domain) = subclass else { return };
            if let Some((_, tiers)) = DOMAIN_SPELLS.iter().find(|(d, _)| *d == domain) {
                for (tier, spells) in tiers.iter().enumerate() {
                    if has_feature(features, &format!("domain-spells-{}", tier + 1)) {
                        learn_listed(book, data, spells, "domain-spells");
                    }
                }
            }
        }
        _ => {}
    }
}
