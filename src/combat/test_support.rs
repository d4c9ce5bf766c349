//! Hand-built combatants for unit tests.

use crate::character::{AttributeType, Attributes, PartyMember, Skill, Spell, SpellBook};
use crate::character::standard_skills;
use crate::items::{Loadout, Weapon, WeaponCategory, WeaponRange};
use crate::monsters::{Monster, MonsterAction};
use crate::reference::{ActionDamage, MonsterSpeed, SpellDamage, SpellDc};
use serde_json::Map;
use std::collections::BTreeMap;

pub fn longsword() -> Weapon {
    Weapon {
        index: "longsword".into(),
        name: "Longsword".into(),
        category: WeaponCategory::Martial,
        range: WeaponRange::Melee,
        damage_dice: "1d8".into(),
        damage_type: "slashing".into(),
        properties: vec!["versatile".into()],
        equipped: true,
    }
}

pub fn dagger() -> Weapon {
    Weapon {
        index: "dagger".into(),
        name: "Dagger".into(),
        category: WeaponCategory::Simple,
        range: WeaponRange::Melee,
        damage_dice: "1d4".into(),
        damage_type: "piercing".into(),
        properties: vec!["finesse".into(), "light".into(), "thrown".into()],
        equipped: true,
    }
}

fn member(
    class: &str,
    values: [i32; 6],
    level: u32,
    proficiency_bonus: i32,
    proficiencies: Vec<String>,
) -> PartyMember {
    let attributes = Attributes::from_values(values);
    PartyMember {
        id: "member-1".into(),
        name: format!("Human {}", class),
        level,
        class: class.to_ascii_lowercase(),
        subclass: None,
        race: "human".into(),
        subrace: None,
        hit_die: 10,
        proficiency_bonus,
        skills: standard_skills(&attributes, proficiency_bonus, &proficiencies, &[]),
        attributes,
        hit_points: 44,
        armor_class: 16,
        initiative: 1,
        speed: 30,
        traits: Vec::new(),
        proficiencies,
        resistances: Vec::new(),
        immunities: Vec::new(),
        vulnerabilities: Vec::new(),
        features: Vec::new(),
        spellcasting_ability: None,
        spellbook: SpellBook::default(),
        class_specific: Map::new(),
        subclass_specific: Map::new(),
        loadout: Loadout::default(),
    }
}

/// Level 5 fighter: HP 44, AC 16, longsword at +7 for 1d8+3.
pub fn fighter() -> PartyMember {
    let mut fighter = member(
        "Fighter",
        [16, 12, 14, 10, 10, 8],
        5,
        4,
        vec!["martial-weapons".into(), "simple-weapons".into()],
    );
    fighter.loadout.melee_weapons.push(longsword());
    fighter
}

fn spell(index: &str, level: u32) -> Spell {
    Spell {
        index: index.into(),
        name: index.into(),
        level,
        attack_type: None,
        dc: None,
        damage: None,
        heal_at_slot_level: BTreeMap::new(),
        uses_per_long_rest: None,
    }
}

/// Level 5 wizard with fire bolt, magic missile, fireball and cure wounds.
pub fn wizard() -> PartyMember {
    let mut wizard = member(
        "Wizard",
        [8, 14, 12, 16, 12, 10],
        5,
        3,
        vec!["dagger".into()],
    );
    wizard.spellcasting_ability = Some(AttributeType::Intelligence);
    wizard.hit_points = 27;
    wizard.armor_class = 12;
    wizard.loadout.melee_weapons.push(dagger());

    let mut bolt = spell("fire-bolt", 0);
    bolt.attack_type = Some("ranged".into());
    bolt.damage = Some(SpellDamage {
        damage_type: Some("fire".into()),
        damage_at_slot_level: BTreeMap::new(),
        damage_at_character_level: BTreeMap::from([(1, "1d10".into()), (5, "2d10".into())]),
    });

    let mut missile = spell("magic-missile", 1);
    missile.damage = Some(SpellDamage {
        damage_type: Some("force".into()),
        damage_at_slot_level: BTreeMap::from([(1, "3d4+3".into())]),
        damage_at_character_level: BTreeMap::new(),
    });

    let mut fireball = spell("fireball", 3);
    fireball.dc = Some(SpellDc {
        dc_type: "dex".into(),
        dc_success: "half".into(),
    });
    fireball.damage = Some(SpellDamage {
        damage_type: Some("fire".into()),
        damage_at_slot_level: BTreeMap::from([(3, "8d6".into())]),
        damage_at_character_level: BTreeMap::new(),
    });

    let mut cure = spell("cure-wounds", 1);
    cure.uses_per_long_rest = Some(1);
    cure.heal_at_slot_level = BTreeMap::from([(1, "1d8 + MOD".into())]);

    wizard.spellbook = SpellBook {
        slots: vec![4, 3, 2],
        cantrips: vec![bolt],
        spells: vec![missile, fireball, cure],
    };
    wizard
}

/// Goblin-shaped monster: scimitar at +4 for 1d6+2 plus a utility action.
pub fn goblin(armor_class: i32) -> Monster {
    let attributes = Attributes::from_values([8, 14, 10, 10, 8, 8]);
    let listed = [("skill-stealth".to_string(), 6)];
    let skills: Vec<Skill> = crate::character::monster_skills(&attributes, &listed);
    Monster {
        id: "monster-1".into(),
        index: "goblin".into(),
        name: "Goblin".into(),
        size: "Small".into(),
        kind: "humanoid".into(),
        challenge_rating: 0.25,
        xp: 50,
        hit_points: 7,
        armor_class,
        proficiency_bonus: 2,
        speed: MonsterSpeed {
            walk: Some("30 ft.".into()),
            ..Default::default()
        },
        attributes,
        skills,
        resistances: Vec::new(),
        immunities: Vec::new(),
        vulnerabilities: Vec::new(),
        condition_immunities: Vec::new(),
        actions: vec![
            MonsterAction::Attack {
                name: "Scimitar".into(),
                attack_bonus: 4,
                damage: vec![ActionDamage {
                    damage_type: "slashing".into(),
                    damage_dice: "1d6+2".into(),
                }],
                usage: None,
            },
            MonsterAction::Utility {
                name: "Nimble Escape".into(),
            },
        ],
        spellcasting: None,
    }
}
