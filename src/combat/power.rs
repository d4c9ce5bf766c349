//! Expected damage and healing per round for party members and monsters.

use super::combatant::Defender;
use super::math::{hit_probability, mean, per_rounds, usage_fraction};
use crate::character::{AttributeType, PartyMember, Spell};
use crate::core::constants::{SAVE_DC_BASE, UPCAST_DAMAGE_PER_TIER};
use crate::core::dice::{average_of, DiceExpr};
use crate::encounter::Difficulty;
use crate::items::{Weapon, WeaponRange};
use crate::monsters::{Monster, MonsterAction};
use crate::reference::ActionDamage;

const EXTRA_ATTACK_PREFIX: &str = "extra-attack";

/// Average AC of the targets, truncated.
fn average_armor_class<T: Defender>(targets: &[T]) -> i32 {
    mean(targets.iter().map(|t| t.armor_class() as f64)) as i32
}

/// Average chance that the targets make a save.
fn average_save_probability<T: Defender>(
    targets: &[T],
    ability: Option<AttributeType>,
    dc: i32,
) -> f64 {
    match ability {
        Some(ability) => mean(targets.iter().map(|t| t.save_probability(ability, dc))),
        None => 0.0,
    }
}

/// Scales power by the targets' defenses.
///
/// Factors of the distinct damage types multiply per target; the result is averaged over
/// targets. No targets or no damage types leave the power unchanged.
pub fn defense_adjusted<T: Defender>(power: f64, damage_types: &[&str], targets: &[T]) -> f64 {
    let mut types: Vec<&str> = damage_types.iter().copied().filter(|t| !t.is_empty()).collect();
    types.sort_unstable();
    types.dedup();
    if targets.is_empty() || types.is_empty() {
        return power;
    }
    let factor = mean(
        targets
            .iter()
            .map(|t| types.iter().map(|dt| t.damage_factor(dt)).product::<f64>()),
    );
    power * factor
}

// ── Party weapons ──

/// Ability modifier a weapon attacks with.
pub fn weapon_ability_modifier(member: &PartyMember, weapon: &Weapon) -> i32 {
    let strength = member.attributes.modifier(AttributeType::Strength);
    let dexterity = member.attributes.modifier(AttributeType::Dexterity);
    if weapon.has_property("finesse") || weapon.has_property("thrown") {
        strength.max(dexterity)
    } else if weapon.range == WeaponRange::Ranged {
        dexterity
    } else {
        strength
    }
}

pub fn is_weapon_proficient(member: &PartyMember, weapon: &Weapon) -> bool {
    weapon
        .proficiency_keys()
        .iter()
        .any(|key| member.is_proficient(key))
}

/// Attack bonus = ability mod + proficiency if proficient.
pub fn weapon_attack_bonus(member: &PartyMember, weapon: &Weapon) -> i32 {
    let mut bonus = weapon_ability_modifier(member, weapon);
    if is_weapon_proficient(member, weapon) {
        bonus += member.proficiency_bonus;
    }
    bonus
}

/// Damage = dice average + ability mod, never negative.
pub fn weapon_damage(member: &PartyMember, weapon: &Weapon) -> i32 {
    (average_of(&weapon.damage_dice) + weapon_ability_modifier(member, weapon)).max(0)
}

fn weapon_power<T: Defender>(member: &PartyMember, weapon: &Weapon, targets: &[T]) -> f64 {
    let hit = hit_probability(average_armor_class(targets), weapon_attack_bonus(member, weapon));
    let power = hit * weapon_damage(member, weapon) as f64;
    defense_adjusted(power, &[weapon.damage_type.as_str()], targets)
}

pub fn extra_attacks(member: &PartyMember) -> usize {
    member
        .features
        .iter()
        .filter(|f| f.index.starts_with(EXTRA_ATTACK_PREFIX))
        .count()
}

fn best_weapon_power<'w, T: Defender>(
    member: &PartyMember,
    weapons: impl Iterator<Item = &'w Weapon>,
    targets: &[T],
) -> f64 {
    weapons
        .map(|w| weapon_power(member, w, targets))
        .fold(0.0, f64::max)
}

/// Best of the equipped melee and ranged weapon, times the number of attacks.
pub fn party_weapon_power<T: Defender>(member: &PartyMember, targets: &[T]) -> f64 {
    let melee = best_weapon_power(member, member.loadout.equipped_melee(), targets);
    let ranged = best_weapon_power(member, member.loadout.equipped_ranged(), targets);
    melee.max(ranged) * (1 + extra_attacks(member)) as f64
}

// ── Spells ──

/// What a spellcaster brings to its spells, party member or monster alike.
#[derive(Debug, Clone)]
pub struct Caster<'a> {
    pub attack_bonus: i32,
    pub save_dc: i32,
    pub modifier: i32,
    /// Level that cantrip damage scales with
    pub caster_level: u32,
    /// Slots per spell level, index 0 = 1st level
    pub slots: &'a [u32],
    pub spells: Vec<&'a Spell>,
}

impl<'a> Caster<'a> {
    pub fn for_member(member: &'a PartyMember) -> Self {
        let modifier = member.spellcasting_modifier();
        Self {
            attack_bonus: modifier + member.proficiency_bonus,
            save_dc: SAVE_DC_BASE + member.proficiency_bonus + modifier,
            modifier,
            caster_level: member.level,
            slots: &member.spellbook.slots,
            spells: member.spellbook.all().collect(),
        }
    }

    /// None for monsters without a spellcasting block.
    pub fn for_monster(monster: &'a Monster) -> Option<Self> {
        let block = monster.spellcasting.as_ref()?;
        Some(Self {
            attack_bonus: block.modifier,
            save_dc: block.dc,
            modifier: block.modifier,
            caster_level: monster.challenge_rating.ceil().max(1.0) as u32,
            slots: &block.slots,
            spells: block.spells.iter().collect(),
        })
    }

    fn highest_slot_level(&self) -> u32 {
        crate::character::spellcasting::highest_slot_level(self.slots)
    }
}

/// Average damage of one cast.
///
/// Slot-scaled spells use their lowest slot's dice plus a flat bonus per slot tier the caster
/// can reach above it. Cantrips use the dice of the highest character-level step reached.
pub fn spell_damage(spell: &Spell, caster_level: u32, highest_slot: u32) -> i32 {
    let Some(damage) = &spell.damage else {
        return 0;
    };
    if let Some((&base, dice)) = damage.damage_at_slot_level.iter().next() {
        let tiers_above = highest_slot.saturating_sub(base) as i32;
        return (average_of(dice) + tiers_above * UPCAST_DAMAGE_PER_TIER).max(0);
    }
    damage
        .damage_at_character_level
        .range(..=caster_level.max(1))
        .next_back()
        .map(|(_, dice)| average_of(dice).max(0))
        .unwrap_or(0)
}

/// Share of rounds a spell can be cast.
///
/// # Arguments
/// * `spell` - The spell being cast
/// * `caster` - Slots and the other spells competing for them
/// * `expected_rounds` - Expected length of the fight
pub fn spell_usage(spell: &Spell, caster: &Caster, expected_rounds: u32) -> f64 {
    if spell.is_cantrip() {
        return 1.0;
    }
    if let Some(uses) = spell.uses_per_long_rest {
        return per_rounds(uses, expected_rounds);
    }
    let level = spell.level as usize;
    let slots: u32 = caster.slots.iter().skip(level.saturating_sub(1)).sum();
    if slots == 0 {
        return 0.0;
    }
    let competing = caster
        .spells
        .iter()
        .filter(|s| !s.is_cantrip() && s.uses_per_long_rest.is_none())
        .count()
        .max(1);
    let casts = slots as f64 / competing as f64;
    (casts / expected_rounds.max(1) as f64).min(1.0)
}

/// Expected damage per round of one damage spell.
pub fn spell_power<T: Defender>(
    spell: &Spell,
    caster: &Caster,
    targets: &[T],
    difficulty: Difficulty,
) -> f64 {
    if !spell.deals_damage() {
        return 0.0;
    }
    let damage = spell_damage(spell, caster.caster_level, caster.highest_slot_level()) as f64;
    let usage = spell_usage(spell, caster, difficulty.expected_rounds());

    let (hit, save_success) = if spell.attack_type.is_some() {
        (hit_probability(average_armor_class(targets), caster.attack_bonus), 0.0)
    } else if let Some(dc) = &spell.dc {
        let ability = AttributeType::from_code(&dc.dc_type);
        let success = average_save_probability(targets, ability, caster.save_dc);
        (1.0 - success, success)
    } else {
        (1.0, 0.0)
    };

    let mut power = hit * damage;
    if spell.half_on_save() {
        power += damage / 2.0 * save_success;
    }
    let damage_type = spell.damage_type().unwrap_or_default();
    defense_adjusted(power * usage, &[damage_type], targets)
}

/// Summed power of every damage spell the caster knows.
pub fn caster_spell_power<T: Defender>(
    caster: &Caster,
    targets: &[T],
    difficulty: Difficulty,
) -> f64 {
    caster
        .spells
        .iter()
        .map(|spell| spell_power(spell, caster, targets, difficulty))
        .sum()
}

/// Average heal at the lowest slot of every healing spell, plus the modifier where the dice say so.
pub fn caster_healing_power(caster: &Caster) -> f64 {
    caster
        .spells
        .iter()
        .filter(|s| s.heals())
        .filter_map(|s| s.heal_at_slot_level.values().next())
        .filter_map(|dice| DiceExpr::parse(dice))
        .map(|dice| dice.average_with_modifier(caster.modifier).max(0) as f64)
        .sum()
}

// ── Totals ──

pub fn party_offensive_power<T: Defender>(
    member: &PartyMember,
    targets: &[T],
    difficulty: Difficulty,
) -> f64 {
    let caster = Caster::for_member(member);
    party_weapon_power(member, targets) + caster_spell_power(&caster, targets, difficulty)
}

pub fn party_healing_power(member: &PartyMember) -> f64 {
    caster_healing_power(&Caster::for_member(member))
}

fn damage_power<T: Defender>(damage: &[ActionDamage], targets: &[T]) -> f64 {
    damage
        .iter()
        .map(|d| {
            let average = average_of(&d.damage_dice).max(0) as f64;
            defense_adjusted(average, &[d.damage_type.as_str()], targets)
        })
        .sum()
}

/// Expected damage per round of a single action.
pub fn action_power<T: Defender>(
    monster: &Monster,
    action: &MonsterAction,
    targets: &[T],
    difficulty: Difficulty,
) -> f64 {
    let rounds = difficulty.expected_rounds();
    match action {
        MonsterAction::Attack {
            attack_bonus,
            damage,
            usage,
            ..
        } => {
            let hit = hit_probability(average_armor_class(targets), *attack_bonus);
            hit * damage_power(damage, targets) * usage_fraction(usage.as_ref(), rounds)
        }
        MonsterAction::SavingThrow {
            dc, damage, usage, ..
        } => {
            let ability = AttributeType::from_code(&dc.dc_type);
            let success = average_save_probability(targets, ability, dc.dc_value);
            let full = damage_power(damage, targets);
            let mut power = (1.0 - success) * full;
            if dc.success_type == "half" {
                power += full / 2.0 * success;
            }
            power * usage_fraction(usage.as_ref(), rounds)
        }
        MonsterAction::Multiattack { entries, .. } => entries
            .iter()
            .filter_map(|entry| {
                monster
                    .action(&entry.action_name)
                    .filter(|a| !matches!(a, MonsterAction::Multiattack { .. }))
                    .map(|a| entry.count as f64 * action_power(monster, a, targets, difficulty))
            })
            .sum(),
        MonsterAction::Utility { .. } => 0.0,
    }
}

/// Action power averaged over the stat block, plus spellcasting.
pub fn monster_offensive_power<T: Defender>(
    monster: &Monster,
    targets: &[T],
    difficulty: Difficulty,
) -> f64 {
    let actions: f64 = monster
        .actions
        .iter()
        .map(|a| action_power(monster, a, targets, difficulty))
        .sum();
    let actions = actions / monster.actions.len().max(1) as f64;
    let spells = Caster::for_monster(monster)
        .map(|caster| caster_spell_power(&caster, targets, difficulty))
        .unwrap_or(0.0);
    actions + spells
}

pub fn monster_healing_power(monster: &Monster) -> f64 {
    Caster::for_monster(monster)
        .map(|caster| caster_healing_power(&caster))
        .unwrap_or(0.0)
}
