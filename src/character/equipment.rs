//! Starting-equipment resolution and the auto-equip policy.

use crate::core::error::Result;
use crate::items::{Equipment, Loadout};
use crate::reference::{ClassRecord, EquipmentChoice, EquipmentOption, OptionSet, ReferenceData};
use rand::seq::SliceRandom;
use rand::Rng;

/// A resolved `(equipment index, quantity)` entry before lookup.
pub type RawItem = (String, u32);

/// Resolves fixed items and every option block of a class into a flat list.
pub fn resolve_starting_equipment(
    class: &ClassRecord,
    data: &ReferenceData,
    rng: &mut impl Rng,
) -> Result<Vec<RawItem>> {
    let mut items: Vec<RawItem> = class
        .starting_equipment
        .iter()
        .map(|s| (s.equipment.clone(), s.quantity))
        .collect();

    for choice in &class.starting_equipment_options {
        resolve_choice(choice, data, rng, &mut items)?;
    }

    Ok(items)
}

fn resolve_choice(
    choice: &EquipmentChoice,
    data: &ReferenceData,
    rng: &mut impl Rng,
    out: &mut Vec<RawItem>,
) -> Result<()> {
    match &choice.from {
        OptionSet::EquipmentCategory { equipment_category } => {
            draw_from_category(equipment_category, choice.choose, data, rng, out)
        }
        OptionSet::OptionsArray { options } => {
            let picked: Vec<&EquipmentOption> =
                options.choose_multiple(rng, choice.choose).collect();
            for option in picked {
                resolve_option(option, data, rng, out)?;
            }
            Ok(())
        }
    }
}

fn resolve_option(
    option: &EquipmentOption,
    data: &ReferenceData,
    rng: &mut impl Rng,
    out: &mut Vec<RawItem>,
) -> Result<()> {
    match option {
        EquipmentOption::CountedReference { count, of } => {
            out.push((of.clone(), *count));
            Ok(())
        }
        EquipmentOption::Multiple { items } => {
            for item in items {
                resolve_option(item, data, rng, out)?;
            }
            Ok(())
        }
        EquipmentOption::Choice { choice } => resolve_choice(choice, data, rng, out),
    }
}

fn draw_from_category(
    category: &str,
    count: usize,
    data: &ReferenceData,
    rng: &mut impl Rng,
    out: &mut Vec<RawItem>,
) -> Result<()> {
    let record = data.category(category)?;
    out.extend(
        record
            .equipment
            .choose_multiple(rng, count)
            .map(|index| (index.clone(), 1)),
    );
    Ok(())
}

/// Looks up every raw item and partitions it. Weapons and armor expand to one entry per unit.
pub fn build_loadout(raw: &[RawItem], data: &ReferenceData) -> Result<Loadout> {
    let mut loadout = Loadout::default();
    for (index, quantity) in raw {
        let record = data.equipment(index)?;
        match Equipment::from_record(record, *quantity) {
            Some(Equipment::Ammunition(ammo)) => loadout.push(Equipment::Ammunition(ammo)),
            Some(item) => {
                for _ in 0..(*quantity).max(1) {
                    loadout.push(item.clone());
                }
            }
            None => tracing::trace!(item = %index, "ignoring non-combat gear"),
        }
    }
    Ok(loadout)
}

fn equip_shield(loadout: &mut Loadout) {
    if let Some(shield) = loadout.armor.iter_mut().find(|a| a.is_shield()) {
        shield.equipped = true;
    }
}

/// Marks a consistent set of items as equipped.
pub fn auto_equip(loadout: &mut Loadout, strength: i32, rng: &mut impl Rng) {
    if !loadout.melee_weapons.is_empty() {
        let pick = rng.gen_range(0..loadout.melee_weapons.len());
        loadout.melee_weapons[pick].equipped = true;
        let is_light = loadout.melee_weapons[pick].has_property("light");
        let is_two_handed = loadout.melee_weapons[pick].has_property("two-handed");

        if is_light {
            let off_hand = loadout
                .melee_weapons
                .iter()
                .position(|w| !w.equipped && w.has_property("light"));
            match off_hand {
                Some(i) => loadout.melee_weapons[i].equipped = true,
                None => equip_shield(loadout),
            }
        } else if is_two_handed {
            for shield in loadout.armor.iter_mut().filter(|a| a.is_shield()) {
                shield.equipped = false;
            }
        } else {
            equip_shield(loadout);
        }
    }

    if !loadout.ranged_weapons.is_empty() {
        let pick = rng.gen_range(0..loadout.ranged_weapons.len());
        loadout.ranged_weapons[pick].equipped = true;
    }

    let has_body_armor = loadout.armor.iter().any(|a| !a.is_shield());
    let eligible: Vec<usize> = loadout
        .armor
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.is_shield() && a.str_minimum <= strength)
        .map(|(i, _)| i)
        .collect();

    if let Some(&pick) = eligible.choose(rng) {
        loadout.armor[pick].equipped = true;
    } else if has_body_armor {
        tracing::warn!(strength, "insufficient strength for any available armor");
    }
}

/// Full resolver: options, lookup, partition, auto-equip.
pub fn resolve_loadout(
    class: &ClassRecord,
    strength: i32,
    data: &ReferenceData,
    rng: &mut impl Rng,
) -> Result<Loadout> {
    let raw = resolve_starting_equipment(class, data, rng)?;
    let mut loadout = build_loadout(&raw, data)?;
    auto_equip(&mut loadout, strength, rng);
    tracing::debug!(
        class = %class.index,
        melee = loadout.melee_weapons.len(),
        ranged = loadout.ranged_weapons.len(),
        armor = loadout.armor.len(),
        "resolved starting equipment"
    );
    Ok(loadout)
}
