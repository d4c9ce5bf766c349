//! Capability traits shared by party members and monsters.

use super::math::{damage_factor, hit_probability};
use super::power::{
    monster_healing_power, monster_offensive_power, party_healing_power, party_offensive_power,
};
use crate::character::{AttributeType, Attributes, PartyMember, Skill};
use crate::core::constants::{
    BASELINE_SPEED, IMMUNITY_BASE_STAT_WEIGHT, VULNERABILITY_BASE_STAT_WEIGHT,
};
use crate::encounter::Difficulty;
use crate::monsters::Monster;

pub trait Combatant {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn hit_points(&self) -> i32;
    fn armor_class(&self) -> i32;
    fn proficiency_bonus(&self) -> i32;
    fn attributes(&self) -> &Attributes;
    fn skills(&self) -> &[Skill];
    fn resistances(&self) -> &[String];
    fn immunities(&self) -> &[String];
    fn vulnerabilities(&self) -> &[String];

    /// Non-combat strength used to rebalance side power.
    fn base_stats(&self) -> f64;
}

pub trait Defender: Combatant {
    /// Chance to succeed on a saving throw against `dc`.
    fn save_probability(&self, ability: AttributeType, dc: i32) -> f64 {
        hit_probability(dc, self.attributes().save(ability))
    }

    fn damage_factor(&self, damage_type: &str) -> f64 {
        damage_factor(
            self.resistances(),
            self.immunities(),
            self.vulnerabilities(),
            damage_type,
        )
    }
}

pub trait Attacker: Combatant {
    /// Expected damage per round against `targets`.
    fn offensive_power<T: Defender>(&self, targets: &[T], difficulty: Difficulty) -> f64;
}

pub trait Healer {
    /// Expected hit points restored per round.
    fn healing_power(&self) -> f64;
}

/// speed + 2 per foot above the baseline.
pub fn party_speed_value(speed: i32) -> f64 {
    (speed + 2 * (speed - BASELINE_SPEED).max(0)) as f64
}

/// resistances + 5 x immunities + condition immunities - 2.5 x vulnerabilities.
pub fn resistance_score(monster: &Monster) -> f64 {
    monster.resistances.len() as f64
        + IMMUNITY_BASE_STAT_WEIGHT * monster.immunities.len() as f64
        + monster.condition_immunities.len() as f64
        + VULNERABILITY_BASE_STAT_WEIGHT * monster.vulnerabilities.len() as f64
}

impl Combatant for PartyMember {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn hit_points(&self) -> i32 {
        self.hit_points
    }

    fn armor_class(&self) -> i32 {
        self.armor_class
    }

    fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn skills(&self) -> &[Skill] {
        &self.skills
    }

    fn resistances(&self) -> &[String] {
        &self.resistances
    }

    fn immunities(&self) -> &[String] {
        &self.immunities
    }

    fn vulnerabilities(&self) -> &[String] {
        &self.vulnerabilities
    }

    fn base_stats(&self) -> f64 {
        let skills: i32 = self.skills.iter().map(|s| s.modifier).sum();
        party_speed_value(self.speed) + self.attributes.total() as f64 + skills as f64
    }
}

impl Defender for PartyMember {}

impl Attacker for PartyMember {
    fn offensive_power<T: Defender>(&self, targets: &[T], difficulty: Difficulty) -> f64 {
        party_offensive_power(self, targets, difficulty)
    }
}

impl Healer for PartyMember {
    fn healing_power(&self) -> f64 {
        party_healing_power(self)
    }
}

impl Combatant for Monster {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn hit_points(&self) -> i32 {
        self.hit_points
    }

    fn armor_class(&self) -> i32 {
        self.armor_class
    }

    fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn skills(&self) -> &[Skill] {
        &self.skills
    }

    fn resistances(&self) -> &[String] {
        &self.resistances
    }

    fn immunities(&self) -> &[String] {
        &self.immunities
    }

    fn vulnerabilities(&self) -> &[String] {
        &self.vulnerabilities
    }

    fn base_stats(&self) -> f64 {
        self.hit_points as f64
            + self.speed_value()
            + self.attributes.total() as f64
            + self.proficient_skill_total() as f64
            + resistance_score(self)
            + self.armor_class as f64
    }
}

impl Defender for Monster {}

impl Attacker for Monster {
    fn offensive_power<T: Defender>(&self, targets: &[T], difficulty: Difficulty) -> f64 {
        monster_offensive_power(self, targets, difficulty)
    }
}

impl Healer for Monster {
    fn healing_power(&self) -> f64 {
        monster_healing_power(self)
    }
}
