//! Turns side power and hit points into a winner and a round count.

use super::combatant::{Attacker, Combatant, Defender, Healer};
use super::math::mean;
use crate::core::constants::{MIN_SIDE_POWER, VARIANCE_PERCENT};
use crate::encounter::{Difficulty, EncounterResult, Outcome};
use crate::monsters::Monster;
use crate::character::PartyMember;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Random swing applied to each side's power, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variance {
    pub percent: i32,
}

impl Default for Variance {
    fn default() -> Self {
        Self::new(VARIANCE_PERCENT)
    }
}

impl Variance {
    pub fn new(percent: i32) -> Self {
        Self {
            percent: percent.abs(),
        }
    }

    /// No swing at all, for deterministic checks.
    pub fn none() -> Self {
        Self { percent: 0 }
    }

    /// Draws an integer percentage in `[-percent, +percent]`.
    pub fn roll(&self, rng: &mut impl Rng) -> i32 {
        if self.percent == 0 {
            0
        } else {
            rng.gen_range(-self.percent..=self.percent)
        }
    }
}

/// power = trunc(power * (1 + v/100)), floored at the minimum side power.
pub fn apply_variance(power: f64, percent: i32) -> f64 {
    let varied = (power * (1.0 + percent as f64 / 100.0)).trunc();
    if varied <= 0.0 {
        MIN_SIDE_POWER
    } else {
        varied
    }
}

/// Aggregated numbers for one side of the fight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    /// Average base stats of the side's combatants, truncated to a whole number
    pub base_stats: f64,
    /// Offensive plus healing power per round
    pub power: f64,
    pub hit_points: i32,
}

fn summarize<A, D>(side: &[A], opponents: &[D], difficulty: Difficulty) -> SideSummary
where
    A: Combatant + Attacker + Healer,
    D: Defender,
{
    let power = side
        .iter()
        .map(|c| c.offensive_power(opponents, difficulty) + c.healing_power())
        .sum::<f64>()
        .max(0.0);
    SideSummary {
        base_stats: mean(side.iter().map(|c| c.base_stats())).trunc(),
        power,
        hit_points: side.iter().map(|c| c.hit_points()).sum(),
    }
}

pub fn party_summary(
    party: &[PartyMember],
    monsters: &[Monster],
    difficulty: Difficulty,
) -> SideSummary {
    summarize(party, monsters, difficulty)
}

pub fn monster_summary(
    monsters: &[Monster],
    party: &[PartyMember],
    difficulty: Difficulty,
) -> SideSummary {
    summarize(monsters, party, difficulty)
}

/// Shifts power toward the side with weaker base stats.
///
/// ratio = |gap| / max(bases); the stronger side's power is scaled by (1 - ratio/2)
/// and the weaker side's by (1 + ratio/2).
pub fn rebalance(party: &mut SideSummary, monsters: &mut SideSummary) {
    let gap = (party.base_stats - monsters.base_stats).abs();
    let top = party.base_stats.max(monsters.base_stats);
    if gap <= 0.0 || top <= 0.0 {
        return;
    }
    let ratio = gap / top;
    let (stronger, weaker) = if party.base_stats > monsters.base_stats {
        (party, monsters)
    } else {
        (monsters, party)
    };
    stronger.power *= 1.0 - ratio / 2.0;
    weaker.power *= 1.0 + ratio / 2.0;
}

/// ceil(hit points / power); power is at least the minimum side power.
pub fn rounds_to_defeat(hit_points: i32, power: f64) -> u32 {
    (hit_points.max(0) as f64 / power.max(MIN_SIDE_POWER)).ceil() as u32
}

/// Both sides after rebalancing and variance.
pub fn resolve_sides(
    party: &[PartyMember],
    monsters: &[Monster],
    difficulty: Difficulty,
    variance: Variance,
    rng: &mut impl Rng,
) -> (SideSummary, SideSummary) {
    let mut party_side = party_summary(party, monsters, difficulty);
    let mut monster_side = monster_summary(monsters, party, difficulty);
    rebalance(&mut party_side, &mut monster_side);

    let party_swing = variance.roll(rng);
    let monster_swing = variance.roll(rng);
    party_side.power = apply_variance(party_side.power, party_swing);
    monster_side.power = apply_variance(monster_side.power, monster_swing);
    (party_side, monster_side)
}

/// Winner and fight length from the two finished sides.
///
/// Ties go to the side with the better base stats, the party on equal footing.
pub fn decide_outcome(party: &SideSummary, monsters: &SideSummary) -> (Outcome, u32) {
    let party_rounds = rounds_to_defeat(monsters.hit_points, party.power);
    let monster_rounds = rounds_to_defeat(party.hit_points, monsters.power);
    if party_rounds < monster_rounds {
        (Outcome::Victory, party_rounds)
    } else if party_rounds > monster_rounds {
        (Outcome::Defeat, monster_rounds)
    } else if party.base_stats >= monsters.base_stats {
        (Outcome::Victory, party_rounds)
    } else {
        (Outcome::Defeat, monster_rounds)
    }
}

/// Predicts the winner and fight length of an encounter.
///
/// # Arguments
/// * `party` - Party members
/// * `monsters` - Monster group
/// * `difficulty` - Tier the encounter was built for
/// * `variance` - Power swing source; `Variance::none()` for deterministic results
/// * `rng` - Random number generator
pub fn resolve_outcome(
    party: &[PartyMember],
    monsters: &[Monster],
    difficulty: Difficulty,
    variance: Variance,
    rng: &mut impl Rng,
) -> EncounterResult {
    let (party_side, monster_side) = resolve_sides(party, monsters, difficulty, variance, rng);

    let party_rounds = rounds_to_defeat(monster_side.hit_points, party_side.power);
    let monster_rounds = rounds_to_defeat(party_side.hit_points, monster_side.power);
    let (outcome, total_rounds) = decide_outcome(&party_side, &monster_side);

    let details = format!(
        "Party: base {:.1}, power {:.0}, HP {}, needs {} rounds | \
         Monsters: base {:.1}, power {:.0}, HP {}, needs {} rounds",
        party_side.base_stats,
        party_side.power,
        party_side.hit_points,
        party_rounds,
        monster_side.base_stats,
        monster_side.power,
        monster_side.hit_points,
        monster_rounds,
    );

    tracing::debug!(
        %outcome,
        total_rounds,
        party_power = party_side.power,
        monster_power = monster_side.power,
        "resolved outcome"
    );

    EncounterResult {
        outcome,
        total_rounds,
        details,
    }
}
