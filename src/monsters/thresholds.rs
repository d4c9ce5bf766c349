//! XP budgets: per-level tier thresholds, group multipliers and the floor/ceiling window.

use crate::core::constants::{GROUP_MULTIPLIERS, MAX_LEVEL, MIN_LEVEL, XP_THRESHOLDS};
use crate::encounter::Difficulty;
use serde::{Deserialize, Serialize};

/// XP threshold of one character at `level` for a tier.
///
/// Cakewalk is half of Easy, Impossible is one and a half Deadly (both rounded down).
pub fn level_threshold(level: u32, difficulty: Difficulty) -> u32 {
    let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
    let (easy, medium, hard, deadly) = XP_THRESHOLDS[(level - 1) as usize];
    match difficulty {
        Difficulty::Cakewalk => easy / 2,
        Difficulty::Easy => easy,
        Difficulty::Normal => medium,
        Difficulty::Hard => hard,
        Difficulty::Deadly => deadly,
        Difficulty::Impossible => deadly * 3 / 2,
    }
}

/// Tier threshold summed over the whole party.
pub fn party_threshold(levels: &[u32], difficulty: Difficulty) -> u32 {
    levels.iter().map(|&l| level_threshold(l, difficulty)).sum()
}

/// Position of a group size in the multiplier table.
fn multiplier_step(count: usize) -> usize {
    GROUP_MULTIPLIERS
        .iter()
        .position(|(max, _)| count <= *max)
        .unwrap_or(GROUP_MULTIPLIERS.len() - 1)
}

/// XP multiplier for a group of `count` monsters.
pub fn group_multiplier(count: usize) -> f64 {
    GROUP_MULTIPLIERS[multiplier_step(count)].1
}

/// Group multiplier, bumped one step for a lone monster at Deadly or above.
pub fn adjusted_multiplier(count: usize, difficulty: Difficulty) -> f64 {
    let step = multiplier_step(count);
    if step == 0 && difficulty >= Difficulty::Deadly {
        GROUP_MULTIPLIERS[1].1
    } else {
        GROUP_MULTIPLIERS[step].1
    }
}

/// Accepted raw XP sums: `floor < sum <= ceiling`. No ceiling means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpWindow {
    pub floor: u32,
    pub ceiling: Option<u32>,
}

impl XpWindow {
    pub fn contains(&self, sum: u32) -> bool {
        sum > self.floor && self.ceiling.map_or(true, |c| sum <= c)
    }

    pub fn admits(&self, xp: u32) -> bool {
        self.ceiling.map_or(true, |c| xp <= c)
    }

    /// How far a sum lies outside the window (0 inside).
    pub fn distance(&self, sum: u32) -> u32 {
        if sum <= self.floor {
            self.floor + 1 - sum
        } else {
            match self.ceiling {
                Some(c) if sum > c => sum - c,
                _ => 0,
            }
        }
    }
}

/// Window for `count` monsters at a tier.
///
/// # Arguments
/// * `levels` - Party member levels
/// * `difficulty` - Target tier
/// * `count` - Monster group size
pub fn xp_window(levels: &[u32], difficulty: Difficulty, count: usize) -> XpWindow {
    let multiplier = adjusted_multiplier(count, difficulty);

    // ceiling = threshold(tier) / multiplier, floor = threshold(previous tier) / multiplier
    let ceiling = match difficulty {
        Difficulty::Impossible => None,
        tier => Some((party_threshold(levels, tier) as f64 / multiplier).floor() as u32),
    };
    let floor = match difficulty.previous() {
        Some(previous) => (party_threshold(levels, previous) as f64 / multiplier).floor() as u32,
        None => 0,
    };

    XpWindow { floor, ceiling }
}
