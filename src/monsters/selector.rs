use super::thresholds::{xp_window, XpWindow};
use super::types::Monster;
use crate::core::error::{GenError, Result};
use crate::encounter::Difficulty;
use crate::reference::{MonsterRecord, ReferenceData};
use rand::seq::SliceRandom;
use rand::Rng;

/// Bounds on the monster search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_monsters: usize,
    /// Failed draws before the group size changes
    pub attempts_per_size: u32,
    /// Group-size changes before settling for the closest sample
    pub max_rounds: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        use crate::core::constants::{MAX_MONSTERS, MAX_SEARCH_ROUNDS, SEARCH_ATTEMPTS_PER_SIZE};
        Self {
            max_monsters: MAX_MONSTERS,
            attempts_per_size: SEARCH_ATTEMPTS_PER_SIZE,
            max_rounds: MAX_SEARCH_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonsterSelection {
    pub monsters: Vec<Monster>,
    pub xp_sum: u32,
    pub window: XpWindow,
    /// False when the search ran out and kept its closest sample.
    pub exact: bool,
}

struct Sample<'a> {
    records: Vec<&'a MonsterRecord>,
    xp_sum: u32,
    window: XpWindow,
    distance: u32,
}

/// K monsters from the pool, distinct unless the pool is smaller than K.
fn draw<'a>(pool: &[&'a MonsterRecord], k: usize, rng: &mut impl Rng) -> Vec<&'a MonsterRecord> {
    if pool.len() >= k {
        pool.choose_multiple(rng, k).copied().collect()
    } else {
        let mut records = Vec::with_capacity(k);
        for _ in 0..k {
            if let Some(record) = pool.choose(rng) {
                records.push(*record);
            }
        }
        records
    }
}

/// Next group size after a round of failed draws: shrink, or grow from a lone monster.
fn next_size(k: usize, max_monsters: usize) -> usize {
    if k <= 1 {
        2.min(max_monsters.max(1))
    } else {
        k - 1
    }
}

/// Picks a monster group whose raw XP sum falls in the tier's window.
///
/// # Arguments
/// * `levels` - Party member levels
/// * `difficulty` - Target tier
/// * `limits` - Search bounds
/// * `data` - Reference data holding the monster catalog
/// * `rng` - Random number generator
///
/// # Returns
/// The selection, flagged inexact when the search fell back to its closest sample.
/// `SearchExhaustion` when no candidate ever fit under a ceiling.
pub fn select_monsters(
    levels: &[u32],
    difficulty: Difficulty,
    limits: SearchLimits,
    data: &ReferenceData,
    rng: &mut impl Rng,
) -> Result<MonsterSelection> {
    let candidates = data.monster_candidates();
    let max_monsters = limits.max_monsters.max(1);
    let mut k = rng.gen_range(1..=max_monsters);
    let mut best: Option<Sample> = None;
    let mut found: Option<Sample> = None;

    'search: for round in 0..limits.max_rounds {
        let window = xp_window(levels, difficulty, k);
        let pool: Vec<&MonsterRecord> = candidates
            .iter()
            .copied()
            .filter(|m| window.admits(m.xp))
            .collect();

        if !pool.is_empty() {
            for _ in 0..limits.attempts_per_size {
                let records = draw(&pool, k, rng);
                let xp_sum = records.iter().map(|m| m.xp).sum();
                let distance = window.distance(xp_sum);
                let sample = Sample {
                    records,
                    xp_sum,
                    window,
                    distance,
                };
                if distance == 0 {
                    found = Some(sample);
                    break 'search;
                }
                if best.as_ref().map_or(true, |b| distance < b.distance) {
                    best = Some(sample);
                }
            }
        }

        tracing::trace!(round, k, ?window, pool = pool.len(), "no fit, resizing group");
        k = next_size(k, max_monsters);
    }

    let (sample, exact) = match (found, best) {
        (Some(sample), _) => (sample, true),
        (None, Some(sample)) => {
            tracing::debug!(
                difficulty = %difficulty,
                xp_sum = sample.xp_sum,
                distance = sample.distance,
                "monster search settled for closest sample"
            );
            (sample, false)
        }
        (None, None) => {
            return Err(GenError::SearchExhaustion {
                difficulty: difficulty.to_string(),
                party_levels: levels.to_vec(),
            })
        }
    };

    let mut monsters = Vec::with_capacity(sample.records.len());
    for (i, record) in sample.records.iter().enumerate() {
        let record = data.monster(&record.index)?;
        monsters.push(Monster::from_record(record, i + 1, data)?);
    }

    Ok(MonsterSelection {
        monsters,
        xp_sum: sample.xp_sum,
        window: sample.window,
        exact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn monster(index: &str, xp: u32) -> String {
        format!(
            r#"{{"index": "{0}", "name": "{0}", "armor_class": 12, "hit_points": 10,
                "strength": 10, "dexterity": 10, "constitution": 10, "intelligence": 10,
                "wisdom": 10, "charisma": 10, "challenge_rating": 1, "proficiency_bonus": 2,
                "xp": {1}}}"#,
            index, xp
        )
    }

    fn data(monsters: &[(&str, u32)]) -> ReferenceData {
        let list: Vec<String> = monsters.iter().map(|(i, xp)| monster(i, *xp)).collect();
        let json = format!(
            r#"{{"races": [{{"index": "human", "name": "Human"}}],
                "classes": [{{"index": "fighter", "name": "Fighter", "hit_die": 10}}],
                "monsters": [{}]}}"#,
            list.join(",")
        );
        ReferenceData::from_json_str(&json).unwrap()
    }

    fn catalog() -> ReferenceData {
        data(&[
            ("rat", 10),
            ("kobold", 25),
            ("goblin", 50),
            ("orc", 100),
            ("gnoll", 100),
            ("ogre", 450),
            ("troll", 1800),
            ("giant", 3900),
        ])
    }

    #[test]
    fn test_selection_lands_in_window() {
        let data = catalog();
        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let difficulty = Difficulty::all()[(seed % 5) as usize];
            let levels = [3, 3, 4];
            let selection =
                select_monsters(&levels, difficulty, SearchLimits::default(), &data, &mut rng)
                    .unwrap();
            if selection.exact {
                assert!(selection.window.contains(selection.xp_sum), "seed {}", seed);
            }
            assert!(!selection.monsters.is_empty());
            assert!(selection.monsters.len() <= 15);
        }
    }

    #[test]
    fn test_impossible_exceeds_floor() {
        let data = catalog();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let limits = SearchLimits::default();
        let selection =
            select_monsters(&[2, 2], Difficulty::Impossible, limits, &data, &mut rng).unwrap();
        assert!(selection.exact);
        assert_eq!(selection.window.ceiling, None);
        assert!(selection.xp_sum > selection.window.floor);
    }

    #[test]
    fn test_no_candidate_is_exhaustion() {
        let data = data(&[("dragon", 50_000)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let limits = SearchLimits {
            max_monsters: 4,
            attempts_per_size: 10,
            max_rounds: 8,
        };
        let err = select_monsters(&[1], Difficulty::Easy, limits, &data, &mut rng).unwrap_err();
        assert!(matches!(err, GenError::SearchExhaustion { .. }));
    }

    #[test]
    fn test_fallback_keeps_closest_sample() {
        // Only a 10 XP rat: a level 10 party's Hard window can never be reached
        let data = data(&[("rat", 10)]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let limits = SearchLimits {
            max_monsters: 3,
            attempts_per_size: 5,
            max_rounds: 4,
        };
        let selection = select_monsters(&[10], Difficulty::Hard, limits, &data, &mut rng).unwrap();
        assert!(!selection.exact);
        assert!(!selection.monsters.is_empty());
        assert!(selection.monsters.iter().all(|m| m.index == "rat"));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let data = catalog();
        let pick = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            select_monsters(&[5, 6], Difficulty::Normal, SearchLimits::default(), &data, &mut rng)
                .unwrap()
                .monsters
                .iter()
                .map(|m| m.index.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(pick(77), pick(77));
    }

    #[test]
    fn test_next_size() {
        assert_eq!(next_size(1, 15), 2);
        assert_eq!(next_size(1, 1), 1);
        assert_eq!(next_size(7, 15), 6);
    }
}
