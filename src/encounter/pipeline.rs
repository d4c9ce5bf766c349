use super::types::{Difficulty, Encounter};
use crate::character::{CharacterBuilder, PartyMember};
use crate::combat::{resolve_outcome, Variance};
use crate::core::constants::{LEVEL_BAND_COUNT, LEVEL_BAND_WIDTH};
use crate::core::error::Result;
use crate::generator::GeneratorConfig;
use crate::monsters::{select_monsters, SearchLimits};
use crate::reference::ReferenceData;
use rand::Rng;

/// Knobs of a single encounter build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub max_party_size: usize,
    pub limits: SearchLimits,
    pub variance: Variance,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl PipelineSettings {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            max_party_size: config.max_party_size,
            limits: SearchLimits {
                max_monsters: config.max_monsters,
                attempts_per_size: config.search_attempts_per_size,
                max_rounds: config.max_search_rounds,
            },
            variance: Variance::new(config.variance_percent),
        }
    }
}

/// Levels for `size` members, all drawn from one random five-level band.
pub fn party_levels(size: usize, rng: &mut impl Rng) -> Vec<u32> {
    let band = rng.gen_range(0..LEVEL_BAND_COUNT);
    let low = band * LEVEL_BAND_WIDTH + 1;
    let high = low + LEVEL_BAND_WIDTH - 1;
    (0..size).map(|_| rng.gen_range(low..=high)).collect()
}

pub fn build_party(
    levels: &[u32],
    data: &ReferenceData,
    rng: &mut impl Rng,
) -> Result<Vec<PartyMember>> {
    let builder = CharacterBuilder::new(data);
    let mut party = Vec::with_capacity(levels.len());
    for (i, &level) in levels.iter().enumerate() {
        party.push(builder.build(i + 1, level, rng)?);
    }
    Ok(party)
}

/// Builds one labeled encounter: tier, party, monsters, outcome.
///
/// # Arguments
/// * `index` - Encounter number, used for the id
/// * `settings` - Party, search and variance bounds
/// * `data` - Reference data
/// * `rng` - Random number generator dedicated to this encounter
pub fn generate_encounter(
    index: u64,
    settings: &PipelineSettings,
    data: &ReferenceData,
    rng: &mut impl Rng,
) -> Result<Encounter> {
    let difficulty = Difficulty::random(rng);
    tracing::debug!(index, %difficulty, "difficulty chosen");

    let size = rng.gen_range(1..=settings.max_party_size.max(1));
    let levels = party_levels(size, rng);
    let party = build_party(&levels, data, rng)?;
    tracing::debug!(index, size, ?levels, "party built");

    let selection = select_monsters(&levels, difficulty, settings.limits, data, rng)?;
    tracing::debug!(
        index,
        monsters = selection.monsters.len(),
        xp = selection.xp_sum,
        exact = selection.exact,
        "monster pool chosen"
    );

    let result = resolve_outcome(&party, &selection.monsters, difficulty, settings.variance, rng);
    Ok(
        Encounter::new(index, difficulty, party, selection.monsters, result)
            .with_budget(selection.xp_sum, selection.exact),
    )
}
