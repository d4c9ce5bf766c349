//! Main generation loop: one seeded RNG and one isolated pipeline run per encounter.

use super::config::GeneratorConfig;
use super::report::RunReport;
use crate::core::error::{GenError, Result};
use crate::encounter::{generate_encounter, Encounter, PipelineSettings};
use crate::reference::ReferenceData;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};

/// Receives every finished encounter.
pub trait EncounterSink {
    fn accept(&mut self, encounter: &Encounter) -> Result<()>;
}

/// Keeps encounters in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub encounters: Vec<Encounter>,
}

impl EncounterSink for MemorySink {
    fn accept(&mut self, encounter: &Encounter) -> Result<()> {
        self.encounters.push(encounter.clone());
        Ok(())
    }
}

/// RNG for encounter `index`: `seed + index` when seeded, entropy otherwise.
pub fn encounter_rng(seed: Option<u64>, index: u64) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(index)),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Run the full generation and return a report.
pub fn run_generation(
    config: &GeneratorConfig,
    data: &ReferenceData,
    sink: &mut impl EncounterSink,
) -> RunReport {
    run_generation_until(config, data, sink, &AtomicBool::new(false))
}

/// Like [`run_generation`], checking `stop` between encounters.
pub fn run_generation_until(
    config: &GeneratorConfig,
    data: &ReferenceData,
    sink: &mut impl EncounterSink,
    stop: &AtomicBool,
) -> RunReport {
    let settings = PipelineSettings::from_config(config);
    let mut report = RunReport::new(config.number_of_encounters, config.seed);

    for idx in 0..config.number_of_encounters as u64 {
        if stop.load(Ordering::Relaxed) {
            tracing::info!(attempted = report.attempted(), "generation stopped on request");
            report.stopped_early = true;
            break;
        }

        let index = idx + 1;
        let mut rng = encounter_rng(config.seed, idx);
        let outcome =
            generate_encounter(index, &settings, data, &mut rng).and_then(|encounter| {
                sink.accept(&encounter)?;
                Ok(encounter)
            });

        match outcome {
            Ok(encounter) => {
                tracing::info!(
                    id = %encounter.id,
                    party = encounter.party.len(),
                    monsters = encounter.monsters.len(),
                    outcome = %encounter.outcome.outcome,
                    rounds = encounter.outcome.total_rounds,
                    "encounter generated"
                );
                report.record(&encounter);
            }
            Err(err @ GenError::SearchExhaustion { .. }) => {
                tracing::warn!(index, error = %err, "encounter skipped");
                report.record_skip(format!("encounter {}: {}", index, err));
            }
            Err(err) => {
                tracing::error!(index, error = %err, "encounter failed");
                report.record_failure(format!("encounter {}: {}", index, err));
            }
        }
    }

    tracing::info!(
        generated = report.generated,
        skipped = report.skipped,
        failed = report.failed,
        "generation finished"
    );
    report
}
