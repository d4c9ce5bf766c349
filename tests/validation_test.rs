//! Integration test: dataset validation over generated batches
//!
//! Structural checks must hold for every generated encounter; tampered
//! records and lopsided outcome mixes must be reported.

use encounter_forge::encounter::{Encounter, Outcome};
use encounter_forge::generator::{run_generation, GeneratorConfig, MemorySink};
use encounter_forge::reference::ReferenceData;
use encounter_forge::validation::{validate_dataset, DatasetReport, EncounterValidator};
use std::path::Path;

fn sample_data() -> ReferenceData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/srd_sample.json");
    ReferenceData::load(&path).expect("bundled sample data should load")
}

fn dataset(n: u32, seed: u64) -> Vec<Encounter> {
    let data = sample_data();
    let mut sink = MemorySink::default();
    let report = run_generation(&GeneratorConfig::dataset(n, seed), &data, &mut sink);
    assert_eq!(report.failed, 0, "{:?}", report.errors);
    sink.encounters
}

// =============================================================================
// Generated data
// =============================================================================

#[test]
fn test_generated_encounters_are_structurally_sound() {
    let encounters = dataset(30, 11);
    let report = validate_dataset(&encounters);
    assert_eq!(report.results.len(), encounters.len());

    // Attribute caps can trip at high levels; ids, sides and outcomes never may
    for result in &report.results {
        for error in &result.errors {
            assert!(
                !error.contains("malformed id")
                    && !error.contains("id suffix")
                    && !error.contains("party size")
                    && !error.contains("monster count")
                    && !error.contains("undecided")
                    && !error.contains("skills instead of"),
                "{}: {error}",
                result.encounter_id
            );
        }
    }
}

#[test]
fn test_statistics_count_every_encounter() {
    let encounters = dataset(20, 5);
    let stats = validate_dataset(&encounters).statistics;

    assert_eq!(stats.total_encounters, 20);
    assert_eq!(stats.valid_encounters + stats.invalid_encounters, 20);
    assert_eq!(stats.outcome_distribution.values().sum::<u32>(), 20);
    assert_eq!(stats.difficulty_distribution.values().sum::<u32>(), 20);
    assert_eq!(stats.difficulty_distribution.len(), 6);
    assert_eq!(stats.party_size_distribution.values().sum::<u32>(), 20);

    let members: usize = encounters.iter().map(|e| e.party.len()).sum();
    assert_eq!(stats.class_distribution.values().sum::<u32>() as usize, members);

    let pct: f64 = stats.outcome_percentages.values().sum();
    assert!((pct - 100.0).abs() < 1e-6, "outcome percentages sum to {pct}");
}

// =============================================================================
// Reported problems
// =============================================================================

#[test]
fn test_tampered_record_is_reported() {
    let mut encounters = dataset(3, 8);
    encounters[1].id = "encounter-2".into();
    encounters[2].monsters.clear();

    let validator = EncounterValidator::default();
    assert!(validator
        .validate_encounter(&encounters[1])
        .errors
        .iter()
        .any(|e| e.contains("malformed id")));

    let report = validate_dataset(&encounters);
    assert!(!report.is_valid());
    assert!(report.errors.iter().any(|e| e.starts_with("encounter-2: malformed id")));
    assert!(report.errors.iter().any(|e| e.contains("monster count 0")));
}

#[test]
fn test_one_sided_outcomes_are_an_imbalance() {
    let mut encounters = dataset(10, 21);
    for encounter in &mut encounters {
        encounter.outcome.outcome = Outcome::Victory;
    }

    let report = validate_dataset(&encounters);
    let imbalance: Vec<&String> = report
        .errors
        .iter()
        .filter(|e| e.starts_with("outcome imbalance"))
        .collect();
    assert_eq!(imbalance.len(), 1, "{:?}", report.errors);
    assert!(imbalance[0].contains("Defeat"));
    assert!(report.to_text().contains("outcome imbalance"));
}

#[test]
fn test_report_json_round_trip() {
    let report = validate_dataset(&dataset(5, 3));
    let back: DatasetReport = serde_json::from_str(&report.to_json()).expect("report json");
    assert_eq!(back.results, report.results);
    assert_eq!(back.errors, report.errors);
    assert_eq!(
        back.statistics.outcome_distribution,
        report.statistics.outcome_distribution
    );
    assert!(report.to_text().contains("DATASET VALIDATION"));
}
