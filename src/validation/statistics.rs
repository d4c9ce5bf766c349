//! Distribution statistics over a generated dataset.

use super::validator::{EncounterValidator, ValidationResult};
use crate::encounter::{Difficulty, Encounter, Outcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum share of the dataset each outcome must reach.
pub const MIN_OUTCOME_SHARE: f64 = 0.10;

/// Challenge rating as printed in stat blocks: `1/8`, `1/4`, `1/2`, `3`.
pub fn format_challenge_rating(cr: f64) -> String {
    if cr > 0.0 && cr < 1.0 {
        format!("1/{}", (1.0 / cr).round() as u32)
    } else {
        format!("{}", cr as u32)
    }
}

fn bump<K: Ord>(map: &mut BTreeMap<K, u32>, key: K) {
    *map.entry(key).or_insert(0) += 1;
}

fn percentages(map: &BTreeMap<String, u32>, total: usize) -> BTreeMap<String, f64> {
    map.iter()
        .map(|(k, &v)| (k.clone(), v as f64 * 100.0 / total.max(1) as f64))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub total_encounters: usize,
    pub valid_encounters: usize,
    pub invalid_encounters: usize,
    pub outcome_distribution: BTreeMap<String, u32>,
    pub difficulty_distribution: BTreeMap<String, u32>,
    pub party_level_distribution: BTreeMap<u32, u32>,
    pub class_distribution: BTreeMap<String, u32>,
    pub race_distribution: BTreeMap<String, u32>,
    pub party_size_distribution: BTreeMap<usize, u32>,
    pub monster_cr_distribution: BTreeMap<String, u32>,
    pub monster_count_distribution: BTreeMap<usize, u32>,
    pub combat_duration_distribution: BTreeMap<u32, u32>,
    pub outcome_percentages: BTreeMap<String, f64>,
    pub difficulty_percentages: BTreeMap<String, f64>,
    pub average_rounds: f64,
}

impl DatasetStatistics {
    pub fn from_encounters(encounters: &[Encounter], results: &[ValidationResult]) -> Self {
        let mut stats = Self {
            total_encounters: encounters.len(),
            valid_encounters: results.iter().filter(|r| r.is_valid()).count(),
            ..Default::default()
        };
        stats.invalid_encounters = stats.total_encounters - stats.valid_encounters;

        // Decided outcomes and every tier are always listed, even at zero
        for outcome in [Outcome::Victory, Outcome::Defeat] {
            stats.outcome_distribution.insert(outcome.to_string(), 0);
        }
        for tier in Difficulty::all() {
            stats.difficulty_distribution.insert(tier.to_string(), 0);
        }

        let mut rounds = 0u64;
        for encounter in encounters {
            bump(&mut stats.outcome_distribution, encounter.outcome.outcome.to_string());
            bump(&mut stats.difficulty_distribution, encounter.difficulty.to_string());
            bump(&mut stats.party_size_distribution, encounter.party.len());
            bump(&mut stats.monster_count_distribution, encounter.monsters.len());
            bump(&mut stats.combat_duration_distribution, encounter.outcome.total_rounds);
            rounds += encounter.outcome.total_rounds as u64;

            for member in &encounter.party {
                bump(&mut stats.party_level_distribution, member.level);
                bump(&mut stats.class_distribution, member.class.clone());
                bump(&mut stats.race_distribution, member.race.clone());
            }
            for monster in &encounter.monsters {
                bump(
                    &mut stats.monster_cr_distribution,
                    format_challenge_rating(monster.challenge_rating),
                );
            }
        }

        stats.outcome_percentages = percentages(&stats.outcome_distribution, encounters.len());
        stats.difficulty_percentages =
            percentages(&stats.difficulty_distribution, encounters.len());
        stats.average_rounds = rounds as f64 / encounters.len().max(1) as f64;
        stats
    }

    /// Outcome buckets under the minimum share.
    pub fn imbalance_errors(&self) -> Vec<String> {
        if self.total_encounters == 0 {
            return Vec::new();
        }
        let minimum = self.total_encounters as f64 * MIN_OUTCOME_SHARE;
        self.outcome_distribution
            .iter()
            .filter(|(name, _)| name.as_str() != Outcome::Undecided.name())
            .filter(|(_, count)| (**count as f64) < minimum)
            .map(|(name, &count)| {
                format!(
                    "outcome imbalance: {} is {:.1}% of {} encounters (minimum {:.0}%)",
                    name,
                    count as f64 * 100.0 / self.total_encounters as f64,
                    self.total_encounters,
                    MIN_OUTCOME_SHARE * 100.0
                )
            })
            .collect()
    }
}

/// Per-encounter validity, dataset-level errors and statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub results: Vec<ValidationResult>,
    pub errors: Vec<String>,
    pub statistics: DatasetStatistics,
}

impl DatasetReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_text(&self) -> String {
        let stats = &self.statistics;
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    DATASET VALIDATION\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Encounters: {} total, {} valid, {} invalid\n\n",
            stats.total_encounters, stats.valid_encounters, stats.invalid_encounters
        ));

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        for (outcome, count) in &stats.outcome_distribution {
            let pct = stats.outcome_percentages.get(outcome).copied().unwrap_or(0.0);
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  {:<10} {:>5} {:>5.1}% {}\n", outcome, count, pct, bar));
        }
        report.push_str(&format!("  Avg Rounds: {:.1}\n\n", stats.average_rounds));

        report.push_str("── DIFFICULTY ───────────────────────────────────────────────────\n");
        for tier in Difficulty::all() {
            let name = tier.to_string();
            let count = stats.difficulty_distribution.get(&name).copied().unwrap_or(0);
            let pct = stats.difficulty_percentages.get(&name).copied().unwrap_or(0.0);
            report.push_str(&format!("  {:<10} {:>5} {:>5.1}%\n", name, count, pct));
        }
        report.push('\n');

        report.push_str("── PARTY ────────────────────────────────────────────────────────\n");
        let sizes: Vec<String> = stats
            .party_size_distribution
            .iter()
            .map(|(size, count)| format!("{}:{}", size, count))
            .collect();
        report.push_str(&format!("  Sizes:   {}\n", sizes.join("  ")));
        let classes: Vec<String> = stats
            .class_distribution
            .iter()
            .map(|(class, count)| format!("{} {}", class, count))
            .collect();
        report.push_str(&format!("  Classes: {}\n", classes.join(", ")));
        let races: Vec<String> = stats
            .race_distribution
            .iter()
            .map(|(race, count)| format!("{} {}", race, count))
            .collect();
        report.push_str(&format!("  Races:   {}\n\n", races.join(", ")));

        report.push_str("── MONSTERS ─────────────────────────────────────────────────────\n");
        let counts: Vec<String> = stats
            .monster_count_distribution
            .iter()
            .map(|(n, count)| format!("{}:{}", n, count))
            .collect();
        report.push_str(&format!("  Group sizes: {}\n", counts.join("  ")));
        let crs: Vec<String> = stats
            .monster_cr_distribution
            .iter()
            .map(|(cr, count)| format!("CR {} x{}", cr, count))
            .collect();
        report.push_str(&format!("  Ratings:     {}\n\n", crs.join(", ")));

        if !self.errors.is_empty() {
            report.push_str("── ERRORS ───────────────────────────────────────────────────────\n");
            for error in &self.errors {
                report.push_str(&format!("  ⚠️  {}\n", error));
            }
            report.push('\n');
        }

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Validates every encounter and computes dataset statistics.
pub fn validate_dataset(encounters: &[Encounter]) -> DatasetReport {
    let validator = EncounterValidator::default();
    let results: Vec<ValidationResult> = encounters
        .iter()
        .map(|e| validator.validate_encounter(e))
        .collect();

    let mut errors: Vec<String> = results
        .iter()
        .flat_map(|r| r.errors.iter().map(move |e| format!("{}: {}", r.encounter_id, e)))
        .collect();

    let statistics = DatasetStatistics::from_encounters(encounters, &results);
    errors.extend(statistics.imbalance_errors());

    if !errors.is_empty() {
        tracing::warn!(errors = errors.len(), "dataset validation found problems");
    }

    DatasetReport {
        results,
        errors,
        statistics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::test_support::{fighter, goblin};
    use crate::encounter::EncounterResult;

    fn encounter(index: u64, outcome: Outcome, rounds: u32) -> Encounter {
        Encounter::new(
            index,
            Difficulty::Normal,
            vec![fighter()],
            vec![goblin(15), goblin(13)],
            EncounterResult {
                outcome,
                total_rounds: rounds,
                details: String::new(),
            },
        )
    }

    #[test]
    fn test_format_challenge_rating() {
        assert_eq!(format_challenge_rating(0.125), "1/8");
        assert_eq!(format_challenge_rating(0.25), "1/4");
        assert_eq!(format_challenge_rating(0.5), "1/2");
        assert_eq!(format_challenge_rating(0.0), "0");
        assert_eq!(format_challenge_rating(5.0), "5");
    }

    #[test]
    fn test_distributions() {
        let encounters = vec![
            encounter(1, Outcome::Victory, 2),
            encounter(2, Outcome::Defeat, 4),
            encounter(3, Outcome::Victory, 2),
        ];
        let report = validate_dataset(&encounters);
        let stats = &report.statistics;
        assert_eq!(stats.total_encounters, 3);
        assert_eq!(stats.outcome_distribution["Victory"], 2);
        assert_eq!(stats.outcome_distribution["Defeat"], 1);
        assert_eq!(stats.difficulty_distribution["Normal"], 3);
        assert_eq!(stats.difficulty_distribution["Deadly"], 0);
        assert_eq!(stats.monster_count_distribution[&2], 3);
        assert_eq!(stats.monster_cr_distribution["1/4"], 6);
        assert_eq!(stats.combat_duration_distribution[&2], 2);
        assert!((stats.average_rounds - 8.0 / 3.0).abs() < 1e-9);
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn test_imbalance_is_reported() {
        let mut encounters: Vec<Encounter> =
            (1..=12).map(|i| encounter(i, Outcome::Victory, 1)).collect();
        encounters.push(encounter(13, Outcome::Defeat, 3));
        let report = validate_dataset(&encounters);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Defeat"));
    }

    #[test]
    fn test_invalid_encounters_are_counted() {
        let mut bad = encounter(1, Outcome::Victory, 1);
        bad.id = "bogus".into();
        let good = encounter(2, Outcome::Defeat, 1);
        let report = validate_dataset(&[bad, good]);
        assert_eq!(report.statistics.invalid_encounters, 1);
        assert!(report.errors.iter().any(|e| e.starts_with("bogus: malformed id")));
    }

    #[test]
    fn test_text_report_has_sections() {
        let report = validate_dataset(&[encounter(1, Outcome::Victory, 1)]);
        let text = report.to_text();
        assert!(text.contains("DATASET VALIDATION"));
        assert!(text.contains("── OUTCOMES"));
        assert!(text.contains("⚠️"));
    }
}
