//! Summary of a generation run.

use crate::encounter::{Difficulty, Encounter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub requested: u32,
    pub generated: u32,
    /// Encounters dropped because no monster group fit the budget
    pub skipped: u32,
    /// Encounters aborted by an error
    pub failed: u32,
    /// The stop flag ended the run before every encounter was attempted
    pub stopped_early: bool,
    pub seed: Option<u64>,
    pub outcome_distribution: BTreeMap<String, u32>,
    pub difficulty_distribution: BTreeMap<String, u32>,
    pub mean_rounds: f64,
    /// Encounters whose monster search settled for the closest sample
    pub inexact_budgets: u32,
    pub encounter_ids: Vec<String>,
    pub errors: Vec<String>,
    #[serde(skip)]
    total_rounds: u64,
}

impl RunReport {
    pub fn new(requested: u32, seed: Option<u64>) -> Self {
        Self {
            requested,
            seed,
            ..Default::default()
        }
    }

    pub fn record(&mut self, encounter: &Encounter) {
        self.generated += 1;
        *self
            .outcome_distribution
            .entry(encounter.outcome.outcome.to_string())
            .or_insert(0) += 1;
        *self
            .difficulty_distribution
            .entry(encounter.difficulty.to_string())
            .or_insert(0) += 1;
        self.total_rounds += encounter.outcome.total_rounds as u64;
        self.mean_rounds = self.total_rounds as f64 / self.generated as f64;
        if !encounter.exact_budget {
            self.inexact_budgets += 1;
        }
        self.encounter_ids.push(encounter.id.clone());
    }

    pub fn record_skip(&mut self, message: String) {
        self.skipped += 1;
        self.errors.push(message);
    }

    pub fn record_failure(&mut self, message: String) {
        self.failed += 1;
        self.errors.push(message);
    }

    pub fn attempted(&self) -> u32 {
        self.generated + self.skipped + self.failed
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    GENERATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Encounters: {} requested, {} generated, {} skipped, {} failed\n",
            self.requested, self.generated, self.skipped, self.failed
        ));
        match self.seed {
            Some(seed) => report.push_str(&format!("Seed: {}\n", seed)),
            None => report.push_str("Seed: entropy\n"),
        }
        if self.stopped_early {
            report.push_str("Stopped early on request\n");
        }
        report.push('\n');

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        for (outcome, count) in &self.outcome_distribution {
            let pct = *count as f64 * 100.0 / self.generated.max(1) as f64;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  {:<10} {:>5} {:>5.1}% {}\n", outcome, count, pct, bar));
        }
        report.push_str(&format!("  Mean Rounds: {:.1}\n\n", self.mean_rounds));

        report.push_str("── DIFFICULTY ───────────────────────────────────────────────────\n");
        for tier in Difficulty::all() {
            let count = self
                .difficulty_distribution
                .get(tier.name())
                .copied()
                .unwrap_or(0);
            report.push_str(&format!("  {:<10} {:>5}\n", tier.name(), count));
        }
        if self.inexact_budgets > 0 {
            report.push_str(&format!(
                "  ⚠️  {} monster groups missed their XP window\n",
                self.inexact_budgets
            ));
        }

        if !self.errors.is_empty() {
            report.push('\n');
            report.push_str("── PROBLEMS ─────────────────────────────────────────────────────\n");
            for error in &self.errors {
                report.push_str(&format!("  {}\n", error));
            }
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
