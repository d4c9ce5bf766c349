//! Batch output: per-encounter JSON, the run manifest, validation files and archives.

use crate::build_info::{BUILD_COMMIT, BUILD_TIMESTAMP};
use crate::core::error::{GenError, Result};
use crate::encounter::Encounter;
use crate::generator::{EncounterSink, RunReport};
use crate::validation::DatasetReport;
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tar::{Archive, Builder};
use uuid::Uuid;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const VALIDATION_DIR: &str = "validation";
pub const VALIDATION_ERRORS_FILE: &str = "validation_errors.json";
pub const STATISTICS_FILE: &str = "statistics.json";

/// Provenance and counts of one run, written next to the encounters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub version: String,
    pub commit: String,
    pub built_at: String,
    pub started_at: String,
    pub finished_at: String,
    pub seed: Option<u64>,
    pub requested: u32,
    pub generated: u32,
    pub skipped: u32,
    pub failed: u32,
    /// SHA-256 of the reference document the run used
    pub reference_checksum: String,
    pub encounter_ids: Vec<String>,
}

impl RunManifest {
    pub fn from_report(
        report: &RunReport,
        reference_checksum: &str,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: BUILD_COMMIT.to_string(),
            built_at: BUILD_TIMESTAMP.to_string(),
            started_at: started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            seed: report.seed,
            requested: report.requested,
            generated: report.generated,
            skipped: report.skipped,
            failed: report.failed,
            reference_checksum: reference_checksum.to_string(),
            encounter_ids: report.encounter_ids.clone(),
        }
    }
}

/// `Batch_<YYYYMMDD_HHMMSS>` for a run start time.
pub fn batch_dir_name(started_at: DateTime<Utc>) -> String {
    started_at.format("Batch_%Y%m%d_%H%M%S").to_string()
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Writes one batch directory.
#[derive(Debug, Clone)]
pub struct BatchExporter {
    dir: PathBuf,
    written: usize,
}

impl BatchExporter {
    /// Creates `<output_dir>/Batch_<timestamp>` and any missing parents.
    pub fn create(output_dir: &Path, started_at: DateTime<Utc>) -> Result<Self> {
        let dir = output_dir.join(batch_dir_name(started_at));
        fs::create_dir_all(&dir)?;
        tracing::info!(dir = %dir.display(), "batch directory created");
        Ok(Self { dir, written: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write_encounter(&mut self, encounter: &Encounter) -> Result<PathBuf> {
        let path = self.dir.join(encounter.file_name());
        write_pretty(&path, encounter)?;
        self.written += 1;
        Ok(path)
    }

    pub fn write_manifest(&self, manifest: &RunManifest) -> Result<PathBuf> {
        let path = self.dir.join(MANIFEST_FILE);
        write_pretty(&path, manifest)?;
        Ok(path)
    }

    /// Writes `validation/validation_errors.json` and `validation/statistics.json`.
    pub fn write_validation(&self, report: &DatasetReport) -> Result<PathBuf> {
        let dir = self.dir.join(VALIDATION_DIR);
        fs::create_dir_all(&dir)?;

        let invalid: Vec<_> = report.results.iter().filter(|r| !r.is_valid()).collect();
        let errors = serde_json::json!({
            "errors": report.errors,
            "invalid_encounters": invalid,
        });
        write_pretty(&dir.join(VALIDATION_ERRORS_FILE), &errors)?;
        write_pretty(&dir.join(STATISTICS_FILE), &report.statistics)?;
        Ok(dir)
    }
}

impl EncounterSink for BatchExporter {
    fn accept(&mut self, encounter: &Encounter) -> Result<()> {
        self.write_encounter(encounter).map(|_| ())
    }
}

fn is_encounter_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
        && path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.starts_with('E'))
}

/// Reads every encounter file of a batch directory, ordered by id.
pub fn load_encounters(dir: &Path) -> Result<Vec<Encounter>> {
    if !dir.is_dir() {
        return Err(GenError::Configuration(format!(
            "batch directory not found: {}",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_encounter_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut encounters = Vec::with_capacity(paths.len());
    for path in paths {
        let json = fs::read_to_string(&path)?;
        encounters.push(serde_json::from_str(&json)?);
    }
    Ok(encounters)
}

/// Packs a batch directory into `<batch>.tar.gz` beside it.
pub fn archive_batch(batch_dir: &Path) -> Result<PathBuf> {
    let name = batch_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            GenError::Configuration(format!("not a batch directory: {}", batch_dir.display()))
        })?;
    let archive_path = batch_dir.with_file_name(format!("{}.tar.gz", name));

    let file = File::create(&archive_path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);
    builder.append_dir_all(name, batch_dir)?;
    builder.into_inner()?.finish()?;

    tracing::info!(archive = %archive_path.display(), "batch archived");
    Ok(archive_path)
}

/// Unpacks a `.tar.gz` batch into `dest_dir` and returns the batch directory inside it.
pub fn extract_batch(archive_path: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);
    archive.unpack(dest_dir)?;

    let stem = archive_path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(".tar.gz"))
        .unwrap_or_default();
    let batch_dir = dest_dir.join(stem);
    if stem.is_empty() || !batch_dir.is_dir() {
        return Ok(dest_dir.to_path_buf());
    }
    Ok(batch_dir)
}
