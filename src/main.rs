//! Encounter Forge CLI.
//!
//! Usage:
//!   encounter-forge generate [OPTIONS]
//!   encounter-forge validate <BATCH>
//!
//! Examples:
//!   encounter-forge generate --count 100 --seed 42
//!   encounter-forge generate --config config/generator.toml --quiet
//!   encounter-forge validate output/Batch_20240309_140507

use chrono::Utc;
use clap::{Parser, Subcommand};
use encounter_forge::build_info::version_line;
use encounter_forge::core::Result;
use encounter_forge::generator::{run_generation, GeneratorConfig};
use encounter_forge::reference::ReferenceData;
use encounter_forge::utils::{
    archive_batch, extract_batch, load_encounters, BatchExporter, RunManifest,
};
use encounter_forge::validation::validate_dataset;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "encounter-forge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate labeled combat encounters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a batch of encounters
    Generate {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of encounters to generate
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// RNG seed (entropy when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Reference data JSON
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Directory receiving the batch
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Log level when RUST_LOG is unset
        #[arg(long)]
        log_level: Option<String>,

        /// Only print the final summary line
        #[arg(short, long)]
        quiet: bool,
    },

    /// Validate an exported batch directory or .tar.gz archive
    Validate {
        /// Batch directory or archive
        batch: PathBuf,

        /// Log level when RUST_LOG is unset
        #[arg(long, default_value = "info")]
        log_level: String,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            config,
            count,
            seed,
            data,
            output,
            log_level,
            quiet,
        } => resolve_config(config.as_deref(), count, seed, data, output, log_level)
            .and_then(|config| {
                let level = if quiet { "warn" } else { config.log_level.as_str() };
                init_tracing(level);
                generate(&config, quiet)
            }),
        Commands::Validate { batch, log_level } => {
            init_tracing(&log_level);
            validate(&batch)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            tracing::error!(error = %e, "aborted");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Config file (or defaults), then CLI overrides.
fn resolve_config(
    path: Option<&Path>,
    count: Option<u32>,
    seed: Option<u64>,
    data: Option<PathBuf>,
    output: Option<PathBuf>,
    log_level: Option<String>,
) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(count) = count {
        config.number_of_encounters = count;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(data) = data {
        config.reference_data = data;
    }
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(level) = log_level {
        config.log_level = level;
    }
    config.validate()?;
    Ok(config)
}

/// Validation findings are reported, never fatal.
fn generate(config: &GeneratorConfig, quiet: bool) -> Result<bool> {
    tracing::info!(version = %version_line(), "starting");

    let data_path = GeneratorConfig::expand_home(&config.reference_data);
    let data = ReferenceData::load(&data_path)?;
    tracing::info!(
        path = %data_path.display(),
        checksum = %data.checksum(),
        "reference data loaded"
    );

    let started_at = Utc::now();
    let output_dir = GeneratorConfig::expand_home(&config.output_dir);
    let mut exporter = BatchExporter::create(&output_dir, started_at)?;

    let report = run_generation(config, &data, &mut exporter);

    let manifest = RunManifest::from_report(&report, data.checksum(), started_at, Utc::now());
    exporter.write_manifest(&manifest)?;

    let encounters = load_encounters(exporter.dir())?;
    let dataset = validate_dataset(&encounters);
    exporter.write_validation(&dataset)?;

    if config.archive {
        archive_batch(exporter.dir())?;
    }

    if quiet {
        println!(
            "{}: {} generated, {} skipped, {} failed, {} validation errors",
            exporter.dir().display(),
            report.generated,
            report.skipped,
            report.failed,
            dataset.errors.len()
        );
    } else {
        println!("{}", report.to_text());
        println!("{}", dataset.to_text());
        println!("Batch written to: {}", exporter.dir().display());
    }
    if !dataset.is_valid() {
        tracing::warn!(errors = dataset.errors.len(), "dataset has validation findings");
    }
    Ok(true)
}

/// Returns whether the batch passed validation.
fn validate(batch: &Path) -> Result<bool> {
    let is_archive = batch
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".tar.gz"));

    let dir = if is_archive {
        let dest = std::env::temp_dir().join(format!("encounter-forge-{}", uuid::Uuid::new_v4()));
        extract_batch(batch, &dest)?
    } else {
        batch.to_path_buf()
    };

    let encounters = load_encounters(&dir)?;
    tracing::info!(count = encounters.len(), dir = %dir.display(), "batch loaded");
    let report = validate_dataset(&encounters);
    println!("{}", report.to_text());
    Ok(report.is_valid())
}
