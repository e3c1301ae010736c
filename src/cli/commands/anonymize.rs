//! Anonymize command implementation
//!
//! Reads reports from a directory of `.txt` files or a `.jsonl` file, redacts
//! them and writes either the redacted reports or an annotation dump.

use crate::adapters::files::{read_reports, write_annotations, write_reports, OutputTarget};
use crate::anonymization::AnonymizationEngine;
use crate::config::load_config_or_default;
use crate::{log_error_with_context, log_run_complete, log_run_start};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Folder with raw reports (.txt) or a JSON Lines file (.jsonl)
    #[arg(long, default_value = "/input")]
    pub input: PathBuf,

    /// Folder for anonymized reports or a JSON Lines file (.jsonl)
    #[arg(long, default_value = "/output")]
    pub output: PathBuf,

    /// Flag reports that contain one or more of these keywords
    #[arg(long, num_args = 1..)]
    pub flag_list: Option<Vec<String>>,

    /// Entities to anonymize (overrides the configuration)
    #[arg(long = "entities-to-anonymize", num_args = 1..)]
    pub entities: Option<Vec<String>>,

    /// Write span annotations instead of redacted reports
    #[arg(long)]
    pub dump_annotations: bool,

    /// Number of reports processed concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting anonymize command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(entities) = &self.entities {
            tracing::info!(entities = ?entities, "Overriding entities from CLI");
            config.anonymization.entities = entities.clone();
        }
        if let Some(flag_list) = &self.flag_list {
            tracing::info!(keywords = flag_list.len(), "Overriding flag list from CLI");
            config.anonymization.flag_list = flag_list.clone();
        }
        if let Some(jobs) = self.jobs {
            config.anonymization.parallel_reports = jobs;
        }

        // Unknown entities and bad settings stop the run before any report
        let engine = match AnonymizationEngine::new(&config.anonymization) {
            Ok(engine) => Arc::new(engine),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Invalid anonymization configuration");
                eprintln!("Configuration error: {e:#}");
                return Ok(2);
            }
        };

        log_run_start!("anonymize", self.input.display());
        let started = Instant::now();

        println!("📂 Loading reports from {}", self.input.display());
        let input = match read_reports(&self.input).await {
            Ok(input) => input,
            Err(e) => {
                log_error_with_context!(&e, "Failed to read reports");
                eprintln!("Failed to read reports: {e}");
                return Ok(if e.is_fatal() { 2 } else { 5 });
            }
        };
        for rejected in &input.rejected {
            println!("⚠️  {rejected}");
        }

        println!("🔍 Anonymizing {} reports", input.reports.len());
        let outcome = engine.process_batch(input.reports, shutdown_signal).await;

        if self.dump_annotations {
            let path = write_annotations(&self.output, &outcome.processed).await?;
            println!("💾 Annotations written to {}", path.display());
        } else {
            let target = OutputTarget::detect(&self.output);
            let written = write_reports(&target, &outcome.processed).await?;
            println!(
                "💾 {} reports written to {} ({} flagged for review)",
                written.written,
                self.output.display(),
                written.exceptions
            );
        }

        print!("{}", outcome.summary.format_console());

        if let Some(path) = &self.summary {
            outcome.summary.write_to_file(path)?;
            println!("📝 Run summary written to {}", path.display());
        }

        log_run_complete!(outcome.summary.processed_reports, started.elapsed());

        let exit_code = if outcome.summary.cancelled > 0 {
            println!("⚠️  Run interrupted; finished reports were written.");
            130
        } else if outcome.summary.has_failures() || !input.rejected.is_empty() {
            println!("⚠️  Anonymization completed with failures");
            1
        } else {
            println!("✅ Anonymization completed successfully!");
            0
        };

        Ok(exit_code)
    }
}
