//! Evaluate command implementation
//!
//! Scores candidate annotations against ground truth and writes the text and
//! JSON evaluation reports.

use crate::adapters::files::read_annotations;
use crate::anonymization::evaluation::evaluate_batch;
use crate::log_error_with_context;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the evaluate command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Candidate annotation file (.jsonl)
    #[arg(long)]
    pub input_annotations: PathBuf,

    /// Ground-truth annotation file (.jsonl)
    #[arg(long)]
    pub ground_truth: PathBuf,

    /// Folder for evaluation_report.txt and evaluation_report.json
    #[arg(long)]
    pub output_dir: PathBuf,
}

impl EvaluateArgs {
    /// Execute the evaluate command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!("Starting evaluate command");

        let mut skipped = Vec::new();
        let mut sides = Vec::with_capacity(2);
        for path in [&self.input_annotations, &self.ground_truth] {
            match read_annotations(path).await {
                Ok(batch) => {
                    for rejected in &batch.rejected {
                        skipped.push(format!("{}: {rejected}", path.display()));
                    }
                    sides.push(batch.records);
                }
                Err(e) => {
                    log_error_with_context!(&e, "Failed to read annotations");
                    eprintln!("Failed to read {}: {e}", path.display());
                    return Ok(if e.is_fatal() { 2 } else { 5 });
                }
            }
        }
        let ground_truth = sides.pop().unwrap_or_default();
        let candidates = sides.pop().unwrap_or_default();

        let mut summary = evaluate_batch(&candidates, &ground_truth);
        summary.skipped.extend(skipped);

        print!("{}", summary.format_console());

        let (txt, json) = summary.write_to_dir(&self.output_dir)?;
        println!("📝 Reports written to {} and {}", txt.display(), json.display());

        if summary.has_errors() {
            println!("⚠️  Errors found; see the evaluation report for details");
            Ok(1)
        } else {
            println!("✅ No errors found");
            Ok(0)
        }
    }
}
