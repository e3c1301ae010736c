//! Export command implementation
//!
//! Rebuilds anonymized reports from an annotation file (for example after the
//! labels were corrected in an annotation tool) and writes one `.txt` per
//! record.

use crate::adapters::files::{export_annotations, read_annotations};
use crate::log_error_with_context;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Annotation file (.jsonl) with original texts and labels
    #[arg(long)]
    pub input_annotations: PathBuf,

    /// Folder for the anonymized reports
    #[arg(long)]
    pub output_dir: PathBuf,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input_annotations.display(), "Starting export command");

        let batch = match read_annotations(&self.input_annotations).await {
            Ok(batch) => batch,
            Err(e) => {
                log_error_with_context!(&e, "Failed to read annotations");
                eprintln!("Failed to read annotations: {e}");
                return Ok(if e.is_fatal() { 2 } else { 5 });
            }
        };

        for rejected in &batch.rejected {
            println!("⚠️  {rejected}");
        }
        let rejected = batch.rejected.len();
        let records = batch.records;

        println!("🚀 Exporting {} reports", records.len());
        let summary = export_annotations(&records, &self.output_dir).await?;

        println!();
        println!("📊 Export Summary:");
        println!("  Records Read: {}", records.len());
        println!("  Lines Rejected: {rejected}");
        println!("  Reports Written: {}", summary.written.len());
        println!("  Reports Failed: {}", summary.failed.len());
        for (name, error) in &summary.failed {
            println!("    - {name}: {error}");
        }
        println!();

        if rejected > 0 || !summary.failed.is_empty() {
            println!("⚠️  Export completed with failures");
            Ok(1)
        } else {
            println!("✅ Export completed successfully!");
            Ok(0)
        }
    }
}
