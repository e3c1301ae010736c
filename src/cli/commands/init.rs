//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file and, optionally, an editable copy of the lexicon.

use crate::anonymization::lexicon::BUILTIN_LEXICON;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Also write the built-in lexicon to this path for editing
    #[arg(long)]
    pub lexicon: Option<String>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing RRA configuration");
        println!();

        let targets = std::iter::once(self.output.as_str()).chain(self.lexicon.as_deref());
        for target in targets {
            if Path::new(target).exists() && !self.force {
                println!("❌ File already exists: {target}");
                println!("   Use --force to overwrite");
                return Ok(2); // Configuration error exit code
            }
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };
        let config_content = match self.lexicon {
            Some(ref path) => config_content.replace(
                "# lexicon_path = \"config/lexicon.toml\"",
                &format!("lexicon_path = \"{path}\""),
            ),
            None => config_content,
        };

        if let Err(e) = fs::write(&self.output, config_content) {
            println!("❌ Failed to write configuration file");
            println!("   Error: {e}");
            return Ok(5); // Fatal error exit code
        }
        println!("✅ Configuration file created: {}", self.output);

        if let Some(ref path) = self.lexicon {
            if let Err(e) = fs::write(path, BUILTIN_LEXICON) {
                println!("❌ Failed to write lexicon");
                println!("   Error: {e}");
                return Ok(5);
            }
            println!("✅ Lexicon created: {path}");
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your settings", self.output);
        println!("  2. Validate configuration: rra validate-config");
        println!("  3. Run: rra anonymize --input <dir|file.jsonl> --output <dir|file.jsonl>");
        println!();
        Ok(0)
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# RRA Configuration File
# Radiology Report Anonymizer

[application]
log_level = "info"

[anonymization]
entities = ["person", "date", "time", "internal_phone_number",
            "patient_id", "z_number", "report_id", "location"]
flag_list = ["registratiennr", "adres"]
# lexicon_path = "config/lexicon.toml"
conflict_policy = "longest_first"
parallel_reports = 4

[anonymization.audit]
enabled = false
log_path = "./audit/anonymization.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# RRA Configuration File
# Radiology Report Anonymizer
#
# Every setting is optional; the values below are the defaults.
# Use ${VAR} to pull values from the environment, and RRA_<SECTION>_<KEY>
# environment variables to override single settings.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Entities to detect and redact:
#   person                 -> <PERSOON>
#   date                   -> <DATUM>
#   time                   -> <TIJD>
#   internal_phone_number  -> <TELEFOONNUMMER>
#   patient_id             -> <PATIENTNUMMER>
#   z_number               -> <ZNUMMER>
#   report_id              -> <RAPPORT_ID>
#   location               -> <PLAATS>
entities = ["person", "date", "time", "internal_phone_number",
            "patient_id", "z_number", "report_id", "location"]

# Reports containing one of these keywords (case-sensitive) are written to
# the exceptions/ folder for manual review
flag_list = ["registratiennr", "adres"]

# Lexicon with names, cities and cue words (built-in lexicon when unset)
# lexicon_path = "config/lexicon.toml"

# Overlapping detections: the earliest start wins, then the longest span.
# Remaining ties:
#   longest_first      - keep detector order
#   category_priority  - prefer categories listed in category_priority
conflict_policy = "longest_first"
# category_priority = ["person", "date", "time", "patient_id"]

# Number of reports processed concurrently
parallel_reports = 4

# Audit log with one entry per report; replaced text is stored as SHA-256 only
[anonymization.audit]
enabled = false
log_path = "./audit/anonymization.log"
json_format = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON log files
local_enabled = false

# Log directory
local_path = "./logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_str;
    use tempfile::TempDir;

    #[test]
    fn test_generated_configs_are_valid() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = load_config_str(&content).unwrap();
            assert_eq!(config.anonymization.entities.len(), 8);
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("rra.toml");
        std::fs::write(&output, "").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            lexicon: None,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_init_writes_lexicon() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("rra.toml");
        let lexicon = dir.path().join("lexicon.toml");

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: true,
            lexicon: Some(lexicon.to_string_lossy().to_string()),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 0);

        let config = std::fs::read_to_string(&output).unwrap();
        assert!(config.contains(&format!("lexicon_path = \"{}\"", lexicon.display())));
        assert!(std::fs::read_to_string(&lexicon).unwrap().contains("[names]"));
    }
}
