//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the RRA configuration file and the lexicon it points to.

use crate::anonymization::lexicon::Lexicon;
use crate::config::load_config_or_default;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading validates as well
        let config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let lexicon = match config.anonymization.lexicon_path {
            Some(ref path) => Lexicon::from_file(path),
            None => Lexicon::builtin(),
        };
        let lexicon = match lexicon {
            Ok(l) => {
                println!("✅ Lexicon loaded successfully");
                l
            }
            Err(e) => {
                println!("❌ Failed to load lexicon");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let anonymization = &config.anonymization;
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Entities: {}", anonymization.entities.join(", "));
        println!("  Flag List: {:?}", anonymization.flag_list);
        println!(
            "  Lexicon: {} ({} names, {} cities)",
            anonymization
                .lexicon_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string()),
            lexicon.name_count(),
            lexicon.city_count()
        );
        println!("  Conflict Policy: {:?}", anonymization.conflict_policy);
        println!("  Parallel Reports: {}", anonymization.parallel_reports);
        println!(
            "  Audit Log: {}",
            if anonymization.audit.enabled {
                anonymization.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(0)
    }
}
