//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for RRA using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// RRA - Radiology Report Anonymizer
#[derive(Parser, Debug)]
#[command(name = "rra")]
#[command(version, about, long_about = None)]
#[command(author = "RRA Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = crate::config::DEFAULT_CONFIG_PATH, env = "RRA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RRA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect and redact privacy-sensitive spans in reports
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Rebuild anonymized reports from an annotation file
    Export(commands::export::ExportArgs),

    /// Score annotations against a ground-truth annotation file
    Evaluate(commands::evaluate::EvaluateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
