//! Configuration management for RRA.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! RRA uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `RRA_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation before any report is processed
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rra::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rra.toml")?;
//!
//! println!("Entities: {:?}", config.anonymization.entities);
//! println!("Flag list: {:?}", config.anonymization.flag_list);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`AnonymizationConfig`] - Entities, flag list, lexicon, conflict policy, audit
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymization]
//! entities = ["person", "date", "time", "location"]
//! flag_list = ["registratiennr", "adres"]
//! lexicon_path = "${RRA_HOME}/config/lexicon.toml"
//! parallel_reports = 4
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use crate::anonymization::config::{AnonymizationConfig, AuditConfig};
pub use loader::{load_config, load_config_or_default, load_config_str, DEFAULT_CONFIG_PATH};
pub use schema::{ApplicationConfig, LoggingConfig, RraConfig};
