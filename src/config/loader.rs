//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RraConfig;
use crate::domain::errors::RraError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "rra.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RraConfig
/// 4. Applies environment variable overrides (RRA_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`RraError::Configuration`] if the file cannot be read or parsed,
/// a referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use rra::config::loader::load_config;
///
/// let config = load_config("rra.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RraConfig> {
    let path = path.as_ref();

    // Check if file exists
    if !path.exists() {
        return Err(RraError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    // Read file contents
    let contents = fs::read_to_string(path).map_err(|e| {
        RraError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text
pub fn load_config_str(contents: &str) -> Result<RraConfig> {
    // Perform environment variable substitution
    let contents = substitute_env_vars(contents)?;

    // Parse TOML
    let config: RraConfig = toml::from_str(&contents)
        .map_err(|e| RraError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(config)
}

/// Loads the configuration file, falling back to defaults when the default
/// path does not exist
///
/// An explicitly named file that is missing is still an error.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<RraConfig> {
    let path = path.as_ref();
    if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
        tracing::debug!("No configuration file found, using defaults");
        return finish(RraConfig::default());
    }
    load_config(path)
}

fn finish(mut config: RraConfig) -> Result<RraConfig> {
    // Apply environment variable overrides
    apply_env_overrides(&mut config)?;

    // Validate configuration
    config.validate().map_err(|e| {
        RraError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RraError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RraError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using RRA_* prefix
///
/// Environment variables follow the pattern: RRA_<SECTION>_<KEY>
/// For example: RRA_APPLICATION_LOG_LEVEL, RRA_ANONYMIZATION_ENTITIES
fn apply_env_overrides(config: &mut RraConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("RRA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Anonymization overrides
    config
        .anonymization
        .apply_env_overrides()
        .map_err(|e| RraError::Configuration(format!("{e:#}")))?;

    // Logging overrides
    if let Ok(val) = std::env::var("RRA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().map_err(|_| {
            RraError::Configuration(format!("Invalid RRA_LOGGING_LOCAL_ENABLED value: {val}"))
        })?;
    }
    if let Ok(val) = std::env::var("RRA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("RRA_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
