//! Logging and observability
//!
//! Structured logging with configurable levels, console output and optional
//! rolling JSON log files. Log records carry ids, counts, categories and
//! offsets only; report text and detected values are never logged.
//!
//! # Example
//!
//! ```no_run
//! use rra::logging::init_logging;
//! use rra::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a run over an input
///
/// # Example
///
/// ```no_run
/// use rra::log_run_start;
///
/// log_run_start!("anonymize", "/input");
/// ```
#[macro_export]
macro_rules! log_run_start {
    ($command:expr, $input:expr) => {
        tracing::info!(
            command = $command,
            input = %$input,
            "Starting run"
        );
    };
}

/// Log the completion of a run
///
/// # Example
///
/// ```no_run
/// use rra::log_run_complete;
/// use std::time::Duration;
///
/// log_run_complete!(42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_run_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Run completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use rra::log_error_with_context;
/// use rra::domain::RraError;
///
/// let error = RraError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
