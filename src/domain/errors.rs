//! Domain error types
//!
//! This module defines the error hierarchy for RRA. Configuration problems are
//! fatal and surface before any report is touched; everything that can go wrong
//! with a single report or annotation line is isolated to that item.

use thiserror::Error;

/// Main RRA error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum RraError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An entity category name that the anonymizer does not know
    #[error("Unknown entity category '{name}'. Choose from: {supported}")]
    UnknownCategory {
        /// The requested name
        name: String,
        /// Comma-separated list of supported names
        supported: String,
    },

    /// An annotation record failed required-field or bounds validation
    #[error("Malformed annotation on line {line}: {reason}")]
    MalformedAnnotation {
        /// 1-based line number in the JSON Lines input
        line: usize,
        /// Why the record was rejected
        reason: String,
    },

    /// A span does not fit the text it is applied to
    #[error("Invalid span {start}..{end} for text of {len} characters")]
    InvalidSpan {
        /// Span start (characters)
        start: usize,
        /// Span end (characters)
        end: usize,
        /// Text length (characters)
        len: usize,
    },

    /// Lexicon loading errors
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl RraError {
    /// Returns true for errors that must stop the run before processing starts
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::UnknownCategory { .. } | Self::Lexicon(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RraError {
    fn from(err: std::io::Error) -> Self {
        RraError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RraError {
    fn from(err: serde_json::Error) -> Self {
        RraError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RraError {
    fn from(err: toml::de::Error) -> Self {
        RraError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rra_error_display() {
        let err = RraError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_unknown_category_display() {
        let err = RraError::UnknownCategory {
            name: "email".to_string(),
            supported: "person, date".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown entity category 'email'. Choose from: person, date"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_malformed_annotation_is_not_fatal() {
        let err = RraError::MalformedAnnotation {
            line: 3,
            reason: "missing field `text`".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: RraError = io_err.into();
        assert!(matches!(err, RraError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: RraError = json_err.into();
        assert!(matches!(err, RraError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: RraError = toml_err.into();
        assert!(matches!(err, RraError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
