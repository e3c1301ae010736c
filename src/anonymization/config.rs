//! Anonymization configuration

use crate::anonymization::models::{EnabledCategories, EntityCategory};
use crate::anonymization::resolver::ConflictPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the resolver breaks ties between equal candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicyKind {
    /// Earliest start, then longest span, then detector order
    #[default]
    LongestFirst,
    /// Earliest start, then longest span, then `category_priority`
    CategoryPriority,
}

/// Anonymization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Entity categories to detect and redact
    #[serde(default = "default_entities")]
    pub entities: Vec<String>,

    /// Keywords that route a report to manual review
    #[serde(default = "default_flag_list")]
    pub flag_list: Vec<String>,

    /// Path to lexicon TOML file (built-in lexicon when absent)
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    #[serde(default)]
    pub conflict_policy: ConflictPolicyKind,

    /// Category order used by the `category_priority` policy
    #[serde(default)]
    pub category_priority: Vec<String>,

    /// Number of reports processed concurrently
    #[serde(default = "default_parallel_reports")]
    pub parallel_reports: usize,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_entities() -> Vec<String> {
    EntityCategory::ALL
        .iter()
        .map(|c| c.config_name().to_string())
        .collect()
}

fn default_flag_list() -> Vec<String> {
    vec!["registratiennr".to_string(), "adres".to_string()]
}

fn default_parallel_reports() -> usize {
    4
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            entities: default_entities(),
            flag_list: default_flag_list(),
            lexicon_path: None,
            conflict_policy: ConflictPolicyKind::default(),
            category_priority: Vec::new(),
            parallel_reports: default_parallel_reports(),
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.enabled_categories()?;
        self.resolved_conflict_policy()?;

        if self.parallel_reports == 0 {
            anyhow::bail!("parallel_reports must be at least 1");
        }

        // Validate lexicon path if specified
        if let Some(ref path) = self.lexicon_path {
            if !path.exists() {
                anyhow::bail!("Lexicon file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Lexicon must be a TOML file: {}", path.display());
            }
        }

        // Validate audit configuration
        self.audit
            .validate()
            .context("Invalid audit configuration")?;

        Ok(())
    }

    /// Parse `entities` into the enabled category set
    pub fn enabled_categories(&self) -> Result<EnabledCategories> {
        Ok(EnabledCategories::from_names(&self.entities)?)
    }

    /// Build the resolver policy
    pub fn resolved_conflict_policy(&self) -> Result<ConflictPolicy> {
        match self.conflict_policy {
            ConflictPolicyKind::LongestFirst => Ok(ConflictPolicy::LongestFirst),
            ConflictPolicyKind::CategoryPriority => {
                if self.category_priority.is_empty() {
                    anyhow::bail!("conflict_policy 'category_priority' requires category_priority");
                }
                let order = self
                    .category_priority
                    .iter()
                    .map(|name| name.parse::<EntityCategory>())
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(ConflictPolicy::CategoryPriority(order))
            }
        }
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("RRA_ANONYMIZATION_ENTITIES") {
            self.entities = split_list(&val);
        }

        if let Ok(val) = std::env::var("RRA_ANONYMIZATION_FLAG_LIST") {
            self.flag_list = split_list(&val);
        }

        if let Ok(val) = std::env::var("RRA_ANONYMIZATION_LEXICON_PATH") {
            self.lexicon_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("RRA_ANONYMIZATION_PARALLEL_REPORTS") {
            self.parallel_reports = val
                .parse()
                .context("Invalid RRA_ANONYMIZATION_PARALLEL_REPORTS value")?;
        }

        // Apply audit env overrides
        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path must be set when audit logging is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("RRA_ANONYMIZATION_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid RRA_ANONYMIZATION_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("RRA_ANONYMIZATION_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("RRA_ANONYMIZATION_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid RRA_ANONYMIZATION_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnonymizationConfig::default();
        assert_eq!(config.entities.len(), EntityCategory::ALL.len());
        assert_eq!(config.flag_list, vec!["registratiennr", "adres"]);
        assert_eq!(config.conflict_policy, ConflictPolicyKind::LongestFirst);
        assert_eq!(config.parallel_reports, 4);
        assert!(!config.audit.enabled);
        assert!(config.audit.json_format);
    }

    #[test]
    fn test_config_validation() {
        let config = AnonymizationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enabled_categories().unwrap(), EnabledCategories::all());
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        let config = AnonymizationConfig {
            entities: vec!["person".to_string(), "email".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_zero_parallelism_is_rejected() {
        let config = AnonymizationConfig {
            parallel_reports: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_category_priority_policy() {
        let mut config = AnonymizationConfig {
            conflict_policy: ConflictPolicyKind::CategoryPriority,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.category_priority = vec!["date".to_string(), "patient_id".to_string()];
        assert_eq!(
            config.resolved_conflict_policy().unwrap(),
            ConflictPolicy::CategoryPriority(vec![EntityCategory::Date, EntityCategory::PatientId])
        );
    }

    #[test]
    fn test_missing_lexicon_file_is_rejected() {
        let config = AnonymizationConfig {
            lexicon_path: Some(PathBuf::from("/nonexistent/lexicon.toml")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" person, date ,,"), vec!["person", "date"]);
    }
}
