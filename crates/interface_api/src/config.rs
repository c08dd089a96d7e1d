//! API configuration

use serde::Deserialize;

use domain_claims::workflow::{DEFAULT_MAX_EVIDENCE_BYTES, DEFAULT_MAX_EVIDENCE_FILES};
use domain_claims::WorkflowConfig;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// API configuration
///
/// Every field has a default, so a partial environment is enough.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    pub log_format: LogFormat,
    /// Directory the evidence store writes into
    pub evidence_root: String,
    /// Public URL prefix of stored evidence
    pub evidence_base_url: String,
    /// Prefix of the management link sent on approval
    pub venue_manage_base_url: String,
    pub max_evidence_files: usize,
    pub max_evidence_bytes: usize,
    /// Queue depth of the notification outbox
    pub notification_outbox_capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/venue_claims".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            evidence_root: "./data/evidence".to_string(),
            evidence_base_url: "http://localhost:8080/evidence".to_string(),
            venue_manage_base_url: "http://localhost:3000".to_string(),
            max_evidence_files: DEFAULT_MAX_EVIDENCE_FILES,
            max_evidence_bytes: DEFAULT_MAX_EVIDENCE_BYTES,
            notification_outbox_capacity: 1024,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Engine settings derived from this configuration
    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            venue_manage_base_url: self.venue_manage_base_url.clone(),
            max_evidence_files: self.max_evidence_files,
            max_evidence_bytes: self.max_evidence_bytes,
        }
    }

    /// Upper bound for a multipart submission body
    pub fn submission_body_limit(&self) -> usize {
        const FORM_OVERHEAD: usize = 1024 * 1024;
        self.max_evidence_files
            .saturating_mul(self.max_evidence_bytes)
            .saturating_add(FORM_OVERHEAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.workflow_config().max_evidence_files, DEFAULT_MAX_EVIDENCE_FILES);
    }

    #[test]
    fn test_body_limit_covers_all_files() {
        let config = ApiConfig {
            max_evidence_files: 2,
            max_evidence_bytes: 10,
            ..ApiConfig::default()
        };
        assert_eq!(config.submission_body_limit(), 20 + 1024 * 1024);
    }
}
