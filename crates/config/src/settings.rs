//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{bank_api, cases, otp, server};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP tool surface
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote bank API client
    #[serde(default)]
    pub bank_api: BankApiConfig,

    /// One-time password issuance
    #[serde(default)]
    pub otp: OtpConfig,

    /// Complaint case tracking
    #[serde(default)]
    pub cases: CaseConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_bank_api()?;
        self.validate_otp()?;
        self.validate_cases()?;
        Ok(())
    }

    fn validate_bank_api(&self) -> Result<(), ConfigError> {
        let api = &self.bank_api;

        if api.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "bank_api.base_url".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "bank_api.base_url".to_string(),
                message: format!("Must use http or https, got {}", api.base_url),
            });
        }

        if !(1..=120).contains(&api.timeout_secs) {
            return Err(ConfigError::InvalidValue {
                field: "bank_api.timeout_secs".to_string(),
                message: format!("Must be between 1 and 120, got {}", api.timeout_secs),
            });
        }

        Ok(())
    }

    fn validate_otp(&self) -> Result<(), ConfigError> {
        if !(30..=3600).contains(&self.otp.ttl_secs) {
            return Err(ConfigError::InvalidValue {
                field: "otp.ttl_secs".to_string(),
                message: format!("Must be between 30 and 3600, got {}", self.otp.ttl_secs),
            });
        }

        if !(4..=10).contains(&self.otp.code_length) {
            return Err(ConfigError::InvalidValue {
                field: "otp.code_length".to_string(),
                message: format!("Must be between 4 and 10, got {}", self.otp.code_length),
            });
        }

        Ok(())
    }

    fn validate_cases(&self) -> Result<(), ConfigError> {
        if self.cases.id_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cases.id_prefix".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        if self.cases.escalation_agents.iter().all(|a| a.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "cases.escalation_agents".to_string(),
                message: "At least one agent name is required".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    server::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    server::DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Remote bank API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankApiConfig {
    /// Base URL, endpoints are appended as `{base_url}/balance` etc.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to every request
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    bank_api::DEFAULT_BASE_URL.to_string()
}

fn default_api_timeout() -> u64 {
    bank_api::DEFAULT_TIMEOUT_SECS
}

impl Default for BankApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_api_timeout(),
        }
    }
}

/// OTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Seconds a code stays valid after issuance
    #[serde(default = "default_otp_ttl")]
    pub ttl_secs: u64,

    /// Digits in a locally generated fallback code
    #[serde(default = "default_code_length")]
    pub code_length: usize,
}

fn default_otp_ttl() -> u64 {
    otp::DEFAULT_TTL_SECS
}

fn default_code_length() -> usize {
    otp::DEFAULT_CODE_LENGTH
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_otp_ttl(),
            code_length: default_code_length(),
        }
    }
}

/// Complaint case configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseConfig {
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Roster escalations are assigned from, uniformly at random
    #[serde(default = "default_escalation_agents")]
    pub escalation_agents: Vec<String>,
}

fn default_id_prefix() -> String {
    cases::DEFAULT_ID_PREFIX.to_string()
}

fn default_escalation_agents() -> Vec<String> {
    cases::DEFAULT_ESCALATION_AGENTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            escalation_agents: default_escalation_agents(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of human readable ones
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from `config/` in the working directory and the environment
///
/// Priority: env vars > config/{env} > config/default > built-in defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("BANK_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        base_url = %settings.bank_api.base_url,
        timeout_secs = settings.bank_api.timeout_secs,
        otp_ttl_secs = settings.otp.ttl_secs,
        "Settings loaded"
    );

    Ok(settings)
}
