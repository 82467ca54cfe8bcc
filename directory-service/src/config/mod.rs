use serde::Deserialize;
use service_core::config::{self as core_config, ServerConfig};
use service_core::error::AppError;
use std::path::PathBuf;

use crate::models::ClientCredential;
use crate::services::{DirectoryFiles, SigningAlgorithm};

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub directory: DirectorySource,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Jwt,
    /// Accept any credentials and any bearer token.
    AllowAny,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
    #[serde(default)]
    pub clients: Vec<ClientCredential>,
    #[serde(default)]
    pub token: TokenConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
    #[serde(default)]
    pub private_key_path: Option<PathBuf>,
    #[serde(default)]
    pub public_key_path: Option<PathBuf>,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,
    #[serde(default = "default_true")]
    pub require_known_subject: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            algorithm: SigningAlgorithm::default(),
            private_key_path: None,
            public_key_path: None,
            ttl_seconds: default_ttl_seconds(),
            require_known_subject: true,
        }
    }
}

/// Where directory data comes from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectorySource {
    /// JSON snapshot files.
    File {
        departments: PathBuf,
        users: PathBuf,
        groups: PathBuf,
        group_users: PathBuf,
        /// Fail startup on unreadable files instead of serving them empty.
        #[serde(default)]
        strict: bool,
    },
    /// Generated on demand.
    Jit {
        prefix: String,
        departments: usize,
        users_per_department: usize,
    },
    #[default]
    Empty,
}

impl DirectorySource {
    pub fn files(&self) -> Option<DirectoryFiles> {
        match self {
            DirectorySource::File {
                departments,
                users,
                groups,
                group_users,
                ..
            } => Some(DirectoryFiles {
                departments: departments.clone(),
                users: users.clone(),
                groups: groups.clone(),
                group_users: group_users.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_token_requests")]
    pub token_requests: u32,
    #[serde(default = "default_token_window_seconds")]
    pub token_window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            token_requests: default_token_requests(),
            token_window_seconds: default_token_window_seconds(),
        }
    }
}

/// Longest token lifetime accepted from configuration.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Longest rate limit window accepted from configuration.
pub const MAX_RATE_LIMIT_WINDOW_SECONDS: u64 = 24 * 60 * 60;

fn default_service_name() -> String {
    "directory-service".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ttl_seconds() -> i64 {
    7200
}

fn default_true() -> bool {
    true
}

fn default_token_requests() -> u32 {
    60
}

fn default_token_window_seconds() -> u64 {
    60
}

impl DirectoryConfig {
    pub fn load() -> Result<Self, AppError> {
        let config: Self = core_config::load("directory-service")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let token = &self.auth.token;
        if token.ttl_seconds <= 0 || token.ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(config_error(&format!(
                "auth.token.ttl_seconds must be between 1 and {MAX_TOKEN_TTL_SECONDS}"
            )));
        }
        if token.private_key_path.is_some() != token.public_key_path.is_some() {
            return Err(config_error(
                "auth.token.private_key_path and public_key_path must be set together",
            ));
        }
        if self.rate_limit.token_requests == 0 || self.rate_limit.token_window_seconds == 0 {
            return Err(config_error("rate_limit values must be positive"));
        }
        if self.rate_limit.token_window_seconds > MAX_RATE_LIMIT_WINDOW_SECONDS {
            return Err(config_error(&format!(
                "rate_limit.token_window_seconds must be at most {MAX_RATE_LIMIT_WINDOW_SECONDS}"
            )));
        }
        if let DirectorySource::Jit { prefix, .. } = &self.directory {
            if prefix.is_empty() {
                return Err(config_error("directory.prefix must not be empty"));
            }
        }
        if self.auth.mode == AuthMode::Jwt && self.auth.clients.is_empty() {
            tracing::warn!("No API clients configured; every credential exchange will fail");
        }
        Ok(())
    }
}

fn config_error(message: &str) -> AppError {
    AppError::ConfigError(anyhow::anyhow!(message.to_string()))
}
