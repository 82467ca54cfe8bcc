use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::{Deserialize, de::DeserializeOwned};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

/// Load layered settings for a service crate.
///
/// Sources, lowest precedence first: `<crate>/config/base.yaml` (or
/// `config/base.yaml` when already running inside the crate directory),
/// then `APP__`-prefixed environment variables such as `APP__SERVER__PORT`.
/// The file is optional; a missing file leaves every field to its serde
/// default or to the environment.
pub fn load<T: DeserializeOwned>(crate_dir: &str) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let config_file = config_file_path(crate_dir)?;

    let settings = Cfg::builder()
        .add_source(File::from(config_file).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}

fn config_file_path(crate_dir: &str) -> Result<PathBuf, AppError> {
    let base_path = std::env::current_dir()?;

    let configuration_directory = if base_path.ends_with(crate_dir) {
        base_path.join("config")
    } else {
        base_path.join(crate_dir).join("config")
    };

    Ok(configuration_directory.join("base.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8001);
    }

    #[test]
    fn config_file_lives_under_crate_directory() {
        let path = config_file_path("some-service").unwrap();
        assert!(path.ends_with("some-service/config/base.yaml"));
    }
}
