use crate::error::AppError;
use config::{Environment, File};
use serde::Deserialize;
use std::env;

/// Settings shared by every service in the workspace.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load settings from the optional `configuration` file, then let
    /// `APP`-prefixed environment variables override it.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}

/// Read an environment variable, falling back to `default` in development.
///
/// When `ENVIRONMENT=prod`, a missing variable is a configuration error and
/// the default never applies.
pub fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    let is_prod = env::var("ENVIRONMENT").map(|v| v == "prod").unwrap_or(false);

    match env::var(key) {
        Ok(value) => Ok(value),
        Err(_) if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be set in production",
            key
        ))),
        Err(_) => match default {
            Some(value) => Ok(value.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}
