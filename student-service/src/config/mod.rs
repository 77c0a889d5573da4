use serde::Deserialize;
use service_core::config as core_config;
use service_core::config::get_env;
use service_core::error::AppError;
use service_core::registry::RegistrySettings;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct StudentConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub registry: RegistrySettings,
}

impl StudentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(StudentConfig {
            common: common_config,
            registry: RegistrySettings {
                base_url: get_env("REGISTRY_URL", Some("http://localhost:8761/eureka"))?,
                app_name: get_env("REGISTRY_APP_NAME", Some("student-service"))?,
                host_name: get_env("REGISTRY_HOST_NAME", Some("localhost"))?,
                enabled: env::var("REGISTRY_ENABLED")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .unwrap_or(true),
                heartbeat_interval_secs: get_env("REGISTRY_HEARTBEAT_SECONDS", Some("30"))?
                    .parse()
                    .unwrap_or(30),
                request_timeout_secs: get_env("REGISTRY_TIMEOUT_SECONDS", Some("5"))?
                    .parse()
                    .unwrap_or(5),
            },
        })
    }
}
