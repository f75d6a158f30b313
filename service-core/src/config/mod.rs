use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Common settings shared by every service: bind address and port.
///
/// Loaded from an optional `configuration` file plus `APP__`-prefixed
/// environment variables (e.g. `APP__PORT=0` for a random test port).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
