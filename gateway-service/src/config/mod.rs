use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default generation temperature for the Gemini model.
const DEFAULT_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub model: ModelConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Gemini model name (e.g. gemini-2.0-flash).
    pub name: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory where multipart uploads are spooled for the lifetime of
    /// one request.
    pub upload_path: String,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(GatewayConfig {
            common: common_config,
            google: GoogleConfig {
                // An empty key is accepted outside production: the fault
                // then surfaces on the first upstream call, not at startup.
                api_key: get_env("GOOGLE_API_KEY", Some(""), is_prod)?,
            },
            model: ModelConfig {
                name: get_env("GATEWAY_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                temperature: get_env(
                    "GATEWAY_TEMPERATURE",
                    Some(&DEFAULT_TEMPERATURE.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_TEMPERATURE),
            },
            storage: StorageConfig {
                upload_path: get_env("UPLOAD_PATH", Some("uploads"), is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
