use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Gemini REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub models: ModelConfig,
    /// Directory holding `index.html` and the browser script.
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model for the first attempt.
    pub primary: String,
    /// Model for the single retry. Defaults to `primary`.
    pub fallback: String,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get_env(&lookup, "GEMINI_API_KEY", None)?;
        let primary = get_env(&lookup, "GEMINI_MODEL", Some(DEFAULT_MODEL))?;
        let fallback = get_env(&lookup, "GEMINI_FALLBACK_MODEL", Some(primary.as_str()))?;

        Ok(GatewayConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                api_base: get_env(&lookup, "GEMINI_API_BASE", Some(DEFAULT_API_BASE))?,
            },
            models: ModelConfig { primary, fallback },
            static_dir: lookup("STATIC_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_static_dir),
        })
    }

    /// First characters of the API key, safe to print when diagnosing upstream failures.
    pub fn api_key_hint(&self) -> String {
        let prefix: String = self.gemini.api_key.expose_secret().chars().take(5).collect();
        format!("{}...", prefix)
    }
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

/// Empty values count as unset.
fn get_env<F>(lookup: &F, key: &str, default: Option<&str>) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|val| !val.is_empty()) {
        Some(val) => Ok(val),
        None => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}
