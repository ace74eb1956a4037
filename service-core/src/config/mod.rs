use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;

/// Settings shared by every service in the workspace.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Loads `.env`, an optional `configuration` file and `APP__*` variables, in that order.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_environment(Environment::with_prefix("APP").separator("__"))
    }

    fn from_environment(environment: Environment) -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(environment)
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
