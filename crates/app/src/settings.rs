//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml` in the working directory and
//! are overridden by `WALLET__*` environment variables, e.g.
//! `WALLET__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub environment: RunMode,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
            environment: RunMode::default(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// Custody service that issues deposit addresses.
#[derive(Debug, Deserialize)]
pub struct Custody {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
    pub custody: Option<Custody>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(Config::builder().add_source(File::with_name("settings").required(false)))
    }

    fn from_builder(
        builder: config::ConfigBuilder<DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("WALLET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.environment == RunMode::Production && self.custody.is_none() {
            return Err(ConfigError::Message(
                "custody settings are required in production".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == RunMode::Production
    }
}
