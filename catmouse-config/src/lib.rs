//! # catmouse Configuration
//!
//! Layered configuration for simulation runs.
//!
//! ## Sources, lowest precedence first
//! 1. Built-in defaults
//! 2. `config/catmouse.yaml`
//! 3. `config/<CATMOUSE_ENV>.yaml` (`development` when unset)
//! 4. `CATMOUSE_*` environment variables, `__` between nesting levels
//!    (`CATMOUSE_SIMULATION__BOWLS=3`)

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod coordinator;
mod error;
mod simulator;
mod telemetry;
mod validation;

pub use coordinator::CoordinatorConfig;
pub use error::ConfigError;
pub use simulator::SimulationConfig;
pub use telemetry::TelemetryConfig;

/// Base configuration file read by [`CatMouseConfig::load`].
pub const BASE_FILE: &str = "config/catmouse.yaml";
const ENV_PREFIX: &str = "CATMOUSE_";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct CatMouseConfig {
    /// Harness parameters: bowls, creatures, timings.
    #[validate(nested)]
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Feeding coordinator parameters.
    #[validate(nested)]
    #[serde(default)]
    pub coordinator: CoordinatorConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl CatMouseConfig {
    /// Load configuration from the default files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(CatMouseConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("CATMOUSE_ENV").unwrap_or_else(|_| "development".into());
        let env_file = format!("config/{env}.yaml");
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file, then the environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::extract(
            Figment::from(Serialized::defaults(CatMouseConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
