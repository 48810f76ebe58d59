use catmouse_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to spawn {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} panicked")]
    CreaturePanicked(String),

    #[error("Feeding coordinator still shared after all creatures exited")]
    CoordinatorShared,

    #[error("{count} exclusion violations observed, first: {first}")]
    ExclusionViolated { count: usize, first: String },
}
