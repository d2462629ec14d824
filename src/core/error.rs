use thiserror::Error;

/// Fatal setup errors. Simulation-level anomalies (missing nodes, dead
/// targets, unaffordable placements) are modeled as no-op outcomes on the
/// operations themselves, never as errors.
#[derive(Error, Debug)]
pub enum ColonyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ColonyError>;
