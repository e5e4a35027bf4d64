//! Error types for configuration loading.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or validating a plan configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("repository '{repository}' appears in bonds '{first}' and '{second}'")]
    OverlappingBonds {
        repository: String,
        first: String,
        second: String,
    },

    #[error("bond '{0}' has fewer than two members")]
    DegenerateBond(String),

    #[error("worker budget for stage {stage} is zero")]
    ZeroWorkerBudget { stage: usize },
}
