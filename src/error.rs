use thiserror::Error;

/// Failures at the persistence, configuration and transport boundaries.
/// Store operations themselves never fail.
#[derive(Debug, Error)]
pub enum NptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Snapshot is inconsistent: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Malformed request: {0}")]
    Request(#[from] serde_json::Error),

    #[error("Invalid choice.")]
    InvalidChoice(i64),

    #[error("Operation {0} requires a name.")]
    MissingName(i64),
}

pub type Result<T> = std::result::Result<T, NptError>;
