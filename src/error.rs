use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to add item to board: {0}")]
    AddFailed(String),

    #[error("Failed to update item status: {0}")]
    UpdateFailed(String),

    #[error("Run deadline exceeded")]
    Timeout,

    #[error("GitHub API error: {0}")]
    Api(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No configuration found. Run 'boardsync init' first.")]
    NotInitialized,

    #[error("Configuration already exists at {0}")]
    AlreadyInitialized(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
