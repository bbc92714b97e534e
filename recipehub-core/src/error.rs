use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("Invalid value: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Index {index} out of range for length {len}")]
    Index { index: usize, len: usize },

    #[error("Transport failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for HubError {
    fn from(e: reqwest::Error) -> Self {
        HubError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for HubError {
    fn from(e: serde_json::Error) -> Self {
        HubError::Transport(format!("Invalid JSON: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
