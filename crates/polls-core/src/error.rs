use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollsError {
    #[error("not initialized: run 'polls init'")]
    NotInitialized,

    #[error("question not found: {0}")]
    QuestionNotFound(u64),

    #[error("invalid text '{0}': must be 1 to 200 characters")]
    InvalidText(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PollsError>;
