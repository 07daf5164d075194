use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("catalog unavailable: {0}")]
    DataUnavailable(String),

    #[error("invalid scoring config: {0}")]
    InvalidConfig(String),

    #[error("authentication failed: {0}")]
    PublishAuthFailed(String),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
