use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or authorization failure talking to the remote table.
    /// Surfaced to the user as-is; the client never retries.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
