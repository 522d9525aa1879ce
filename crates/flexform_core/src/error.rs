use thiserror::Error;

/// A single failed check against one field of a form submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Row {line} rejected: {reason}")]
    ImportRow { line: usize, reason: String },
}

impl Error {
    /// The violations carried by a `Validation` error, empty otherwise.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Error::Validation(list) => list,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
