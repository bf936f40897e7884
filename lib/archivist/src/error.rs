use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArchiveError>;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Catalog client is not configured (missing client id)")]
    NotConfigured,

    #[error("Malformed record {file}: {reason}")]
    MalformedRecord { file: String, reason: String },

    #[error("Malformed corrections file {}: {reason}", path.display())]
    MalformedCorrections { path: PathBuf, reason: String },

    #[error("Invalid correction {wrong:?}: {reason}")]
    InvalidCorrection { wrong: String, reason: String },

    #[error("{second} resolves to {} which is already taken by {first}", path.display())]
    PathCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("`{command}` failed: {message}")]
    Git { command: String, message: String },
}
