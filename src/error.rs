use std::path::PathBuf;

use thiserror::Error;

use crate::scilog::client::ClientError;

/// Errors raised by the snippet model and the [`SciLog`](crate::scilog::SciLog) facade.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown field '{field}' for {kind} snippet")]
    UnknownField { kind: &'static str, field: String },

    #[error("Invalid snippet: {0}")]
    Validation(String),

    #[error("Unsupported placeholder for {field}: {value}")]
    UnsupportedPlaceholder { field: String, value: String },

    #[error("Unresolved placeholder in {0}")]
    UnresolvedPlaceholder(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Path must point to a file with an extension: {}", .0.display())]
    MissingExtension(PathBuf),

    #[error("Snippet has no id")]
    MissingId,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to read attachment: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
