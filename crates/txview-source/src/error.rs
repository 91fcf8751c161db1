//! Error types for txview-source

use std::io;
use thiserror::Error;
use txview_core::FetchError;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid fixture format: {message}")]
    InvalidFormat { message: String },

    #[error("Unknown page token: {token}")]
    UnknownPageToken { token: String },

    #[error("Unknown employee: {id}")]
    UnknownEmployee { id: String },
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::InvalidFormat {
            message: e.to_string(),
        }
    }
}

impl From<SourceError> for FetchError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::IoError(_) => FetchError::Transport {
                message: e.to_string(),
            },
            SourceError::InvalidFormat { .. } => FetchError::Parse {
                message: e.to_string(),
            },
            SourceError::UnknownPageToken { .. } | SourceError::UnknownEmployee { .. } => {
                FetchError::InvalidRequest {
                    message: e.to_string(),
                }
            }
        }
    }
}
