//! Error types for txview-core
//!
//! Collaborator failures are expressed as [`FetchError`]. Consumers absorb
//! them into their [`FetchStatus`](crate::FetchStatus) and report them to the
//! caller wrapped in [`CoreError::Fetch`].

use thiserror::Error;

/// Failure reported by a data source collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Main error type for txview-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Fetching {source_name} failed: {source}")]
    Fetch {
        source_name: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("Invalid employee id: {id:?}")]
    InvalidEmployeeId { id: String },
}

impl CoreError {
    pub(crate) fn fetch(source_name: &'static str, source: FetchError) -> Self {
        CoreError::Fetch {
            source_name,
            source,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
