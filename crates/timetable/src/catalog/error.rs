//! Error types for catalog retrieval.

use thiserror::Error;

/// Errors that can occur while fetching the session catalog.
#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server answered with a non-success status
    #[error("Catalog request failed with status {status}")]
    Status { status: u16 },

    /// The catalog document is not a JSON array of session records
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Reading the catalog file failed
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Retries were exhausted
    #[error("Catalog unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },
}

impl CatalogError {
    /// Returns true if this error is potentially transient and retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Network { .. } => true,
            CatalogError::Status { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CatalogError::Parse {
                message: err.to_string(),
            };
        }
        CatalogError::Network {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io {
            message: err.to_string(),
        }
    }
}
