//! Error types for catalog operations.

use thiserror::Error;

/// Main error type for provider calls and catalog plumbing.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The provider answered with an error payload.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Album, playlist or user was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A collaborator (related-videos source, loader) could not serve the request.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Session header material could not be turned into request headers.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// HTTP request failed.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The worker pool stopped handing out permits.
    #[error("Worker pool closed")]
    PoolClosed,
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
