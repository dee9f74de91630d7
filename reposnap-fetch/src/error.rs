//! Fetch pipeline error types.

use thiserror::Error;

// ============================================================================
// Link Resolution Error
// ============================================================================

/// The hosting API could not produce an archive link.
///
/// Bad owner/repo, bad ref, or an auth failure all land here. Fatal to
/// the invocation: the pipeline stops before anything touches disk.
#[derive(Debug, Error)]
pub enum LocateError {
    /// HTTP request to the hosting API failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Hosting API returned {status} for {repo}")]
    Status {
        /// HTTP status code returned.
        status: reqwest::StatusCode,
        /// The `owner/repo@ref` that was requested.
        repo: String,
    },

    /// The API redirected without a usable `Location` header.
    #[error("Hosting API redirect carried no archive location")]
    MissingLocation,

    /// The lookup task was dropped before producing a result.
    #[error("Archive link lookup was abandoned")]
    Abandoned,
}

// ============================================================================
// Fetch Error
// ============================================================================

/// Transport or HTTP failure after an archive link was obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the archive host.
    #[error("Archive host returned {0}")]
    Status(reqwest::StatusCode),
}

// ============================================================================
// Extract Error
// ============================================================================

/// Stream-level extraction failure.
///
/// Per-entry write failures are not errors; they are aggregated into
/// the pipeline's partial-error flag. This type covers only failures
/// that prevent reading the archive at all.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The archive stream could not be opened or read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
