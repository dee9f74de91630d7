//! Archive link resolution.
//!
//! Asks the hosting API for a time-limited tarball URL for the
//! requested ref. The lookup runs on its own task and reports back over
//! a one-shot channel; the caller suspends until exactly one result
//! arrives. One lookup per invocation, no retry, no pooling.

use reqwest::header;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use reposnap_core::{Query, Settings};

use crate::client::HttpClient;
use crate::error::LocateError;

// ============================================================================
// Archive Link
// ============================================================================

/// The outcome of link resolution.
#[derive(Debug)]
pub struct ArchiveLink {
    /// The resolved archive URL. Empty on failure.
    pub url: String,
    /// Whether resolution succeeded.
    pub succeeded: bool,
    /// Failure cause, present only when `succeeded` is false.
    pub cause: Option<LocateError>,
}

impl ArchiveLink {
    /// A successful resolution.
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            succeeded: true,
            cause: None,
        }
    }

    /// A failed resolution.
    pub fn failure(cause: LocateError) -> Self {
        Self {
            url: String::new(),
            succeeded: false,
            cause: Some(cause),
        }
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// Builds the hosting API tarball-link URL for a repository.
///
/// With no ref the endpoint serves the repository's default branch,
/// whatever it happens to be named.
pub fn archive_request_url(
    api_domain: &str,
    owner: &str,
    repo: &str,
    git_ref: Option<&str>,
) -> String {
    match git_ref {
        Some(r) => format!("https://{api_domain}/repos/{owner}/{repo}/tarball/{r}"),
        None => format!("https://{api_domain}/repos/{owner}/{repo}/tarball"),
    }
}

/// Resolves the archive link for a query.
///
/// The ref is forwarded only when the locator pinned one explicitly or
/// the settings carry an override; otherwise the server picks the
/// repository's default branch.
pub async fn locate_archive_link(
    client: &HttpClient,
    settings: &Settings,
    query: &Query,
) -> ArchiveLink {
    let git_ref = if query.exact_ref {
        Some(query.params.git_ref.clone())
    } else {
        settings.ref_override().map(str::to_string)
    };

    let url = archive_request_url(
        &settings.api_domain,
        &query.params.owner,
        &query.params.repo,
        git_ref.as_deref(),
    );

    let (tx, rx) = oneshot::channel();
    let client = client.clone();
    let token = settings.token().map(str::to_string);
    let repo = query.pretty();

    tokio::spawn(async move {
        let link = lookup(&client, &url, token.as_deref(), &repo).await;
        // The receiver only disappears if the caller was abandoned;
        // there is nobody left to tell.
        let _ = tx.send(link);
    });

    match rx.await {
        Ok(link) => link,
        Err(_) => ArchiveLink::failure(LocateError::Abandoned),
    }
}

/// One archive-link lookup round-trip.
async fn lookup(client: &HttpClient, url: &str, token: Option<&str>, repo: &str) -> ArchiveLink {
    let response = match client.api_get(url, token).await {
        Ok(response) => response,
        Err(e) => {
            warn!(repo = %repo, error = %e, "Archive link lookup failed");
            return ArchiveLink::failure(LocateError::Http(e));
        }
    };

    let status = response.status();
    if status.is_redirection() {
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok());
        return match location {
            Some(location) => {
                debug!(repo = %repo, "Resolved archive link");
                ArchiveLink::success(location)
            }
            None => ArchiveLink::failure(LocateError::MissingLocation),
        };
    }

    if status.is_success() {
        // Some enterprise hosts serve the archive directly instead of
        // redirecting to a download host.
        return ArchiveLink::success(url);
    }

    warn!(repo = %repo, status = %status, "Hosting API refused archive link");
    ArchiveLink::failure(LocateError::Status {
        status,
        repo: repo.to_string(),
    })
}
