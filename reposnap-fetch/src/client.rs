//! HTTP client abstractions.
//!
//! Two underlying clients with different redirect policies: the API
//! client never follows redirects (the archive-link lookup reads the
//! `Location` header itself), while the download client follows the
//! hosting provider's redirect chain to the archive host.

use reqwest::{Client, Response, header, redirect};
use tracing::debug;

use crate::error::FetchError;

/// Maximum redirects followed when downloading an archive.
const MAX_DOWNLOAD_REDIRECTS: usize = 10;

/// HTTP client pair for API lookups and archive downloads.
#[derive(Debug, Clone)]
pub struct HttpClient {
    api: Client,
    download: Client,
}

impl HttpClient {
    /// Creates the client pair.
    ///
    /// No request timeout is set: archive downloads of large
    /// repositories legitimately run for minutes, and the transport's
    /// own connect timeout covers the failure modes that matter.
    pub fn new() -> Result<Self, FetchError> {
        let user_agent = concat!("reposnap/", env!("CARGO_PKG_VERSION"));

        let api = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()?;

        let download = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::limited(MAX_DOWNLOAD_REDIRECTS))
            .build()?;

        Ok(Self { api, download })
    }

    /// Performs a GET against the hosting API without following
    /// redirects, attaching a bearer token when one is configured.
    pub async fn api_get(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        debug!(url = %url, "API GET");
        let mut request = self
            .api
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await
    }

    /// Performs a streaming GET against an archive link.
    ///
    /// The authorization value, when present, is sent exactly as
    /// configured with no scheme prefix applied.
    pub async fn download(
        &self,
        url: &str,
        auth: Option<&str>,
    ) -> Result<Response, FetchError> {
        debug!(url = %url, "Start archive request");
        let mut request = self.download.get(url);
        if let Some(auth) = auth {
            request = request.header(header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response)
    }
}
