//! Archive download.
//!
//! One GET against a resolved archive link, yielding the response body
//! as an open byte stream for the extractor to consume. No retry, no
//! range requests; the link is single-use and short-lived anyway.

use reqwest::Response;
use tracing::debug;

use crate::client::HttpClient;
use crate::error::FetchError;
use crate::locator::ArchiveLink;

/// Fetches the archive behind a resolved link.
///
/// The token, when configured, is sent as the raw `Authorization`
/// value. The returned response's body has not been read yet; dropping
/// it releases the connection on every exit path.
pub async fn fetch_archive(
    client: &HttpClient,
    link: &ArchiveLink,
    token: Option<&str>,
) -> Result<Response, FetchError> {
    debug!(url = %loggable_url(&link.url), "Fetching archive");
    client.download(&link.url, token).await
}

/// Strips the query string before a link reaches the logs.
///
/// Archive links carry short-lived signing tokens in their query
/// parameters.
fn loggable_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.to_string()
        }
        Err(_) => raw.to_string(),
    }
}
