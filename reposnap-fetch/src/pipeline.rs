//! Clone pipeline orchestration.
//!
//! Sequences link resolution, archive download, and streaming
//! extraction as one unit of work. The whole run is dispatched onto its
//! own task and awaited over a one-shot channel, mirroring the
//! locator's pattern: the entry point suspends exactly once and
//! receives exactly one outcome.
//!
//! Stage failures (no link, failed download) abort the run before
//! extraction starts and leave the destination untouched. Per-entry
//! extraction failures never abort; they surface as the partial-error
//! flag on the outcome.

use std::path::Path;

use tokio::sync::oneshot;
use tracing::{error, info};

use reposnap_core::{Query, Settings};

use crate::client::HttpClient;
use crate::error::FetchError;
use crate::extractor::extract_response;
use crate::fetcher::fetch_archive;
use crate::locator::locate_archive_link;

// ============================================================================
// Clone Operation
// ============================================================================

/// Terminal outcome of a clone run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneOperation {
    /// True once every stage ran to completion; false if the run was
    /// aborted before extraction began.
    pub completed: bool,
    /// True if one or more entries failed to write while the pipeline
    /// continued.
    pub had_partial_errors: bool,
}

impl CloneOperation {
    /// An aborted run. Nothing was written.
    pub fn aborted() -> Self {
        Self {
            completed: false,
            had_partial_errors: false,
        }
    }

    /// A completed run with the extractor's partial-error verdict.
    pub fn finished(had_partial_errors: bool) -> Self {
        Self {
            completed: true,
            had_partial_errors,
        }
    }
}

// ============================================================================
// Clone Pipeline
// ============================================================================

/// Executes tarball clones for resolved queries.
#[derive(Debug, Clone)]
pub struct ClonePipeline {
    client: HttpClient,
    settings: Settings,
}

impl ClonePipeline {
    /// Creates a pipeline with the given settings.
    pub fn new(settings: Settings) -> Result<Self, FetchError> {
        Ok(Self {
            client: HttpClient::new()?,
            settings,
        })
    }

    /// Clones the queried repository into `destination`.
    ///
    /// Runs the locate → fetch → extract sequence on its own task and
    /// waits for its single outcome. Concurrent executions are safe:
    /// each run owns disjoint channels, streams, and destinations.
    pub async fn execute(&self, query: &Query, destination: &Path) -> CloneOperation {
        let (tx, rx) = oneshot::channel();

        let client = self.client.clone();
        let settings = self.settings.clone();
        let query = query.clone();
        let destination = destination.to_path_buf();

        tokio::spawn(async move {
            let outcome = run(&client, &settings, &query, &destination).await;
            let _ = tx.send(outcome);
        });

        rx.await.unwrap_or_else(|_| CloneOperation::aborted())
    }
}

/// One locate → fetch → extract sequence.
async fn run(
    client: &HttpClient,
    settings: &Settings,
    query: &Query,
    destination: &Path,
) -> CloneOperation {
    let link = locate_archive_link(client, settings, query).await;
    if !link.succeeded {
        let cause = link
            .cause
            .map_or_else(|| "unknown".to_string(), |e| e.to_string());
        error!(repo = %query.pretty(), cause = %cause, "Invalid repository link");
        return CloneOperation::aborted();
    }

    info!(url = %link.url, "Fetched archive link");

    let response = match fetch_archive(client, &link, settings.token()).await {
        Ok(response) => response,
        Err(e) => {
            error!(repo = %query.pretty(), error = %e, "Failed to fetch archive");
            return CloneOperation::aborted();
        }
    };

    info!(repo = %query.pretty(), "Extracting");

    let extraction = extract_response(
        response,
        destination.to_path_buf(),
        query.params.repo.clone(),
    )
    .await;

    match extraction {
        Ok(had_partial_errors) => {
            if had_partial_errors {
                info!("Finished extracting with errors");
            } else {
                info!("Finished extracting");
            }
            CloneOperation::finished(had_partial_errors)
        }
        Err(e) => {
            error!(repo = %query.pretty(), error = %e, "Failed to open archive stream");
            CloneOperation::aborted()
        }
    }
}
