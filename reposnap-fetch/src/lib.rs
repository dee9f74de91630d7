// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # reposnap Fetch
//!
//! The network and filesystem pipeline for reposnap: turning a resolved
//! [`reposnap_core::Query`] into an extracted directory tree.
//!
//! ## Stages
//!
//! - [`locator`] - asks the hosting API for a time-limited tarball URL
//! - [`fetcher`] - streams the archive over HTTP
//! - [`extractor`] - decodes gzip+tar incrementally while writing to disk
//! - [`pipeline`] - sequences the stages as one cancellable unit
//!
//! Each stage hands its product to the next by value; the only shared
//! resource within a run is the response byte stream, owned exclusively
//! by the extraction call.
//!
//! ## Example
//!
//! ```ignore
//! use reposnap_core::{resolve, Settings};
//! use reposnap_fetch::ClonePipeline;
//!
//! let settings = Settings::default();
//! let query = resolve("octocat/Hello-World", &settings);
//! let pipeline = ClonePipeline::new(settings)?;
//! let outcome = pipeline.execute(&query, destination).await;
//! ```

pub mod client;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod locator;
pub mod pipeline;

pub use client::HttpClient;
pub use error::{ExtractError, FetchError, LocateError};
pub use extractor::extract;
pub use fetcher::fetch_archive;
pub use locator::{ArchiveLink, locate_archive_link};
pub use pipeline::{CloneOperation, ClonePipeline};
