//! Resolved locator queries.
//!
//! A [`Query`] is the typed intent behind a user-supplied locator
//! string: clone this whole repository, view this file, view this pull
//! request, search for this term, or treat the input as a raw clone
//! URL. Queries are built once by [`crate::resolver::resolve`] and are
//! immutable afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The conventional default branch name, used when no ref was requested.
pub const DEFAULT_REF: &str = "main";

/// The alternate conventional default branch name.
const ALTERNATE_REF: &str = "master";

// ============================================================================
// Query Kind
// ============================================================================

/// The classified purpose of a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// An opaque clone-URL candidate (unmatched input).
    Clone,
    /// A whole repository at some ref.
    Root,
    /// A single file within a repository.
    File,
    /// A pull request.
    PullRequest,
    /// A bare search term.
    Search,
}

impl QueryKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::Root => "repository",
            Self::File => "file",
            Self::PullRequest => "pull request",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Query Params
// ============================================================================

/// Structured fields extracted from a locator, populated per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Requested ref (branch, tag, or commit). Set together with
    /// [`Query::exact_ref`].
    pub git_ref: String,
    /// Path of the requested file within the repository (File kind only).
    pub file_path: String,
    /// Pull request number (PullRequest kind only).
    pub pull_request_id: String,
}

// ============================================================================
// Query
// ============================================================================

/// A resolved user intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// What the locator asks for.
    pub kind: QueryKind,
    /// True if the input referenced the configured hosting domain.
    pub from_host: bool,
    /// False if the input explicitly opted out of CDN delivery.
    pub use_cdn: bool,
    /// The normalized input, retained for diagnostics.
    pub src: String,
    /// True only if the input text contained an explicit ref segment.
    pub exact_ref: bool,
    /// Extracted fields.
    pub params: QueryParams,
}

impl Query {
    /// The display form, e.g. `octocat/Hello-World@main`.
    ///
    /// Falls back to the raw source for kinds without owner/repo.
    pub fn pretty(&self) -> String {
        if self.params.owner.is_empty() {
            return self.src.clone();
        }
        format!(
            "{}/{}@{}",
            self.params.owner,
            self.params.repo,
            self.ref_to_use(None)
        )
    }

    /// A filesystem-safe temp-directory prefix, e.g. `octocat@Hello-World-`.
    ///
    /// Intended to be completed with a random suffix by the caller.
    pub fn tempdir_prefix(&self) -> String {
        format!("{}@{}-", self.params.owner, self.params.repo)
    }

    /// The ref to request from the hosting provider.
    ///
    /// An explicit ref in the locator always wins; otherwise the
    /// configured override applies, and failing that the conventional
    /// default.
    pub fn ref_to_use(&self, override_ref: Option<&str>) -> String {
        if self.exact_ref {
            return self.params.git_ref.clone();
        }
        override_ref.unwrap_or(DEFAULT_REF).to_string()
    }

    /// The alternate conventional default branch, for retrying after
    /// the primary default 404s. Empty when the locator pinned an exact
    /// ref (there is nothing sensible to fall back to).
    pub fn fallback_ref(&self) -> String {
        if self.exact_ref {
            return String::new();
        }
        if self.params.git_ref == DEFAULT_REF {
            ALTERNATE_REF.to_string()
        } else {
            DEFAULT_REF.to_string()
        }
    }

    /// True when this query names a repository that can be cloned.
    pub fn is_cloneable(&self) -> bool {
        !self.params.owner.is_empty() && !self.params.repo.is_empty()
    }
}
