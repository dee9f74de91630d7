//! Locator resolution.
//!
//! Turns an arbitrary user-supplied locator string into a [`Query`] by
//! normalizing it and testing it against the ordered
//! [`crate::patterns::PATTERN_TABLE`]. Resolution never fails:
//! unmatched input degrades to [`QueryKind::Clone`] with the normalized
//! string retained as an opaque clone-URL candidate.

use crate::patterns::find_match;
use crate::query::{Query, QueryKind, QueryParams};
use crate::settings::Settings;

/// The custom URI scheme accepted in locators.
pub const URI_SCHEME: &str = "reposnap://";

/// Query-string marker that opts out of CDN delivery.
const NO_CDN_MARKER: &str = "noCDN";

/// Resolves a locator string into a [`Query`].
///
/// Normalization, in order: strip the `reposnap://` scheme, strip
/// `https://`, honor and discard any query string, strip the configured
/// hosting domain, and force a leading `/`. The result is then matched
/// against the pattern table, first match wins.
pub fn resolve(input: &str, settings: &Settings) -> Query {
    let mut url = input;
    let mut from_host = false;
    let mut use_cdn = true;

    if let Some(rest) = url.strip_prefix(URI_SCHEME) {
        url = rest;
    }
    if let Some(rest) = url.strip_prefix("https://") {
        url = rest;
    }

    // The query string carries only the CDN opt-out; everything from
    // the separator onward is discarded before matching.
    let url = if let Some((path, query_string)) = url.split_once('?') {
        if query_string.contains(NO_CDN_MARKER) {
            use_cdn = false;
        }
        path
    } else {
        url
    };

    let url = if let Some(rest) = url.strip_prefix(settings.github_domain.as_str()) {
        from_host = true;
        rest
    } else {
        url
    };

    let path = if url.starts_with('/') {
        url.to_string()
    } else {
        format!("/{url}")
    };

    let mut query = Query {
        kind: QueryKind::Clone,
        from_host,
        use_cdn,
        src: path.clone(),
        exact_ref: false,
        params: QueryParams::default(),
    };

    let Some((matched, kind)) = find_match(&path) else {
        return query;
    };
    query.kind = kind;

    if kind == QueryKind::Search {
        query.src = path.replace('/', "");
        return query;
    }

    query.params.owner = matched.param("owner").to_string();
    query.params.repo = matched.param("repo").to_string();

    let git_ref = matched.param("ref");
    if !git_ref.is_empty() {
        query.params.git_ref = git_ref.to_string();
        query.exact_ref = true;
    }

    match kind {
        QueryKind::PullRequest => {
            query.params.pull_request_id = matched.param("pull_request_id").to_string();
        }
        QueryKind::File => {
            query.params.file_path = matched.trailing().to_string();
        }
        _ => {}
    }

    query
}
