//! Resolution behavior across the full locator grammar.

use reposnap_core::{QueryKind, Settings, resolve};

fn settings() -> Settings {
    Settings::default()
}

#[test]
fn bare_two_segments_resolve_to_repository_root() {
    let query = resolve("octocat/Hello-World", &settings());
    assert_eq!(query.kind, QueryKind::Root);
    assert_eq!(query.params.owner, "octocat");
    assert_eq!(query.params.repo, "Hello-World");
    assert!(!query.exact_ref);
    assert!(query.params.git_ref.is_empty());
}

#[test]
fn single_segment_resolves_to_search() {
    let query = resolve("lodash", &settings());
    assert_eq!(query.kind, QueryKind::Search);
    assert_eq!(query.src, "lodash");
    assert!(query.params.owner.is_empty());
}

#[test]
fn tree_with_ref_resolves_to_root_with_exact_ref() {
    let query = resolve("octocat/Hello-World/tree/v2.0", &settings());
    assert_eq!(query.kind, QueryKind::Root);
    assert_eq!(query.params.git_ref, "v2.0");
    assert!(query.exact_ref);
}

#[test]
fn tree_with_trailing_path_resolves_to_file() {
    let query = resolve("octocat/Hello-World/tree/main/src/lib.rs", &settings());
    assert_eq!(query.kind, QueryKind::File);
    assert_eq!(query.params.git_ref, "main");
    assert_eq!(query.params.file_path, "src/lib.rs");
    assert!(query.exact_ref);
}

#[test]
fn blob_path_resolves_to_file() {
    let query = resolve(
        "https://github.com/octocat/Hello-World/blob/main/README.md",
        &settings(),
    );
    assert_eq!(query.kind, QueryKind::File);
    assert!(query.from_host);
    assert_eq!(query.params.file_path, "README.md");
}

#[test]
fn pull_request_files_view_resolves_to_pull_request() {
    let query = resolve("octocat/Hello-World/pull/42/files", &settings());
    assert_eq!(query.kind, QueryKind::PullRequest);
    assert_eq!(query.params.pull_request_id, "42");
}

#[test]
fn pull_request_precedence_beats_catch_all() {
    // "somefile" is not the literal "files" but must still land on the
    // pull-request wildcard pattern, not the repo catch-all.
    let query = resolve("owner/repo/pull/5/somefile", &settings());
    assert_eq!(query.kind, QueryKind::PullRequest);
    assert_eq!(query.params.pull_request_id, "5");
}

#[test]
fn unknown_repo_sub_path_resolves_to_root() {
    let query = resolve("owner/repo/issues/12", &settings());
    assert_eq!(query.kind, QueryKind::Root);
    assert_eq!(query.params.owner, "owner");
    assert!(!query.exact_ref);
}

#[test]
fn unmatched_input_degrades_to_clone() {
    let query = resolve("", &settings());
    assert_eq!(query.kind, QueryKind::Clone);
    assert_eq!(query.src, "/");
    assert!(!query.is_cloneable());
}

#[test]
fn custom_scheme_url_resolves_like_plain_input() {
    let query = resolve("reposnap://https://github.com/octocat/Hello-World", &settings());
    assert_eq!(query.kind, QueryKind::Root);
    assert!(query.from_host);
    assert_eq!(query.params.owner, "octocat");
}
