//! Extraction behavior against real gzip-compressed tar fixtures.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, EntryType, Header};

use reposnap_fetch::extract;

/// An archive entry: a directory when `content` is `None`.
struct Fixture<'a> {
    path: &'a str,
    content: Option<&'a [u8]>,
    mode: u32,
}

impl<'a> Fixture<'a> {
    fn dir(path: &'a str) -> Self {
        Self {
            path,
            content: None,
            mode: 0o755,
        }
    }

    fn file(path: &'a str, content: &'a [u8]) -> Self {
        Self {
            path,
            content: Some(content),
            mode: 0o644,
        }
    }

    fn executable(path: &'a str, content: &'a [u8]) -> Self {
        Self {
            path,
            content: Some(content),
            mode: 0o755,
        }
    }
}

/// Builds an in-memory `.tar.gz` from the given entries, in order.
fn targz(entries: &[Fixture<'_>]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);

    for entry in entries {
        let mut header = Header::new_gnu();
        header.set_mode(entry.mode);
        match entry.content {
            Some(content) => {
                header.set_entry_type(EntryType::Regular);
                header.set_size(content.len() as u64);
                header.set_cksum();
                builder
                    .append_data(&mut header, entry.path, Cursor::new(content))
                    .unwrap();
            }
            None => {
                header.set_entry_type(EntryType::Directory);
                header.set_size(0);
                header.set_cksum();
                builder
                    .append_data(&mut header, entry.path, std::io::empty())
                    .unwrap();
            }
        }
    }

    builder.into_inner().unwrap().finish().unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn strips_wrapper_directory_and_extracts_tree() {
    let archive = targz(&[
        Fixture::dir("Hello-World-abc123"),
        Fixture::file("Hello-World-abc123/README.md", b"hello"),
        Fixture::dir("Hello-World-abc123/src"),
        Fixture::file("Hello-World-abc123/src/main.rs", b"fn main() {}"),
    ]);

    let dest = tempfile::tempdir().unwrap();
    let had_errors = extract(Cursor::new(archive), dest.path(), "Hello-World").unwrap();

    assert!(!had_errors);
    assert_eq!(read(&dest.path().join("README.md")), "hello");
    assert_eq!(read(&dest.path().join("src/main.rs")), "fn main() {}");
}

#[test]
fn empty_archive_is_a_successful_extraction() {
    let archive = targz(&[]);

    let dest = tempfile::tempdir().unwrap();
    let had_errors = extract(Cursor::new(archive), dest.path(), "repo").unwrap();

    assert!(!had_errors);
    assert!(fs::read_dir(dest.path()).unwrap().next().is_none());
}

#[test]
fn duplicate_entry_paths_last_write_wins() {
    let archive = targz(&[
        Fixture::dir("wrapper"),
        Fixture::file("wrapper/config.json", b"first"),
        Fixture::file("wrapper/config.json", b"second"),
    ]);

    let dest = tempfile::tempdir().unwrap();
    let had_errors = extract(Cursor::new(archive), dest.path(), "repo").unwrap();

    assert!(!had_errors);
    assert_eq!(read(&dest.path().join("config.json")), "second");
}

#[test]
fn extraction_is_idempotent() {
    let archive = targz(&[
        Fixture::dir("wrapper"),
        Fixture::file("wrapper/a.txt", b"alpha"),
        Fixture::file("wrapper/b.txt", b"beta"),
    ]);

    let dest = tempfile::tempdir().unwrap();
    extract(Cursor::new(archive.clone()), dest.path(), "repo").unwrap();
    let had_errors = extract(Cursor::new(archive), dest.path(), "repo").unwrap();

    assert!(!had_errors);
    assert_eq!(read(&dest.path().join("a.txt")), "alpha");
    assert_eq!(read(&dest.path().join("b.txt")), "beta");
}

#[test]
fn detected_root_directory_nests_later_entries() {
    // After stripping the wrapper, a directory named exactly like the
    // repository becomes the extraction root for what follows.
    let archive = targz(&[
        Fixture::dir("wrapper"),
        Fixture::dir("wrapper/repo"),
        Fixture::file("wrapper/notes.txt", b"nested"),
    ]);

    let dest = tempfile::tempdir().unwrap();
    let had_errors = extract(Cursor::new(archive), dest.path(), "repo").unwrap();

    assert!(!had_errors);
    assert!(dest.path().join("repo").is_dir());
    assert_eq!(read(&dest.path().join("repo/notes.txt")), "nested");
}

#[test]
fn root_name_mismatch_falls_back_to_flat_extraction() {
    // The wrapper is "repo-abc123" but the query's repo is "repo": no
    // entry matches after stripping, so everything lands directly under
    // the destination and nothing is lost.
    let archive = targz(&[
        Fixture::dir("repo-abc123"),
        Fixture::file("repo-abc123/README.md", b"kept"),
        Fixture::dir("repo-abc123/docs"),
        Fixture::file("repo-abc123/docs/guide.md", b"also kept"),
    ]);

    let dest = tempfile::tempdir().unwrap();
    let had_errors = extract(Cursor::new(archive), dest.path(), "repo").unwrap();

    assert!(!had_errors);
    assert_eq!(read(&dest.path().join("README.md")), "kept");
    assert_eq!(read(&dest.path().join("docs/guide.md")), "also kept");
}

#[test]
fn single_failing_entry_does_not_abort_the_rest() {
    let archive = targz(&[
        Fixture::dir("wrapper"),
        Fixture::file("wrapper/ok-before.txt", b"before"),
        Fixture::file("wrapper/blocked/inner.txt", b"unwritable"),
        Fixture::file("wrapper/ok-after.txt", b"after"),
    ]);

    let dest = tempfile::tempdir().unwrap();
    // A plain file where the archive wants a directory.
    fs::write(dest.path().join("blocked"), b"in the way").unwrap();

    let had_errors = extract(Cursor::new(archive), dest.path(), "repo").unwrap();

    assert!(had_errors);
    assert_eq!(read(&dest.path().join("ok-before.txt")), "before");
    assert_eq!(read(&dest.path().join("ok-after.txt")), "after");
}

/// Builds a `.tar.gz` containing one hostile entry whose recorded path
/// tries to climb out of the destination. The header name is written
/// directly so the builder cannot normalize it first.
fn hostile_targz() -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);

    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Directory);
    header.set_mode(0o755);
    header.set_size(0);
    header.set_cksum();
    builder
        .append_data(&mut header, "wrapper", std::io::empty())
        .unwrap();

    let evil_path = b"wrapper/../../escape.txt";
    let content: &[u8] = b"nope";
    let mut header = Header::new_gnu();
    {
        let gnu = header.as_gnu_mut().unwrap();
        gnu.name[..evil_path.len()].copy_from_slice(evil_path);
    }
    header.set_entry_type(EntryType::Regular);
    header.set_mode(0o644);
    header.set_size(content.len() as u64);
    header.set_cksum();
    builder.append(&header, Cursor::new(content)).unwrap();

    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_mode(0o644);
    header.set_size(4);
    header.set_cksum();
    builder
        .append_data(&mut header, "wrapper/safe.txt", Cursor::new(b"fine"))
        .unwrap();

    builder.into_inner().unwrap().finish().unwrap()
}

#[test]
fn traversal_paths_cannot_escape_the_destination() {
    let archive = hostile_targz();

    let parent = tempfile::tempdir().unwrap();
    let dest = parent.path().join("dest");
    fs::create_dir(&dest).unwrap();

    extract(Cursor::new(archive), &dest, "repo").unwrap();

    assert!(!parent.path().join("escape.txt").exists());
    assert_eq!(read(&dest.join("safe.txt")), "fine");
}

#[cfg(unix)]
#[test]
fn recorded_permission_modes_are_applied() {
    use std::os::unix::fs::PermissionsExt;

    let archive = targz(&[
        Fixture::dir("wrapper"),
        Fixture::executable("wrapper/run.sh", b"#!/bin/sh\n"),
    ]);

    let dest = tempfile::tempdir().unwrap();
    extract(Cursor::new(archive), dest.path(), "repo").unwrap();

    let mode = fs::metadata(dest.path().join("run.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}
