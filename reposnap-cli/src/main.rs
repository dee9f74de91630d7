// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! reposnap - open a remote git repository in your local editor, fast.
//!
//! # Examples
//!
//! ```bash
//! # Fetch a repository into a temp directory and open it
//! reposnap octocat/Hello-World
//!
//! # Paste a full URL, with a pinned ref
//! reposnap https://github.com/octocat/Hello-World/tree/v2.0
//!
//! # A specific file view
//! reposnap octocat/Hello-World/blob/main/README.md
//!
//! # Keep the tree around after the editor exits
//! reposnap --keep octocat/Hello-World
//!
//! # Extract into a directory of your choosing
//! reposnap -o ./hello octocat/Hello-World
//! ```

mod config;
mod editor;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use reposnap_core::{Query, QueryKind, Settings, resolve};
use reposnap_fetch::ClonePipeline;

use crate::editor::EditorCommand;

// ============================================================================
// CLI Definition
// ============================================================================

/// reposnap - the fastest way to open a remote git repository locally.
#[derive(Parser)]
#[command(name = "reposnap")]
#[command(about = "Fetch a remote git repository and open it in your editor")]
#[command(long_about = r"
Pass reposnap a repository shorthand, a hosting URL, or a reposnap://
link and it will fetch a tarball snapshot of that repository into a
temporary directory and open it in your editor. The directory is
deleted when the editor exits unless --keep or --out is given.
")]
#[command(version)]
pub struct Cli {
    /// Repository locator: `owner/repo`, a full URL, or a search term.
    pub locator: String,

    /// Config file (default is ~/.reposnap.json).
    #[arg(long)]
    pub config: Option<String>,

    /// Editor to open with: auto, code, subl, vim, or a command.
    /// `auto` tries $EDITOR, then code, subl, vim.
    #[arg(long, short, default_value = "auto")]
    pub editor: String,

    /// Branch/ref to use when the locator does not pin one.
    #[arg(long, short, default_value = "auto")]
    pub branch: String,

    /// Access token for private repositories.
    #[arg(long, short)]
    pub token: Option<String>,

    /// Don't delete the repository when the editor exits.
    #[arg(long)]
    pub keep: bool,

    /// Wait for the full download before opening the editor.
    #[arg(long, short)]
    pub wait: bool,

    /// Extract into this directory instead of a temp dir (implies --keep).
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Process exit codes.
#[derive(Debug, Clone, Copy)]
pub enum ExitCode {
    /// Everything ran to completion (partial errors included).
    Success = 0,
    /// The pipeline or its setup failed.
    Failure = 1,
}

// ============================================================================
// Entry point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(code) => process::exit(code as i32),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(ExitCode::Failure as i32);
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    let settings = config::load(cli)?;
    let query = resolve(&cli.locator, &settings);
    debug!(kind = %query.kind, src = %query.src, "Resolved locator");

    match query.kind {
        QueryKind::Search => {
            println!("https://{}/search?q={}", settings.github_domain, query.src);
            Ok(ExitCode::Success)
        }
        QueryKind::Clone => {
            bail!(
                "Could not make sense of {:?}; expected owner/repo, a hosting URL, or a search term",
                cli.locator
            );
        }
        _ => clone_and_open(cli, &settings, &query).await,
    }
}

// ============================================================================
// Clone & open
// ============================================================================

async fn clone_and_open(cli: &Cli, settings: &Settings, query: &Query) -> Result<ExitCode> {
    let destination = Destination::create(cli, query)?;
    info!(destination = %destination.path().display(), "Destination");

    let editor = editor::discover(settings.editor.as_deref());
    let pipeline = ClonePipeline::new(settings.clone())?;

    // Unless asked to wait, GUI editors open on the partially extracted
    // tree while the download is still running.
    let mut early_editor = None;
    if !settings.wait {
        if let Some(ed) = editor.as_ref().filter(|ed| !ed.needs_full_tree) {
            early_editor = Some(spawn_editor(ed.clone(), destination.path().to_path_buf()));
        }
    }

    let outcome = pipeline.execute(query, destination.path()).await;
    if !outcome.completed {
        // An editor may already be showing the destination; let it exit
        // before the temp directory is torn down underneath it.
        if let Some(handle) = early_editor.take() {
            await_editor(handle).await;
        }
        bail!("Failed to fetch {}", query.pretty());
    }

    if outcome.had_partial_errors {
        println!("Finished extracting {} (with some errors)", query.pretty());
    } else {
        println!("Finished extracting {}", query.pretty());
    }

    if query.kind == QueryKind::File && !query.params.file_path.is_empty() {
        println!(
            "File: {}",
            destination.path().join(&query.params.file_path).display()
        );
    }

    // Hand the tree to the user, then decide its fate.
    match (early_editor, editor) {
        (Some(handle), _) => handle.await??,
        (None, Some(ed)) => ed.open(destination.path()).await?,
        (None, None) => {
            // No editor anywhere: leave the tree in place and say where.
            println!("{}", destination.path().display());
            destination.persist();
            return Ok(ExitCode::Success);
        }
    }

    if cli.keep {
        println!("Kept at {}", destination.path().display());
        destination.persist();
    }

    Ok(ExitCode::Success)
}

fn spawn_editor(
    editor: EditorCommand,
    target: PathBuf,
) -> tokio::task::JoinHandle<Result<()>> {
    tokio::spawn(async move { editor.open(&target).await })
}

/// Waits for an already-launched editor to exit, logging rather than
/// propagating its failure: the clone outcome decides the exit code.
async fn await_editor(handle: tokio::task::JoinHandle<Result<()>>) {
    match handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Editor failed"),
        Err(e) => warn!(error = %e, "Editor task failed"),
    }
}

// ============================================================================
// Destination
// ============================================================================

/// Where the repository lands: a self-deleting temp dir by default, or
/// a caller-supplied directory that is never deleted.
enum Destination {
    Temp(tempfile::TempDir),
    Fixed(PathBuf),
}

impl Destination {
    fn create(cli: &Cli, query: &Query) -> Result<Self> {
        if let Some(out) = &cli.out {
            fs::create_dir_all(out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            return Ok(Self::Fixed(out.clone()));
        }

        let dir = tempfile::Builder::new()
            .prefix(&query.tempdir_prefix())
            .tempdir()
            .context("Failed to create temp directory")?;
        Ok(Self::Temp(dir))
    }

    fn path(&self) -> &Path {
        match self {
            Self::Temp(dir) => dir.path(),
            Self::Fixed(path) => path,
        }
    }

    /// Gives up ownership of a temp dir so it survives this process.
    fn persist(self) {
        if let Self::Temp(dir) = self {
            let _ = dir.keep();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn destination_outlives_an_already_launched_editor() {
        // Stand-in editor: linger briefly, then record whether its
        // target directory still exists.
        let dest = tempfile::tempdir().unwrap();
        let probe = tempfile::tempdir().unwrap();
        let marker = probe.path().join("target-was-alive");

        let editor = EditorCommand {
            program: PathBuf::from("/bin/sh"),
            args: vec![
                "-c".to_string(),
                format!(r#"sleep 0.2; [ -d "$0" ] && touch "{}""#, marker.display()),
            ],
            needs_full_tree: false,
        };

        let handle = spawn_editor(editor, dest.path().to_path_buf());
        await_editor(handle).await;
        drop(dest);

        assert!(marker.exists());
    }
}
