//! Editor discovery and launch.
//!
//! Picks the editor to open the fetched repository with: the configured
//! preference first (flag, config file, or `$EDITOR`), then the
//! conventional fallbacks `code`, `subl`, `vim` in that order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, warn};

/// Fallback editors probed in order when no preference is configured.
const FALLBACK_EDITORS: [&str; 3] = ["code", "subl", "vim"];

/// A resolved editor invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    /// Absolute path to the editor binary.
    pub program: PathBuf,
    /// Extra arguments placed before the target path.
    pub args: Vec<String>,
    /// Terminal editors need the full tree on disk before launching.
    pub needs_full_tree: bool,
}

impl EditorCommand {
    fn for_named(name: &str, program: PathBuf) -> Self {
        // GUI editors detach immediately; ask them to block so the
        // caller knows when the user is done with the tree.
        let (args, needs_full_tree) = match name {
            "code" | "subl" => (vec!["-w".to_string()], false),
            "vim" | "vi" | "nvim" | "nano" | "hx" | "emacs" => (Vec::new(), true),
            _ => (Vec::new(), false),
        };
        Self {
            program,
            args,
            needs_full_tree,
        }
    }

    /// Spawns the editor on `target` and waits for it to exit.
    pub async fn open(&self, target: &Path) -> Result<()> {
        debug!(editor = %self.program.display(), target = %target.display(), "Opening editor");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(target)
            .status()
            .await
            .with_context(|| format!("Failed to launch {}", self.program.display()))?;

        if !status.success() {
            warn!(editor = %self.program.display(), status = %status, "Editor exited abnormally");
        }
        Ok(())
    }
}

/// Resolves the editor to use, or `None` when nothing is available.
pub fn discover(preference: Option<&str>) -> Option<EditorCommand> {
    if let Some(pref) = preference.filter(|p| !p.is_empty() && *p != "auto") {
        return locate(pref);
    }

    FALLBACK_EDITORS.iter().find_map(|name| locate(name))
}

/// Finds a named editor on the PATH (or takes an absolute path as-is).
fn locate(name: &str) -> Option<EditorCommand> {
    let path = Path::new(name);
    if path.is_absolute() {
        return path
            .exists()
            .then(|| EditorCommand::for_named(file_stem(name), path.to_path_buf()));
    }

    match which::which(name) {
        Ok(program) => Some(EditorCommand::for_named(name, program)),
        Err(_) => None,
    }
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}
