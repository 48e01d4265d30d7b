//! Diff collection from the index.
//!
//! Stages the whole working tree, then gathers one unified diff per staged
//! file in the order git reports them.

use std::fmt;

use tracing::{debug, warn};

use crate::error::GitError;
use crate::git::GitOps;

/// The staged diff of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub path: String,
    pub diff: String,
}

/// Ordered per-file diffs of everything staged for the next commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffBundle {
    entries: Vec<DiffEntry>,
}

impl DiffBundle {
    pub fn new(entries: Vec<DiffEntry>) -> Self {
        Self { entries }
    }

    /// An empty bundle means there is nothing to commit.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Render every entry under an underlined file-path header.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push('\n');
            out.push_str(&entry.path);
            out.push('\n');
            out.push_str(&"-".repeat(entry.path.chars().count()));
            out.push('\n');
            out.push_str(&entry.diff);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for DiffBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Stage all changes and collect the per-file staged diff.
///
/// A staging failure is logged and collection continues with whatever is
/// already staged; listing or diffing failures are returned.
pub fn collect(git: &dyn GitOps) -> Result<DiffBundle, GitError> {
    if let Err(e) = git.stage_all() {
        warn!("Could not stage changes ({}); using what is already staged", e);
    }

    let files = git.list_staged_files()?;
    debug!("{} staged file(s)", files.len());

    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        let diff = git.diff_staged(&path)?;
        entries.push(DiffEntry { path, diff });
    }

    Ok(DiffBundle::new(entries))
}
