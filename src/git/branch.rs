//! Comparison-branch resolution.
//!
//! Works out which remote ref local work should be compared against:
//! the current branch's upstream if it has one, else the remote's default
//! branch. Every failure degrades to "unknown" so the caller can skip the
//! unpushed-commit check instead of aborting.

use tracing::{debug, warn};

use super::GitOps;
use crate::commit::executor::PushTarget;

/// Remote assumed when no upstream names one.
pub const DEFAULT_REMOTE: &str = "origin";

/// Default-branch names tried, in order, when the remote HEAD is unknown.
const PREFERRED_DEFAULT_BRANCHES: [&str; 2] = ["main", "master"];

/// What the current branch should be compared against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchContext {
    pub current_branch: Option<String>,
    pub upstream_ref: Option<String>,
    /// Remote of the upstream (`branch.<name>.remote`).
    pub upstream_remote: Option<String>,
    /// Branch name on that remote (`branch.<name>.merge` without `refs/heads/`).
    pub upstream_branch: Option<String>,
    pub default_branch: Option<String>,
    /// `None` means unknown: skip the unpushed-commit check.
    pub compare_ref: Option<String>,
}

impl BranchContext {
    /// Remote to push to: the upstream's remote, else `origin`.
    pub fn remote(&self) -> &str {
        self.upstream_remote.as_deref().unwrap_or(DEFAULT_REMOTE)
    }

    /// Where the current branch is pushed, or `None` on a detached HEAD.
    ///
    /// A tracked branch pushes to its upstream branch even when the local
    /// name differs.
    pub fn push_target(&self) -> Option<PushTarget> {
        let branch = self.current_branch.as_ref()?;
        Some(PushTarget {
            remote: self.remote().to_string(),
            branch: branch.clone(),
            remote_branch: self
                .upstream_branch
                .clone()
                .unwrap_or_else(|| branch.clone()),
        })
    }
}

/// Resolve the branch context for the current repository.
///
/// Resolution order for `compare_ref`:
/// 1. the upstream tracking ref of the current branch
/// 2. `origin/<default>` from the remote's symbolic HEAD
/// 3. `origin/main` or `origin/master` if either exists remotely
/// 4. unknown
pub fn resolve(git: &dyn GitOps) -> BranchContext {
    let current_branch = match git.current_branch() {
        Ok(Some(branch)) => branch,
        Ok(None) => {
            warn!("HEAD is detached; skipping unpushed commits check");
            return BranchContext::default();
        }
        Err(e) => {
            warn!(
                "Could not determine the current branch ({}); skipping unpushed commits check",
                e
            );
            return BranchContext::default();
        }
    };

    // A missing upstream is a normal state, not an error.
    let upstream_ref = match git.upstream_ref() {
        Ok(upstream) => upstream,
        Err(e) => {
            warn!("Could not read upstream of '{}': {}", current_branch, e);
            None
        }
    };

    if let Some(upstream) = upstream_ref.clone() {
        debug!("Comparing against upstream {}", upstream);
        let (upstream_remote, upstream_branch) = upstream_parts(git, &current_branch, &upstream);
        return BranchContext {
            current_branch: Some(current_branch),
            upstream_ref,
            upstream_remote: Some(upstream_remote),
            upstream_branch: Some(upstream_branch),
            default_branch: None,
            compare_ref: Some(upstream),
        };
    }

    debug!(
        "Branch '{}' has no upstream; looking for the remote default branch",
        current_branch
    );

    let default_branch = discover_default_branch(git);
    let compare_ref = default_branch
        .as_ref()
        .map(|branch| format!("{}/{}", DEFAULT_REMOTE, branch));

    if compare_ref.is_none() {
        warn!(
            "Branch '{}' has no upstream and no default branch was found on '{}'; skipping unpushed commits check",
            current_branch, DEFAULT_REMOTE
        );
    }

    BranchContext {
        current_branch: Some(current_branch),
        default_branch,
        compare_ref,
        ..BranchContext::default()
    }
}

/// Remote and remote branch name behind `upstream` (e.g. `origin/main`).
///
/// Read from the branch config, which is exact even for remote names that
/// contain `/`; the short ref is split at its first `/` as a fallback.
fn upstream_parts(git: &dyn GitOps, branch: &str, upstream: &str) -> (String, String) {
    let config = |key: String| match git.config_value(&key) {
        Ok(value) => value,
        Err(e) => {
            debug!("Could not read {}: {}", key, e);
            None
        }
    };

    let remote = config(format!("branch.{}.remote", branch));
    let merge = config(format!("branch.{}.merge", branch))
        .map(|merge| merge.trim_start_matches("refs/heads/").to_string());

    let (split_remote, split_branch) = match upstream.split_once('/') {
        Some((remote, branch)) if !remote.is_empty() && !branch.is_empty() => {
            (remote.to_string(), branch.to_string())
        }
        _ => (DEFAULT_REMOTE.to_string(), branch.to_string()),
    };

    (
        remote.unwrap_or(split_remote),
        merge.unwrap_or(split_branch),
    )
}

/// Find the remote's default branch name (without the remote prefix).
fn discover_default_branch(git: &dyn GitOps) -> Option<String> {
    let prefix = format!("{}/", DEFAULT_REMOTE);

    match git.symbolic_default_ref(DEFAULT_REMOTE) {
        Ok(Some(head)) => {
            if let Some(branch) = head.strip_prefix(&prefix).filter(|b| !b.is_empty()) {
                return Some(branch.to_string());
            }
            debug!("Ignoring unexpected remote HEAD '{}'", head);
        }
        Ok(None) => {}
        Err(e) => debug!("Could not read {} HEAD: {}", DEFAULT_REMOTE, e),
    }

    let remote_branches = match git.list_remote_branches() {
        Ok(branches) => branches,
        Err(e) => {
            warn!("Could not list remote branches: {}", e);
            return None;
        }
    };

    PREFERRED_DEFAULT_BRANCHES
        .iter()
        .find(|candidate| {
            let full = format!("{}{}", prefix, candidate);
            remote_branches.iter().any(|b| *b == full)
        })
        .map(|candidate| candidate.to_string())
}
