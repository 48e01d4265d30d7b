//! Final stage, commit and push.
//!
//! There is no rollback: if the push fails the local commit stays, which is
//! ordinary git behavior.

use tracing::warn;

use crate::error::CommitError;
use crate::git::GitOps;

/// Where the new commit is pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    pub remote: String,
    /// Local branch being pushed.
    pub branch: String,
    /// Branch updated on the remote.
    pub remote_branch: String,
}

impl PushTarget {
    /// `branch`, or `branch:remote_branch` when the names differ.
    pub fn refspec(&self) -> String {
        if self.branch == self.remote_branch {
            self.branch.clone()
        } else {
            format!("{}:{}", self.branch, self.remote_branch)
        }
    }
}

/// Stage everything, commit with `message` verbatim, then push.
///
/// Steps:
/// 1. `git add --all` - re-stage (a failure here is logged, not fatal)
/// 2. `git commit -m <message>`
/// 3. `git push <remote> <refspec>` when a target is given
pub fn finalize(
    git: &dyn GitOps,
    message: &str,
    target: Option<&PushTarget>,
) -> Result<(), CommitError> {
    if message.trim().is_empty() {
        return Err(CommitError::EmptyMessage);
    }

    if let Err(e) = git.stage_all() {
        warn!("Re-staging before commit failed: {}", e);
    }

    git.commit(message).map_err(CommitError::CommitFailed)?;

    if let Some(target) = target {
        git.push(&target.remote, &target.refspec())
            .map_err(|source| CommitError::PushFailed {
                remote: target.remote.clone(),
                branch: target.remote_branch.clone(),
                source,
            })?;
    }

    Ok(())
}
