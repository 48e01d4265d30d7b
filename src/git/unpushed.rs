//! Commits that exist locally but not on the comparison ref.

use crate::error::GitError;

use super::GitOps;

/// List one-line summaries of commits on HEAD that `compare_ref` lacks.
pub fn list_unpushed(git: &dyn GitOps, compare_ref: &str) -> Result<Vec<String>, GitError> {
    git.log_range(compare_ref, "HEAD")
}
