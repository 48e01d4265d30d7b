//! Git operations via the system `git` binary.
//!
//! All operations use `std::process::Command` to shell out to `git`,
//! inheriting the user's existing git config, SSH agent, and credential store.

pub mod branch;
pub mod unpushed;

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

pub use branch::{BranchContext, DEFAULT_REMOTE, resolve};
pub use unpushed::list_unpushed;

/// The version-control operations gpit needs.
///
/// This abstraction allows mocking the git subprocess in tests.
#[cfg_attr(test, mockall::automock)]
pub trait GitOps {
    /// Name of the checked-out branch (born or unborn), or `None` on a
    /// detached HEAD.
    fn current_branch(&self) -> Result<Option<String>, GitError>;

    /// Upstream tracking ref of the current branch (e.g. `origin/main`).
    fn upstream_ref(&self) -> Result<Option<String>, GitError>;

    /// A single git config value (`git config --get <key>`), if set.
    fn config_value(&self, key: &str) -> Result<Option<String>, GitError>;

    /// The remote's symbolic HEAD (e.g. `origin/main`), if recorded locally.
    fn symbolic_default_ref(&self, remote: &str) -> Result<Option<String>, GitError>;

    /// Short names of all remote-tracking branches.
    fn list_remote_branches(&self) -> Result<Vec<String>, GitError>;

    /// One-line summaries of commits reachable from `to` but not `from`.
    fn log_range(&self, from: &str, to: &str) -> Result<Vec<String>, GitError>;

    fn stage_all(&self) -> Result<(), GitError>;

    fn list_staged_files(&self) -> Result<Vec<String>, GitError>;

    fn diff_staged(&self, path: &str) -> Result<String, GitError>;

    fn commit(&self, message: &str) -> Result<(), GitError>;

    /// `git push <remote> <refspec>`; the refspec may be `local:remote`.
    fn push(&self, remote: &str, refspec: &str) -> Result<(), GitError>;

    fn reset_soft(&self, reference: &str) -> Result<(), GitError>;
}

/// [`GitOps`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: Option<PathBuf>,
}

impl SystemGit {
    /// Run git in the process working directory.
    pub fn new() -> Self {
        Self { workdir: None }
    }

    /// Run git inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            workdir: Some(dir.as_ref().to_path_buf()),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run a git command and return its stdout, or a descriptive error.
    fn run_git(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        debug!("git {}", args.join(" "));

        let output = self
            .command(args)
            .output()
            .map_err(|e| GitError::SpawnFailed {
                operation: operation.to_string(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Like [`run_git`](Self::run_git), but a non-zero exit means "absent".
    ///
    /// Only a failure to launch git at all is an error.
    fn run_git_optional(&self, args: &[&str], operation: &str) -> Result<Option<String>, GitError> {
        match self.run_git(args, operation) {
            Ok(stdout) => {
                let value = stdout.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            Err(GitError::CommandFailed { stderr, .. }) => {
                debug!("git {} reported nothing: {}", operation, stderr);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(String::from)
        .collect()
}

fn nul_separated(stdout: &str) -> Vec<String> {
    stdout
        .split('\0')
        .filter(|path| !path.is_empty())
        .map(String::from)
        .collect()
}

impl GitOps for SystemGit {
    fn current_branch(&self) -> Result<Option<String>, GitError> {
        // symbolic-ref also names an unborn branch; it only fails when detached.
        if let Some(name) = self.run_git_optional(
            &["symbolic-ref", "--quiet", "--short", "HEAD"],
            "symbolic-ref HEAD",
        )? {
            return Ok(Some(name));
        }

        let name = self
            .run_git(&["rev-parse", "--abbrev-ref", "HEAD"], "rev-parse HEAD")?
            .trim()
            .to_string();

        // `--abbrev-ref` prints the literal "HEAD" when detached.
        if name.is_empty() || name == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(name))
        }
    }

    fn upstream_ref(&self) -> Result<Option<String>, GitError> {
        self.run_git_optional(
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{upstream}"],
            "resolve upstream",
        )
    }

    fn config_value(&self, key: &str) -> Result<Option<String>, GitError> {
        self.run_git_optional(&["config", "--get", key], "config --get")
    }

    fn symbolic_default_ref(&self, remote: &str) -> Result<Option<String>, GitError> {
        let head_ref = format!("refs/remotes/{}/HEAD", remote);
        self.run_git_optional(
            &["symbolic-ref", "--quiet", "--short", &head_ref],
            "symbolic-ref",
        )
    }

    fn list_remote_branches(&self) -> Result<Vec<String>, GitError> {
        let stdout = self.run_git(
            &["branch", "--remotes", "--format=%(refname:short)"],
            "list remote branches",
        )?;
        Ok(non_empty_lines(&stdout)
            .into_iter()
            .map(|line| line.trim().to_string())
            .collect())
    }

    fn log_range(&self, from: &str, to: &str) -> Result<Vec<String>, GitError> {
        let range = format!("{}..{}", from, to);
        let stdout = self.run_git(&["log", "--oneline", &range], "log")?;
        Ok(non_empty_lines(&stdout))
    }

    fn stage_all(&self) -> Result<(), GitError> {
        self.run_git(&["add", "--all"], "add").map(|_| ())
    }

    fn list_staged_files(&self) -> Result<Vec<String>, GitError> {
        // -z: paths come unquoted, NUL-terminated.
        let stdout = self.run_git(
            &["diff", "--cached", "--name-only", "-z"],
            "diff --cached --name-only",
        )?;
        Ok(nul_separated(&stdout))
    }

    fn diff_staged(&self, path: &str) -> Result<String, GitError> {
        self.run_git(
            &["diff", "--cached", "--no-color", "--", path],
            "diff --cached",
        )
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run_git(&["commit", "-m", message], "commit").map(|_| ())
    }

    fn push(&self, remote: &str, refspec: &str) -> Result<(), GitError> {
        self.run_git(&["push", remote, refspec], "push").map(|_| ())
    }

    fn reset_soft(&self, reference: &str) -> Result<(), GitError> {
        self.run_git(&["reset", "--soft", reference], "reset --soft")
            .map(|_| ())
    }
}
