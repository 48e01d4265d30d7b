//! One gpit run from start to finish.
//!
//! Flow:
//! 1. Resolve the comparison branch.
//! 2. Offer to push commits that are already local but not on the remote.
//! 3. Stage and collect the working-tree diff; stop if there is none.
//! 4. Negotiate a commit message with the user.
//! 5. Commit and push.

use std::io::Write;

use tracing::{info, warn};

use crate::commit::diff::collect;
use crate::commit::executor::{PushTarget, finalize};
use crate::config::DeclinePolicy;
use crate::editor::MessageEditor;
use crate::error::{CommitError, SessionError};
use crate::git::{BranchContext, GitOps, list_unpushed, resolve};
use crate::interact::{Prompter, is_yes};
use crate::llm::ChatClient;
use crate::suggest::{FinalMessage, negotiate};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The working tree had no changes; nothing was committed.
    NothingToCommit,
    /// A commit was created, and pushed when `pushed_to` is set.
    Committed {
        message: FinalMessage,
        pushed_to: Option<PushTarget>,
    },
}

/// Everything a run talks to.
pub struct Session<'a> {
    pub git: &'a dyn GitOps,
    pub client: &'a dyn ChatClient,
    pub prompter: &'a mut dyn Prompter,
    pub editor: &'a dyn MessageEditor,
    pub out: &'a mut dyn Write,
    pub decline_policy: DeclinePolicy,
}

impl Session<'_> {
    pub async fn run(&mut self) -> Result<RunOutcome, SessionError> {
        writeln!(self.out, "Checking for unpushed commits...")?;
        let ctx = resolve(self.git);
        self.handle_unpushed(&ctx)?;

        writeln!(self.out, "Checking for local changes...")?;
        let bundle = collect(self.git)?;
        if bundle.is_empty() {
            writeln!(
                self.out,
                "No changes to commit. Your repository is up to date!"
            )?;
            return Ok(RunOutcome::NothingToCommit);
        }

        writeln!(self.out, "\nDetected changes ({} files):", bundle.len())?;
        write!(self.out, "{}", bundle.render())?;

        let message = negotiate(
            self.client,
            &bundle,
            &mut *self.prompter,
            self.editor,
            &mut *self.out,
        )
        .await?;

        let target = ctx.push_target();
        if target.is_none() {
            warn!("HEAD is detached; the commit will not be pushed");
        }

        finalize(self.git, &message.text, target.as_ref())?;

        let branch = ctx.current_branch.as_deref().unwrap_or("HEAD");
        writeln!(self.out, "\nChanges committed to {branch}.")?;
        if let Some(target) = &target {
            writeln!(
                self.out,
                "Changes pushed to {}/{}.",
                target.remote, target.remote_branch
            )?;
        }
        info!(
            "Committed after {} suggestion(s) ({:?})",
            message.generations, message.source
        );

        Ok(RunOutcome::Committed {
            message,
            pushed_to: target,
        })
    }

    /// List commits not yet on the remote and ask whether to push them.
    ///
    /// Any failure to list them is logged and the check is skipped.
    fn handle_unpushed(&mut self, ctx: &BranchContext) -> Result<(), SessionError> {
        let Some(compare_ref) = ctx.compare_ref.as_deref() else {
            writeln!(
                self.out,
                "Could not determine a remote branch to compare against; skipping unpushed commits check."
            )?;
            return Ok(());
        };

        let commits = match list_unpushed(self.git, compare_ref) {
            Ok(commits) => commits,
            Err(e) => {
                warn!("Could not list unpushed commits: {}", e);
                return Ok(());
            }
        };

        if commits.is_empty() {
            writeln!(self.out, "No unpushed commits.")?;
            return Ok(());
        }

        writeln!(self.out, "\nUnpushed commits (compared to {compare_ref}):")?;
        for commit in &commits {
            writeln!(self.out, "{commit}")?;
        }
        self.out.flush()?;

        let answer = self
            .prompter
            .ask("Do you want to push these commits? (yes/no)")?;

        // compare_ref is only known when the current branch is, so a target exists
        if is_yes(&answer)
            && let Some(target) = ctx.push_target()
        {
            self.git
                .push(&target.remote, &target.refspec())
                .map_err(|source| CommitError::PushFailed {
                    remote: target.remote.clone(),
                    branch: target.remote_branch.clone(),
                    source,
                })?;
            writeln!(
                self.out,
                "Unpushed commits pushed to {}/{}.",
                target.remote, target.remote_branch
            )?;
            return Ok(());
        }

        match self.decline_policy {
            DeclinePolicy::Keep => {
                writeln!(
                    self.out,
                    "Skipping push. The unpushed commits stay as they are."
                )?;
            }
            DeclinePolicy::SoftReset => {
                self.git.reset_soft(compare_ref)?;
                writeln!(
                    self.out,
                    "Soft-reset to {compare_ref}; those changes will be part of the new commit."
                )?;
            }
        }
        Ok(())
    }
}
