//! gpit - commit and push with an AI-suggested commit message.
//!
//! # Overview
//!
//! gpit checks for commits that have not reached the remote yet, stages the
//! working tree, asks an OpenAI chat model to summarise the staged diff as a
//! commit message, lets the user accept, regenerate or edit that message,
//! and finally commits and pushes.
//!
//! Git is driven through the `git` binary ([`git::SystemGit`]); every other
//! collaborator sits behind a trait so the session can run against fakes.

pub mod commit;
pub mod config;
pub mod editor;
pub mod error;
pub mod git;
pub mod interact;
pub mod llm;
pub mod session;
pub mod suggest;

// Re-export commonly used types
pub use commit::{DiffBundle, DiffEntry, PushTarget, SuggestionResponse};
pub use config::{Config, DeclinePolicy};
pub use error::{
    CommitError, ConfigError, EditorError, GitError, LlmError, PromptError, SessionError,
};
pub use git::{BranchContext, GitOps, SystemGit};
pub use session::{RunOutcome, Session};
pub use suggest::{FinalMessage, MessageSource};
