//! Error types for gpit modules using thiserror.

use thiserror::Error;

/// Errors from invoking the `git` binary.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },
}

/// Errors from the chat-completion endpoint.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request to the chat-completion API failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Chat-completion API timed out after {0} seconds")]
    Timeout(u64),

    #[error("Chat-completion API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Chat-completion API returned an unreadable body: {0}")]
    InvalidBody(String),

    #[error("Chat-completion API returned no choices")]
    EmptyResponse,
}

/// Errors from the external editor round-trip.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Editor '{0}' was not found on PATH")]
    NotFound(String),

    #[error("Failed to prepare the temporary message file: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("Failed to launch editor '{editor}': {source}")]
    SpawnFailed {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Editor '{editor}' exited with {}", code.map_or("a signal".to_string(), |c| format!("code {c}")))]
    NonZeroExit { editor: String, code: Option<i32> },
}

/// Errors from reading interactive input.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to read input: {0}")]
    Input(String),

    #[error("Input closed before a choice was made")]
    Closed,
}

/// Errors from assembling the runtime configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set. Export it or add it to a .env file.")]
    MissingApiKey,
}

/// Errors from committing and pushing.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Refusing to commit an empty message")]
    EmptyMessage,

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] GitError),

    #[error("Failed to push {remote}/{branch} (the local commit was kept): {source}")]
    PushFailed {
        remote: String,
        branch: String,
        #[source]
        source: GitError,
    },
}

/// Errors that end a gpit run.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Could not generate a commit message: {0}")]
    Llm(#[from] LlmError),

    #[error("Could not edit the commit message: {0}")]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl SessionError {
    /// Process exit code for this error: 2 for configuration, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionError::Config(_) => 2,
            _ => 1,
        }
    }
}
