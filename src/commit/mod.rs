//! AI-suggested commit messages: diff collection, prompting, commit and push.

pub mod diff;
pub mod executor;
pub mod message;
pub mod prompt;

pub use diff::{DiffBundle, DiffEntry, collect};
pub use executor::{PushTarget, finalize};
pub use message::{PARSE_FAILURE_MESSAGE, SuggestionResponse, generate, parse_suggestion};
pub use prompt::build_commit_prompt;
