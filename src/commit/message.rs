//! Commit message suggestions: parsing, formatting and generation.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::commit::diff::DiffBundle;
use crate::commit::prompt::{SYSTEM_PROMPT, build_commit_prompt};
use crate::error::LlmError;
use crate::llm::{ChatClient, extract_json_object};

/// Summary used when the model's reply cannot be read as a suggestion.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse response";

/// A structured commit message suggestion from the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionResponse {
    pub message: String,
    pub bullets: Vec<String>,
    pub warnings: Vec<String>,
}

/// Wire shape of the model's JSON; every field may be missing or null.
#[derive(Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    bullets: Option<Vec<String>>,
    #[serde(default)]
    warnings: Option<Vec<String>>,
}

impl SuggestionResponse {
    /// The sentinel returned for a malformed model reply.
    pub fn parse_failure() -> Self {
        Self {
            message: PARSE_FAILURE_MESSAGE.to_string(),
            bullets: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Format the suggestion as the commit message text.
    ///
    /// Produces:
    /// ```text
    /// Summary line
    ///
    /// - first bullet
    /// - second bullet
    /// ```
    /// With no bullets the result still ends in the blank separator line.
    pub fn format(&self) -> String {
        let bullets = self
            .bullets
            .iter()
            .map(|bullet| format!("- {bullet}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\n{}", self.message, bullets)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Parse the model's reply text into a suggestion.
///
/// Never fails: anything that is not a JSON object with a string `message`
/// and string arrays for `bullets`/`warnings` becomes the parse-failure
/// sentinel. A missing `message` also takes the sentinel text.
pub fn parse_suggestion(response: &str) -> SuggestionResponse {
    let Some(object) = extract_json_object(response) else {
        debug!("No JSON object in model reply: {}", truncate(response));
        return SuggestionResponse::parse_failure();
    };

    match serde_json::from_value::<RawSuggestion>(Value::Object(object)) {
        Ok(raw) => SuggestionResponse {
            message: raw
                .message
                .unwrap_or_else(|| PARSE_FAILURE_MESSAGE.to_string()),
            bullets: raw.bullets.unwrap_or_default(),
            warnings: raw.warnings.unwrap_or_default(),
        },
        Err(e) => {
            debug!("Model reply has an unexpected shape: {}", e);
            SuggestionResponse::parse_failure()
        }
    }
}

/// Ask the model for a commit message suggestion for `bundle`.
///
/// A malformed reply yields the parse-failure sentinel; transport and API
/// errors are returned to the caller.
pub async fn generate(
    client: &dyn ChatClient,
    bundle: &DiffBundle,
) -> Result<SuggestionResponse, LlmError> {
    let prompt = build_commit_prompt(bundle);
    debug!("Commit prompt length: {} chars", prompt.len());

    let reply = client.complete(SYSTEM_PROMPT, &prompt, true).await?;
    Ok(parse_suggestion(&reply))
}

fn truncate(text: &str) -> String {
    text.chars().take(200).collect()
}
