//! Prompt construction for AI-generated commit messages.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::commit::diff::DiffBundle;

/// Maximum length for sanitized diff text.
pub const MAX_DIFF_SANITIZED_LENGTH: usize = 30_000;

/// System message sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are an assistant, and you only reply with JSON.";

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("ANSI escape pattern is valid")
});

/// Build the user prompt for a commit message suggestion.
///
/// Embeds the sanitized diff bundle and spells out the JSON object the
/// model must return: `message`, `bullets` and `warnings`.
pub fn build_commit_prompt(bundle: &DiffBundle) -> String {
    let (sanitized_diff, truncated) = sanitize_diff(&bundle.render(), MAX_DIFF_SANITIZED_LENGTH);

    let truncation_note = if truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    format!(
        r#"I need a detailed and specific commit message for the following Git code changes.
The message should reflect the actual code modifications, improvements, or fixes made.
Provide the message in JSON format, with distinct sections for a summary message,
bullet points detailing specific changes, and any necessary warnings about the code,
such as potential issues or areas needing attention.

## Changes ({file_count} files)
{sanitized_diff}{truncation_note}

## Output Format
Respond with ONLY a JSON object of this shape:
{{
    "message": "A concise summary, specifically describing the key change or improvement. Must be 72 chars or less",
    "bullets": [
        "Specific detail about a particular code change, including file and function names if applicable",
        "Description of another specific change, noting how it affects the functionality or structure of the code"
    ],
    "warnings": [
        "Optional. Necessary warnings or notes of caution about specific parts of the changes"
    ]
}}

The response should be technically specific, aligning closely with the provided code changes,
and avoiding generic or placeholder text. Be concise and on-point, without excess information.
Use an empty array for "warnings" when there is nothing to flag."#,
        file_count = bundle.len(),
    )
}

/// Sanitize diff text for inclusion in an LLM prompt.
///
/// Removes control characters (except newlines and tabs) and ANSI escape
/// sequences, then truncates to `max_len` bytes on a char boundary.
/// Returns the text and whether it was truncated.
pub fn sanitize_diff(text: &str, max_len: usize) -> (String, bool) {
    let without_ansi = ANSI_ESCAPE.replace_all(text, "");

    let mut result: String = without_ansi
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    if result.len() <= max_len {
        return (result, false);
    }

    let mut end = max_len;
    while end > 0 && !result.is_char_boundary(end) {
        end -= 1;
    }
    result.truncate(end);
    (result, true)
}
