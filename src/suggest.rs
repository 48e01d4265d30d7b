//! The accept / regenerate / edit loop around a commit message suggestion.
//!
//! States: generate a suggestion, present it, then wait for a choice.
//! `1` accepts the suggestion, `3` accepts whatever the editor returns,
//! `2` discards it and generates again from the same diff. Any other input
//! re-prompts without a new request.

use std::io::Write;

use tracing::debug;

use crate::commit::diff::DiffBundle;
use crate::commit::message::{SuggestionResponse, generate};
use crate::editor::MessageEditor;
use crate::error::SessionError;
use crate::interact::Prompter;
use crate::llm::ChatClient;

const RULE: &str = "========================================";

/// A menu answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Accept,
    Regenerate,
    Edit,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Choice::Accept),
            "2" => Some(Choice::Regenerate),
            "3" => Some(Choice::Edit),
            _ => None,
        }
    }
}

/// How the final message was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Accepted,
    Edited,
}

/// The commit message the user settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalMessage {
    pub text: String,
    pub source: MessageSource,
    /// Number of suggestions requested, including the first.
    pub generations: usize,
}

/// Run the suggestion loop until the user accepts or edits a message.
///
/// Warnings are shown for the first suggestion (even when there are none)
/// and afterwards only for suggestions that carry warnings.
pub async fn negotiate(
    client: &dyn ChatClient,
    bundle: &DiffBundle,
    prompter: &mut dyn Prompter,
    editor: &dyn MessageEditor,
    out: &mut dyn Write,
) -> Result<FinalMessage, SessionError> {
    let mut generations = 0;

    loop {
        let suggestion = generate(client, bundle).await?;
        generations += 1;
        debug!("Suggestion #{}: {}", generations, suggestion.message);

        if generations == 1 || suggestion.has_warnings() {
            render_warnings(out, &suggestion)?;
        }

        let formatted = suggestion.format();
        writeln!(out, "\n{RULE}")?;
        writeln!(out, "Suggested commit message:")?;
        writeln!(out, "{formatted}")?;

        loop {
            writeln!(out, "\nChoose an action:")?;
            writeln!(out, "1) Use the current commit message")?;
            writeln!(out, "2) Generate a new commit message")?;
            writeln!(out, "3) Edit the current commit message")?;
            out.flush()?;

            let answer = prompter.ask("Your choice (1/2/3)")?;
            match Choice::parse(&answer) {
                Some(Choice::Accept) => {
                    return Ok(FinalMessage {
                        text: formatted,
                        source: MessageSource::Accepted,
                        generations,
                    });
                }
                Some(Choice::Regenerate) => break,
                Some(Choice::Edit) => {
                    let text = editor.edit(&formatted)?;
                    return Ok(FinalMessage {
                        text,
                        source: MessageSource::Edited,
                        generations,
                    });
                }
                None => writeln!(out, "Invalid choice. Please enter 1, 2, or 3.")?,
            }
        }
    }
}

fn render_warnings(out: &mut dyn Write, suggestion: &SuggestionResponse) -> std::io::Result<()> {
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Warnings:")?;
    if suggestion.warnings.is_empty() {
        writeln!(out, "No warnings.")?;
    } else {
        for warning in &suggestion.warnings {
            writeln!(out, "- {warning}")?;
        }
    }
    Ok(())
}
