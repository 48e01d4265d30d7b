//! Runtime configuration, read once at startup.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Model used when neither `--model` nor `OPENAI_MODEL` is given.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Base URL of the OpenAI REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Editor launched when neither `VISUAL` nor `EDITOR` is set.
pub const DEFAULT_EDITOR: &str = "nano";

/// Default timeout for a chat-completion request.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
const MODEL_ENV_VAR: &str = "OPENAI_MODEL";
const BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";
const TIMEOUT_ENV_VAR: &str = "GPIT_OPENAI_TIMEOUT";
const DECLINE_ENV_VAR: &str = "GPIT_ON_DECLINE";

/// What to do with unpushed commits the user chose not to push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclinePolicy {
    /// Leave them in place and continue.
    #[default]
    Keep,
    /// `git reset --soft <compare_ref>` so their changes join the new commit.
    SoftReset,
}

/// Settings for one gpit run.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub editor: String,
    pub decline_policy: DeclinePolicy,
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub reset_on_decline: bool,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env(overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let api_key = non_empty_var(API_KEY_ENV_VAR).ok_or(ConfigError::MissingApiKey)?;

        let model = overrides
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| non_empty_var(MODEL_ENV_VAR))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = non_empty_var(BASE_URL_ENV_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let decline_policy = if overrides.reset_on_decline {
            DeclinePolicy::SoftReset
        } else {
            decline_policy_from_env()
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: get_timeout(),
            editor: get_editor(),
            decline_policy,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get the configured request timeout.
///
/// Reads `GPIT_OPENAI_TIMEOUT` (seconds) if set; an invalid value logs a
/// warning and falls back to the default.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

fn get_editor() -> String {
    non_empty_var("VISUAL")
        .or_else(|| non_empty_var("EDITOR"))
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

fn decline_policy_from_env() -> DeclinePolicy {
    match env::var(DECLINE_ENV_VAR) {
        Ok(v) if v.eq_ignore_ascii_case("reset") => DeclinePolicy::SoftReset,
        Ok(v) if v.is_empty() || v.eq_ignore_ascii_case("keep") => DeclinePolicy::Keep,
        Ok(v) => {
            warn!("Unknown {} value '{}', keeping unpushed commits", DECLINE_ENV_VAR, v);
            DeclinePolicy::Keep
        }
        Err(_) => DeclinePolicy::Keep,
    }
}
