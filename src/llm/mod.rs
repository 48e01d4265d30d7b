//! Chat-completion client and model-output helpers.

pub mod json;
pub mod openai;

pub use json::extract_json_object;
pub use openai::{ChatClient, OpenAiClient};
