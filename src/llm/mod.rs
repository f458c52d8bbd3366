//! Generation capabilities: source code for the coding handler, prose for
//! the docs handler.
//!
//! The real provider is Anthropic via rig-core ([`anthropic::AnthropicGenerator`]).
//! When no API key is configured the engine is wired with the
//! [`placeholder`] implementations instead.
//!
//! # Example
//! ```no_run
//! use conductor_rs::llm::anthropic_client;
//! use secrecy::SecretString;
//! use rig::client::CompletionClient;
//!
//! let key = SecretString::from("sk-ant-...");
//! let client = anthropic_client(&key).expect("failed to create Anthropic client");
//! let agent = client.agent("claude-sonnet-4-20250514").max_tokens(1024).build();
//! ```

pub mod anthropic;
pub mod placeholder;

use async_trait::async_trait;

use crate::config::secrets::{ExposeSecret, SecretString};
use crate::error::Result;

/// Produces the full contents of one source file.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Failures are `Error::GenerationFailed`.
    async fn generate(&self, description: &str, target_path: &str) -> Result<String>;
}

/// Produces free-form text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Create an Anthropic client from a secret API key.
///
/// # Errors
/// Returns an error if the underlying HTTP client cannot be constructed.
pub fn anthropic_client(
    api_key: &SecretString,
) -> std::result::Result<rig::providers::anthropic::Client, rig::http_client::Error> {
    rig::providers::anthropic::Client::new(api_key.expose_secret())
}
