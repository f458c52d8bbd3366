//! Anthropic-backed generators.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use tracing::{Instrument, debug};

use super::{CodeGenerator, TextGenerator, anthropic_client};
use crate::config::secrets::SecretString;
use crate::error::{Error, Result};
use crate::telemetry::genai;

const PROVIDER: &str = "anthropic";
const MAX_TOKENS: u64 = 4096;

const CODE_PREAMBLE: &str = "You write complete, working source files. \
Reply with the file contents only: no explanations, no Markdown fences.";

const DOCS_PREAMBLE: &str = "You write clear technical documentation in Markdown \
for engineers joining a project.";

/// One model, used for both code and documentation.
pub struct AnthropicGenerator {
    client: rig::providers::anthropic::Client,
    model: String,
}

impl AnthropicGenerator {
    pub fn new(api_key: &SecretString, model: impl Into<String>) -> Result<Self> {
        let client = anthropic_client(api_key)
            .map_err(|e| Error::Config(format!("failed to create Anthropic client: {e}")))?;
        Ok(Self {
            client,
            model: model.into(),
        })
    }

    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String> {
        let span = genai::start_chat_span(&self.model, PROVIDER);
        let agent = self
            .client
            .agent(&self.model)
            .preamble(preamble)
            .max_tokens(MAX_TOKENS)
            .build();

        let response = async { agent.prompt(prompt).await }
            .instrument(span.clone())
            .await
            .map_err(|e| Error::GenerationFailed(e.to_string()))?;

        genai::record_response_length(&span, response.len());
        debug!(model = %self.model, chars = response.len(), "completion received");
        Ok(response)
    }
}

#[async_trait]
impl CodeGenerator for AnthropicGenerator {
    async fn generate(&self, description: &str, target_path: &str) -> Result<String> {
        let prompt = format!("Task: {description}\n\nWrite the complete contents of `{target_path}`.");
        let response = self.complete(CODE_PREAMBLE, &prompt).await?;
        let code = strip_code_fences(&response);
        if code.trim().is_empty() {
            return Err(Error::GenerationFailed("model returned an empty file".to_string()));
        }
        Ok(code)
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(DOCS_PREAMBLE, prompt).await
    }
}

/// Remove a surrounding Markdown code fence, if the model added one anyway.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return format!("{trimmed}\n");
    };
    // Drop the info string (```python).
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    format!("{}\n", body.trim_end())
}
