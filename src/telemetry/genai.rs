//! GenAI semantic convention span helpers for model calls.
//!
//! Uses OpenTelemetry GenAI semantic conventions:
//! - `gen_ai.operation.name`
//! - `gen_ai.request.model`
//! - `gen_ai.provider.name`
//! - `gen_ai.response.length`

use tracing::Span;

/// Start a span for a chat/completion operation.
///
/// The response length is declared empty and filled via
/// [`record_response_length`] once the call returns.
pub fn start_chat_span(model: &str, provider: &str) -> Span {
    tracing::info_span!(
        "gen_ai.chat",
        "gen_ai.operation.name" = "chat",
        "gen_ai.request.model" = model,
        "gen_ai.provider.name" = provider,
        "gen_ai.response.length" = tracing::field::Empty,
    )
}

pub fn record_response_length(span: &Span, chars: usize) {
    span.record("gen_ai.response.length", chars as u64);
}
