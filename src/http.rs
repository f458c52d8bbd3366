//! Shared HTTP client construction for the remote collaborators.

use std::time::Duration;

use crate::error::{Error, Result};

/// Build a client with a request timeout. Timeouts on collaborator calls
/// are owned here, not by the engine.
pub fn client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(format!("conductor/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))
}

/// Turn a non-2xx response into a readable message.
pub(crate) async fn error_for_status(
    response: reqwest::Response,
) -> std::result::Result<reqwest::Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(format!("{status}: {}", body.trim()))
}
