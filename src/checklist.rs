//! Demo checklist generation.
//!
//! The remote tool server renders the checklist; [`render_checklist`] is the
//! same template rendered locally, used directly in local mode and as the
//! fallback when the remote call fails.

use async_trait::async_trait;
use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::http::error_for_status;

#[async_trait]
pub trait ChecklistGenerator: Send + Sync {
    async fn checklist(&self, description: &str, changes: &[String]) -> Result<String>;
}

/// Render the fixed four-section checklist.
pub fn render_checklist(description: &str, changes: &[String]) -> String {
    let mut out = format!("## Demo Checklist: {description}\n\n");
    out.push_str("### 1. Introduction\n");
    out.push_str("- [ ] Briefly explain the task and its goal.\n");
    out.push_str("- [ ] Mention the key changes that were made.\n\n");
    out.push_str("### 2. Code Walkthrough\n");
    for change in changes {
        let _ = writeln!(out, "- [ ] Explain the changes in `{change}`.");
    }
    out.push('\n');
    out.push_str("### 3. Demonstration\n");
    out.push_str("- [ ] Show the new feature or bug fix in action.\n");
    out.push_str("- [ ] If applicable, show the updated documentation.\n\n");
    out.push_str("### 4. Conclusion\n");
    out.push_str("- [ ] Summarize the work that was done.\n");
    out.push_str("- [ ] Mention any next steps.\n");
    out
}

/// Local rendering, no I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateChecklist;

#[async_trait]
impl ChecklistGenerator for TemplateChecklist {
    async fn checklist(&self, description: &str, changes: &[String]) -> Result<String> {
        Ok(render_checklist(description, changes))
    }
}

/// `POST {base}/tools/loom_helper/generate_demo_checklist`.
pub struct HttpChecklist {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChecklist {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChecklistGenerator for HttpChecklist {
    async fn checklist(&self, description: &str, changes: &[String]) -> Result<String> {
        let response = self
            .client
            .post(format!(
                "{}/tools/loom_helper/generate_demo_checklist",
                self.base_url
            ))
            .json(&serde_json::json!({
                "task_description": description,
                "code_changes": changes,
            }))
            .send()
            .await
            .map_err(|e| Error::Other(format!("checklist request failed: {e}")))?;
        let body: serde_json::Value = error_for_status(response)
            .await
            .map_err(|e| Error::Other(format!("checklist request failed: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Other(format!("checklist response unreadable: {e}")))?;
        // The tool answers with a bare JSON string.
        match body {
            serde_json::Value::String(text) => Ok(text),
            other => Err(Error::Other(format!(
                "unexpected checklist response: {other}"
            ))),
        }
    }
}
