use tracing::{info, warn};

use crate::engine::ports::Ports;
use crate::error::Result;
use crate::llm::placeholder::PLACEHOLDER_DOCUMENT;
use crate::model::WorkItem;

/// Prompt sent to the text generator for a docs run.
pub fn docs_prompt(item: &WorkItem) -> String {
    let mut prompt = format!("**Task:** {}\n", item.description);
    if let Some(event) = &item.source_event {
        prompt.push_str(&format!("**Repository:** {}\n", event.repo_name_or_unknown()));
        if !event.changed_files.is_empty() {
            prompt.push_str("**Changed files:**\n");
            for path in &event.changed_files {
                prompt.push_str(&format!("- {path}\n"));
            }
        }
    }
    prompt.push_str(
        "\nWrite documentation for this task in Markdown. \
It should help a new team member understand what changed and why.\n",
    );
    prompt
}

/// Generate documentation. Falls back to the placeholder document; never fails.
pub async fn docs(mut item: WorkItem, ports: &Ports) -> Result<WorkItem> {
    let documentation = match ports.writer.generate(&docs_prompt(&item)).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("text generator returned nothing, using placeholder");
            PLACEHOLDER_DOCUMENT.to_string()
        }
        Err(e) => {
            warn!(error = %e, "documentation generation failed, using placeholder");
            PLACEHOLDER_DOCUMENT.to_string()
        }
    };

    info!(chars = documentation.len(), "documentation generated");
    item.documentation = Some(documentation);
    item.status_message = "Documentation generated by docs handler".to_string();
    Ok(item)
}
