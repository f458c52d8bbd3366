//! Keyword and event-type classification. First matching rule wins.

use crate::model::{Classification, EventType};

const CODING_KEYWORDS: &[&str] = &["code", "implement", "fix"];
const DOCS_KEYWORDS: &[&str] = &["docs", "documentation"];

/// Classify a work item from its description and trigger event type.
///
/// 1. pull request or issue events are coding work;
/// 2. coding keywords in the description;
/// 3. docs keywords in the description;
/// 4. remaining pushes are coding work;
/// 5. everything else is general.
pub fn classify(description: &str, event_type: Option<&EventType>) -> Classification {
    if matches!(event_type, Some(EventType::PullRequest | EventType::Issues)) {
        return Classification::Coding;
    }

    let lowered = description.to_lowercase();
    if contains_any(&lowered, CODING_KEYWORDS) {
        return Classification::Coding;
    }
    if contains_any(&lowered, DOCS_KEYWORDS) {
        return Classification::Docs;
    }

    if matches!(event_type, Some(EventType::Push)) {
        return Classification::Coding;
    }
    Classification::General
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
