//! Memory store port: a labelled property graph with upsert semantics.
//!
//! Nodes are matched on their key properties (`id`, `name`, `path`, `url`,
//! `sha`). A write whose key matches an existing node of the same label
//! merges into it; anything else creates a new node. A node without key
//! properties is always created.

pub mod graph;
pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Node or relationship-endpoint properties.
pub type Properties = serde_json::Map<String, Value>;

/// Property names that identify a node.
pub const KEY_PROPERTIES: &[&str] = &["id", "name", "path", "url", "sha"];

/// The subset of `props` used to match an existing node.
pub fn key_properties(props: &Properties) -> Properties {
    props
        .iter()
        .filter(|(name, _)| KEY_PROPERTIES.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Build a [`Properties`] map from `(name, value)` pairs.
pub fn props<I, K, V>(pairs: I) -> Properties
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

/// Graph persistence for provenance. Failures surface as `Error::StoreUnavailable`.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn add_node(&self, label: &str, properties: Properties) -> Result<()>;

    /// Upsert both endpoints, then link them once.
    async fn add_relationship(
        &self,
        start_label: &str,
        start_key: Properties,
        end_label: &str,
        end_key: Properties,
        rel_type: &str,
    ) -> Result<()>;
}
