//! In-process property graph with the same upsert rules as the remote store.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{MemoryStore, Properties, key_properties};
use crate::error::{Error, Result};

/// A stored node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub label: String,
    pub properties: Properties,
}

/// A stored relationship between two node indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub start: usize,
    pub end: usize,
    pub rel_type: String,
}

#[derive(Default)]
struct Inner {
    nodes: Vec<GraphNode>,
    relationships: Vec<Relationship>,
}

impl Inner {
    /// Merge `properties` into the matching node, or create one. Returns its index.
    ///
    /// Relationship endpoints without key properties match on every property
    /// they carry.
    fn upsert(&mut self, label: &str, properties: Properties, endpoint: bool) -> usize {
        let mut key = key_properties(&properties);
        if key.is_empty() && endpoint {
            key = properties.clone();
        }
        if !key.is_empty() {
            let found = self.nodes.iter().position(|node| {
                node.label == label
                    && key
                        .iter()
                        .all(|(name, value)| node.properties.get(name) == Some(value))
            });
            if let Some(index) = found {
                self.nodes[index].properties.extend(properties);
                return index;
            }
        }
        self.nodes.push(GraphNode {
            label: label.to_string(),
            properties,
        });
        self.nodes.len() - 1
    }
}

/// Graph store for local runs and tests.
#[derive(Default)]
pub struct InMemoryGraph {
    inner: Mutex<Inner>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::StoreUnavailable("graph lock poisoned".to_string()))
    }

    /// All nodes carrying `label`, in insertion order.
    pub fn nodes(&self, label: &str) -> Vec<GraphNode> {
        match self.lock() {
            Ok(inner) => inner
                .nodes
                .iter()
                .filter(|node| node.label == label)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.lock().map(|inner| inner.nodes.len()).unwrap_or(0)
    }

    /// Relationships as `(start, rel_type, end)` node triples.
    pub fn relationships(&self) -> Vec<(GraphNode, String, GraphNode)> {
        match self.lock() {
            Ok(inner) => inner
                .relationships
                .iter()
                .map(|rel| {
                    (
                        inner.nodes[rel.start].clone(),
                        rel.rel_type.clone(),
                        inner.nodes[rel.end].clone(),
                    )
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Relationships of type `rel_type`.
    pub fn relationships_of(&self, rel_type: &str) -> Vec<(GraphNode, GraphNode)> {
        self.relationships()
            .into_iter()
            .filter(|(_, kind, _)| kind == rel_type)
            .map(|(start, _, end)| (start, end))
            .collect()
    }
}

#[async_trait]
impl MemoryStore for InMemoryGraph {
    async fn add_node(&self, label: &str, properties: Properties) -> Result<()> {
        self.lock()?.upsert(label, properties, false);
        Ok(())
    }

    async fn add_relationship(
        &self,
        start_label: &str,
        start_key: Properties,
        end_label: &str,
        end_key: Properties,
        rel_type: &str,
    ) -> Result<()> {
        let mut inner = self.lock()?;
        let start = inner.upsert(start_label, start_key, true);
        let end = inner.upsert(end_label, end_key, true);
        let relationship = Relationship {
            start,
            end,
            rel_type: rel_type.to_string(),
        };
        if !inner.relationships.contains(&relationship) {
            inner.relationships.push(relationship);
        }
        Ok(())
    }
}
