//! Memory store client for the graph-memory tool endpoints.

use async_trait::async_trait;
use serde::Serialize;

use super::{MemoryStore, Properties};
use crate::error::{Error, Result};
use crate::http::error_for_status;

#[derive(Serialize)]
struct NodeRequest<'a> {
    label: &'a str,
    properties: Properties,
}

#[derive(Serialize)]
struct RelationshipRequest<'a> {
    start_node_label: &'a str,
    start_node_properties: Properties,
    end_node_label: &'a str,
    end_node_properties: Properties,
    relationship_type: &'a str,
}

/// `POST {base}/tools/neo4j_memory/{add_node,add_relationship}`.
pub struct HttpMemoryStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMemoryStore {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post<T: Serialize + Sync>(&self, tool: &str, body: &T) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/tools/neo4j_memory/{tool}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        error_for_status(response)
            .await
            .map_err(Error::StoreUnavailable)?;
        Ok(())
    }
}

#[async_trait]
impl MemoryStore for HttpMemoryStore {
    async fn add_node(&self, label: &str, properties: Properties) -> Result<()> {
        self.post("add_node", &NodeRequest { label, properties }).await
    }

    async fn add_relationship(
        &self,
        start_label: &str,
        start_key: Properties,
        end_label: &str,
        end_key: Properties,
        rel_type: &str,
    ) -> Result<()> {
        self.post(
            "add_relationship",
            &RelationshipRequest {
                start_node_label: start_label,
                start_node_properties: start_key,
                end_node_label: end_label,
                end_node_properties: end_key,
                relationship_type: rel_type,
            },
        )
        .await
    }
}
