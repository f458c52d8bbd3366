//! Upsert semantics of the in-memory graph store.

use conductor_rs::memory::graph::InMemoryGraph;
use conductor_rs::memory::{MemoryStore, props};
use serde_json::json;

#[tokio::test]
async fn matching_key_merges_properties() {
    let graph = InMemoryGraph::new();
    graph
        .add_node("Task", props([("id", json!(1)), ("status", json!("Task created: x"))]))
        .await
        .unwrap();
    graph
        .add_node("Task", props([("id", json!(1)), ("status", json!("done"))]))
        .await
        .unwrap();

    let tasks = graph.nodes("Task");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].properties["status"], json!("done"));
}

#[tokio::test]
async fn same_key_under_another_label_is_a_different_node() {
    let graph = InMemoryGraph::new();
    graph.add_node("File", props([("path", json!("a.rs"))])).await.unwrap();
    graph
        .add_node("GeneratedFile", props([("path", json!("a.rs"))]))
        .await
        .unwrap();
    assert_eq!(graph.node_count(), 2);
}

#[tokio::test]
async fn nodes_without_key_properties_are_always_created() {
    let graph = InMemoryGraph::new();
    for _ in 0..2 {
        graph
            .add_node("Note", props([("content_preview", json!("same"))]))
            .await
            .unwrap();
    }
    assert_eq!(graph.nodes("Note").len(), 2);
}

#[tokio::test]
async fn relationship_creates_missing_endpoints_once() {
    let graph = InMemoryGraph::new();
    for _ in 0..3 {
        graph
            .add_relationship(
                "Task",
                props([("id", json!(9))]),
                "Commit",
                props([("sha", json!("abc"))]),
                "TRIGGERED_BY_COMMIT",
            )
            .await
            .unwrap();
    }

    assert_eq!(graph.node_count(), 2);
    let rels = graph.relationships();
    assert_eq!(rels.len(), 1);
    assert_eq!(rels[0].1, "TRIGGERED_BY_COMMIT");
    assert_eq!(rels[0].0.properties["id"], json!(9));
    assert_eq!(rels[0].2.properties["sha"], json!("abc"));
}

#[tokio::test]
async fn relationship_endpoints_attach_to_existing_nodes() {
    let graph = InMemoryGraph::new();
    graph
        .add_node(
            "Repository",
            props([
                ("name", json!("octo/widgets")),
                ("url", json!("https://github.com/octo/widgets.git")),
            ]),
        )
        .await
        .unwrap();
    graph.add_node("Task", props([("id", json!(1))])).await.unwrap();

    graph
        .add_relationship(
            "Task",
            props([("id", json!(1))]),
            "Repository",
            props([("url", json!("https://github.com/octo/widgets.git"))]),
            "RELATED_TO_REPO",
        )
        .await
        .unwrap();

    assert_eq!(graph.node_count(), 2);
    let (_, repo) = &graph.relationships_of("RELATED_TO_REPO")[0];
    assert_eq!(repo.properties["name"], json!("octo/widgets"));
}
