//! Projection of the catalog into a nodes-and-links graph view.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use agora_store::CatalogStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: String,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkLink {
    pub source: String,
    pub target: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    pub nodes: Vec<NetworkNode>,
    pub links: Vec<NetworkLink>,
}

/// Build the graph view: one node per record grouped by first discipline,
/// one link per connection whose target is itself a node. Dangling
/// connections stay in the data but are excluded from the view.
pub fn network_data(store: &CatalogStore) -> NetworkData {
    let academics = store.academics();

    let nodes: Vec<NetworkNode> = academics
        .values()
        .map(|academic| NetworkNode {
            id: academic.name.clone(),
            group: academic
                .primary_discipline()
                .unwrap_or("Unknown")
                .to_string(),
        })
        .collect();

    let known: HashSet<&str> = academics.values().map(|a| a.name.as_str()).collect();

    let links: Vec<NetworkLink> = academics
        .values()
        .flat_map(|academic| {
            academic
                .connections
                .iter()
                .filter(|target| known.contains(target.as_str()))
                .map(|target| NetworkLink {
                    source: academic.name.clone(),
                    target: target.clone(),
                    value: 1,
                })
        })
        .collect();

    NetworkData { nodes, links }
}
