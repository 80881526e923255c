//! Candidate reconciliation.
//!
//! `add_or_update` is a two-step transaction: (1) merge the candidate into
//! its own record and persist, (2) a bounded one-hop fixup that makes
//! every resolved connection symmetric. The fixup never recurses into the
//! records it touches, so a merge can cascade at most one hop.

use serde::Serialize;
use tracing::info;

use agora_common::{
    normalized_key, Academic, AgoraError, EventRecord, NoveltyTile, Paper,
};
use agora_store::CatalogStore;

/// What an `add_or_update` actually did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    pub key: String,
    pub created: bool,
    /// Names of existing records that received a reciprocal edge.
    pub reciprocal_links: Vec<String>,
}

/// Merge a candidate record into the store. Fails only when the candidate
/// has no name. The store is durable again before this returns.
pub fn add_or_update(
    store: &mut CatalogStore,
    candidate: Academic,
) -> Result<MergeReport, AgoraError> {
    if candidate.name.trim().is_empty() {
        return Err(AgoraError::Validation(
            "candidate record has no name".into(),
        ));
    }

    let candidate = scrub(candidate);
    let key = candidate.key();

    let created = match store.get_mut(&key) {
        Some(existing) => {
            merge_into(existing, &candidate);
            false
        }
        None => {
            store.put(candidate.clone());
            true
        }
    };
    store.persist_academics()?;

    if created {
        store.add_tile(NoveltyTile::academic_added(&candidate.name))?;
        info!(%key, "academic added to catalog");
    } else {
        info!(%key, "academic merged into existing record");
    }

    let reciprocal_links = propagate_reciprocal(store, &key, &candidate)?;

    Ok(MergeReport {
        key,
        created,
        reciprocal_links,
    })
}

/// One-hop symmetric-edge fixup: every connection that resolves to an
/// existing record gains a back-edge to the candidate if it lacks one.
fn propagate_reciprocal(
    store: &mut CatalogStore,
    key: &str,
    candidate: &Academic,
) -> Result<Vec<String>, AgoraError> {
    let mut touched = Vec::new();
    for connection in &candidate.connections {
        let connection_key = normalized_key(connection);
        if connection_key == key {
            continue;
        }
        let Some(other) = store.get_mut(&connection_key) else {
            // Dangling reference: tolerated, simply not propagated.
            continue;
        };
        if !other.connections.iter().any(|name| name == &candidate.name) {
            other.connections.push(candidate.name.clone());
            touched.push(other.name.clone());
        }
    }

    if !touched.is_empty() {
        store.persist_academics()?;
        for name in &touched {
            store.add_tile(NoveltyTile::connection_added(&candidate.name, name))?;
            info!(from = %candidate.name, to = name.as_str(), "reciprocal connection added");
        }
    }
    Ok(touched)
}

/// Normalize a candidate before merging: trimmed name, zero years
/// treated as unknown.
fn scrub(mut candidate: Academic) -> Academic {
    candidate.name = candidate.name.trim().to_string();
    for paper in &mut candidate.papers {
        paper.year = paper.year.filter(|y| *y != 0);
    }
    for event in &mut candidate.events {
        event.year = event.year.filter(|y| *y != 0);
    }
    candidate
}

fn merge_into(existing: &mut Academic, candidate: &Academic) {
    // bio: wholesale replacement, only for a non-empty, different bio
    if !candidate.bio.trim().is_empty() && candidate.bio != existing.bio {
        existing.bio = candidate.bio.clone();
    }

    // taxonomies: case-sensitive set union per category
    for (category, values) in &candidate.taxonomies {
        let entry = existing.taxonomies.entry(*category).or_default();
        for value in values {
            if !entry.contains(value) {
                entry.push(value.clone());
            }
        }
    }

    // papers / events: append what the dedup key does not already cover
    for paper in &candidate.papers {
        if !existing.papers.iter().any(|e| paper_is_duplicate(e, paper)) {
            existing.papers.push(paper.clone());
        }
    }
    for event in &candidate.events {
        if !existing.events.iter().any(|e| event_is_duplicate(e, event)) {
            existing.events.push(event.clone());
        }
    }

    // connections: union by exact name
    for connection in &candidate.connections {
        if !existing.connections.contains(connection) {
            existing.connections.push(connection.clone());
        }
    }
}

fn titles_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Years are compatible when either side is unknown or both are equal.
/// This knowingly merges two distinct works sharing a title when one
/// lacks a year.
fn years_compatible(a: Option<i32>, b: Option<i32>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

pub(crate) fn paper_is_duplicate(existing: &Paper, candidate: &Paper) -> bool {
    titles_match(&existing.title, &candidate.title)
        && years_compatible(existing.year, candidate.year)
}

pub(crate) fn event_is_duplicate(existing: &EventRecord, candidate: &EventRecord) -> bool {
    titles_match(&existing.title, &candidate.title)
        && years_compatible(existing.year, candidate.year)
}
