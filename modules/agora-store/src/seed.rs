//! Bootstrap seeding for an empty catalog.
//!
//! A fresh store is never left empty: a placeholder record goes in first
//! so the UI layer has something to render, then the external seed
//! dataset is fetched and — when non-empty — fully replaces the
//! placeholder.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use agora_common::{Academic, AgoraError, TaxonomyCategory};

use crate::catalog::CatalogStore;

/// Where the seed dataset comes from. The document is a JSON mapping of
/// normalized keys to records.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch(&self) -> Result<BTreeMap<String, Academic>>;
}

pub struct HttpSeedSource {
    url: String,
    http: reqwest::Client,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<BTreeMap<String, Academic>> {
        let response = self.http.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("seed fetch failed ({})", response.status()));
        }
        Ok(response.json().await?)
    }
}

fn placeholder() -> Academic {
    let mut academic = Academic::new("Simone de Beauvoir");
    academic.bio =
        "French existentialist philosopher and author of The Second Sex.".to_string();
    academic
        .taxonomies
        .insert(TaxonomyCategory::Discipline, vec!["Philosophy".to_string()]);
    academic
        .taxonomies
        .insert(TaxonomyCategory::Era, vec!["20th Century".to_string()]);
    academic
}

/// Populate an empty store: placeholder first, then the seed dataset if a
/// source is configured and returns a non-empty catalog. A failed or
/// empty fetch leaves the placeholder in place; it is never an error.
pub async fn bootstrap(
    store: &mut CatalogStore,
    seed: Option<&dyn SeedSource>,
) -> Result<(), AgoraError> {
    if !store.is_empty() {
        return Ok(());
    }

    store.put(placeholder());
    store.persist_academics()?;
    info!("empty catalog bootstrapped with placeholder record");

    let Some(source) = seed else {
        return Ok(());
    };

    match source.fetch().await {
        Ok(catalog) if !catalog.is_empty() => {
            let count = catalog.len();
            store.replace_catalog(catalog.into_values())?;
            info!(count, "seed dataset replaced placeholder catalog");
        }
        Ok(_) => warn!("seed dataset was empty, keeping placeholder"),
        Err(err) => warn!(error = %err, "seed fetch failed, keeping placeholder"),
    }
    Ok(())
}
