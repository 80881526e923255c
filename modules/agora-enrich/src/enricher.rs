//! The enrichment orchestrator.

use futures::{pin_mut, StreamExt};
use tracing::{debug, info, warn};

use agora_common::{Academic, AgoraError};
use agora_engine::{add_or_update, MergeReport};
use agora_extract::extract;
use agora_store::CatalogStore;
use ai_client::{ChatRequest, ProviderClient, WireMessage};

use crate::prompt::{build_prompt, Depth};

pub struct Enricher {
    client: ProviderClient,
    model: String,
    max_tokens: u32,
}

impl Enricher {
    pub fn new(client: ProviderClient, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
        }
    }

    /// Drive one streaming generation and extract a candidate record.
    /// The store is not touched; pass the result to [`confirm`] to commit.
    pub async fn enrich(
        &self,
        topic: &str,
        depth: Depth,
        exclusions: &[String],
    ) -> Result<Academic, AgoraError> {
        let prompt = build_prompt(topic, depth, exclusions);
        let request = ChatRequest::new(&self.model)
            .message(WireMessage::user(prompt))
            .max_tokens(self.max_tokens);

        let text = self.accumulate(request).await?;
        debug!(topic, chars = text.len(), "generation complete");

        extract(&text).ok_or_else(|| {
            AgoraError::Extraction(format!("no record could be extracted for '{topic}'"))
        })
    }

    /// Consume the stream, folding fragments into one buffer. Providers
    /// that answer a streaming request with a single JSON document produce
    /// no SSE fragments; fall back to a non-streaming round trip then.
    async fn accumulate(&self, request: ChatRequest) -> Result<String, AgoraError> {
        let stream = self.client.stream_text(request.clone());
        pin_mut!(stream);

        let mut text = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment.map_err(|e| AgoraError::Provider(e.to_string()))?;
            text.push_str(&fragment);
        }

        if text.is_empty() {
            warn!("stream yielded no text, retrying without streaming");
            text = self
                .client
                .complete(&request)
                .await
                .map_err(|e| AgoraError::Provider(e.to_string()))?;
        }
        Ok(text)
    }
}

/// Commit a previewed candidate: hand it to the merge engine.
pub fn confirm(store: &mut CatalogStore, candidate: Academic) -> Result<MergeReport, AgoraError> {
    let report = add_or_update(store, candidate)?;
    info!(key = report.key.as_str(), created = report.created, "enrichment confirmed");
    Ok(report)
}
