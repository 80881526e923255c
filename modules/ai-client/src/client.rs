use std::time::Duration;

use anyhow::{anyhow, Result};
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::sse::{SseDecoder, SseEvent};
use crate::types::{chunk_text, ChatRequest};

/// Provider client with endpoint fallback.
///
/// Endpoints are tried round-robin; after each unsuccessful full round the
/// client sleeps for a linearly increasing delay. The total number of
/// rounds is bounded, and exhaustion is an error — there is no infinite
/// retry.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    endpoints: Vec<String>,
    api_key: Option<String>,
    http: reqwest::Client,
    max_rounds: u32,
    base_backoff: Duration,
}

impl ProviderClient {
    pub fn new(endpoints: Vec<String>) -> Self {
        Self {
            endpoints,
            api_key: None,
            http: reqwest::Client::new(),
            max_rounds: 3,
            base_backoff: Duration::from_secs(1),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_base_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    /// Endpoints in rotation order.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    async fn post(&self, endpoint: &str, request: &ChatRequest) -> Result<reqwest::Response> {
        debug!(endpoint, model = %request.model, stream = request.stream, "provider request");
        let mut builder = self.http.post(endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("provider error ({status}): {body}"));
        }
        Ok(response)
    }

    /// Round-robin over endpoints with linear backoff between rounds.
    async fn send_with_fallback(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        if self.endpoints.is_empty() {
            return Err(anyhow!("no provider endpoints configured"));
        }
        for round in 0..self.max_rounds {
            if round > 0 {
                tokio::time::sleep(self.base_backoff * round).await;
            }
            for endpoint in &self.endpoints {
                match self.post(endpoint, request).await {
                    Ok(response) => return Ok(response),
                    Err(err) => {
                        warn!(endpoint = endpoint.as_str(), error = %err, round, "provider endpoint failed");
                    }
                }
            }
        }
        Err(anyhow!(
            "all provider endpoints failed after {} rounds",
            self.max_rounds
        ))
    }

    /// Non-streaming completion: one JSON document, text pulled from the
    /// first choice.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let request = request.clone().stream(false);
        let response = self.send_with_fallback(&request).await?;
        let document: serde_json::Value = response.json().await?;
        chunk_text(&document)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("provider response carried no content"))
    }

    /// Streaming completion: yields text fragments as they arrive.
    ///
    /// Malformed chunks are logged and skipped; the `[DONE]` sentinel ends
    /// the stream early even if the transport stays open.
    pub fn stream_text(
        &self,
        request: ChatRequest,
    ) -> impl Stream<Item = Result<String>> + Send + 'static {
        let client = self.clone();
        async_stream::try_stream! {
            let request = request.stream(true);
            let response = client.send_with_fallback(&request).await?;
            let mut bytes = response.bytes_stream();
            let mut decoder = SseDecoder::new();

            'outer: while let Some(chunk) = bytes.next().await {
                let chunk = chunk?;
                for event in decoder.push(&chunk) {
                    match event {
                        SseEvent::Done => break 'outer,
                        SseEvent::Data(data) => {
                            let parsed: serde_json::Value = match serde_json::from_str(&data) {
                                Ok(value) => value,
                                Err(err) => {
                                    warn!(error = %err, "skipping malformed stream chunk");
                                    continue;
                                }
                            };
                            if let Some(text) = chunk_text(&parsed) {
                                yield text.to_string();
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_defaults() {
        let client = ProviderClient::new(vec!["https://a.example/v1/chat".into()]);
        assert_eq!(client.endpoints().len(), 1);
        assert_eq!(client.max_rounds, 3);
        assert!(client.api_key.is_none());
    }

    #[test]
    fn builder_style_configuration() {
        let client = ProviderClient::new(vec!["https://a.example".into()])
            .with_api_key("sk-test")
            .with_max_rounds(5)
            .with_base_backoff(Duration::from_millis(10));
        assert_eq!(client.api_key.as_deref(), Some("sk-test"));
        assert_eq!(client.max_rounds, 5);
        assert_eq!(client.base_backoff, Duration::from_millis(10));
    }

    #[tokio::test]
    async fn empty_endpoint_list_errors_immediately() {
        let client = ProviderClient::new(Vec::new());
        let request = ChatRequest::new("openai");
        assert!(client.complete(&request).await.is_err());
    }
}
