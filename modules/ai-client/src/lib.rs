//! Client for OpenAI-style text-generation providers.
//!
//! One request shape (`chat/completions`), two response shapes: a single
//! JSON document, or an SSE stream of `data: <json-or-[DONE]>` lines.
//! Several provider endpoints can be configured; they are tried
//! round-robin with a linearly increasing delay between full rounds.

mod client;
mod sse;
mod types;

pub use client::ProviderClient;
pub use sse::{SseDecoder, SseEvent};
pub use types::{chunk_text, ChatRequest, WireMessage};
