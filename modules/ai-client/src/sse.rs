//! SSE `data:` line decoding as a fold over byte chunks.
//!
//! Network chunks split lines (and multi-byte characters) arbitrarily, so
//! the decoder carries the pending partial line as explicit state between
//! pushes. Only complete lines are ever interpreted.

/// One decoded stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// The payload of a `data:` line (without the prefix).
    Data(String),
    /// The `[DONE]` terminal sentinel.
    Done,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one byte chunk into the decoder, returning every event whose
    /// line completed with this chunk. Non-`data:` lines (comments,
    /// `event:` fields, blank keep-alives) are skipped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();

            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();
            if data == "[DONE]" {
                events.push(SseEvent::Done);
            } else if !data.is_empty() {
                events.push(SseEvent::Data(data.to_string()));
            }
        }
        events
    }
}
