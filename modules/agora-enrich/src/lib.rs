//! The enrichment pipeline: prompt → streamed text → candidate record.
//!
//! Generation and commit are deliberately two phases: `Enricher::enrich`
//! only produces a candidate for preview, and `confirm` hands it to the
//! merge engine. Nothing touches the store until confirmation.

mod enricher;
mod prompt;

pub use enricher::{confirm, Enricher};
pub use prompt::{build_prompt, Depth};
