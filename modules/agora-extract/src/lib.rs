//! Entity extraction: free-form generated text → candidate `Academic`.
//!
//! Two layered strategies, first success wins:
//! 1. a fenced JSON block that parses to a named record is returned verbatim;
//! 2. otherwise line-oriented heading extraction runs per field, each field
//!    tried against an ordered list of label variants.

mod extractor;
mod items;
mod sections;

pub use extractor::extract;
