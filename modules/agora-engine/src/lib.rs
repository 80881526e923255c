//! Merge and query engines over the catalog store.
//!
//! The merge side is the only writer: it reconciles candidate records into
//! the store under the dedup rules and keeps connection edges symmetric.
//! The query side only reads.

mod merge;
mod network;
mod query;

pub use merge::{add_or_update, MergeReport};
pub use network::{network_data, NetworkData, NetworkLink, NetworkNode};
pub use query::{academics_by_connection, get_academic, search, SearchCriteria};
