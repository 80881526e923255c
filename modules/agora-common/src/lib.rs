pub mod config;
pub mod error;
pub mod keys;
pub mod types;

pub use config::Config;
pub use error::AgoraError;
pub use keys::normalized_key;
pub use types::*;
