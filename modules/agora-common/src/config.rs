use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
/// Every knob has a default so a bare `agora` invocation works offline
/// against the local data directory.
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub data_dir: PathBuf,
    pub storage_budget_bytes: Option<u64>,

    // Text-generation provider
    pub provider_endpoints: Vec<String>,
    pub provider_api_key: Option<String>,
    pub provider_model: String,
    pub max_tokens: u32,

    // Seed dataset
    pub seed_url: Option<String>,

    // Auto-persist
    pub autosave_period_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("AGORA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("agora-data")),
            storage_budget_bytes: env::var("AGORA_STORAGE_BUDGET_BYTES")
                .ok()
                .map(|v| v.parse().expect("AGORA_STORAGE_BUDGET_BYTES must be a number")),
            provider_endpoints: env::var("AGORA_PROVIDER_URLS")
                .unwrap_or_else(|_| "https://text.pollinations.ai/openai".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            provider_api_key: env::var("AGORA_PROVIDER_API_KEY").ok(),
            provider_model: env::var("AGORA_MODEL").unwrap_or_else(|_| "openai".to_string()),
            max_tokens: env::var("AGORA_MAX_TOKENS")
                .unwrap_or_else(|_| "1024".to_string())
                .parse()
                .expect("AGORA_MAX_TOKENS must be a number"),
            seed_url: env::var("AGORA_SEED_URL").ok(),
            autosave_period_secs: env::var("AGORA_AUTOSAVE_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("AGORA_AUTOSAVE_SECS must be a number"),
        }
    }
}
