use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a development default; nothing is required.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the platform API.
    pub api_base_url: String,
    /// Quiet period of the editor's trailing debounce, in milliseconds.
    pub save_debounce_ms: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            save_debounce_ms: std::env::var("SAVE_DEBOUNCE_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse::<u64>()
                .context("SAVE_DEBOUNCE_MS must be a number of milliseconds")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
