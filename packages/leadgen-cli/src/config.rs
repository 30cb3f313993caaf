use anyhow::{bail, Result};
use dotenvy::dotenv;
use std::env;

use lead_engine::{AcquireConfig, DEFAULT_MODEL};

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let Some(api_key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) else {
            bail!("GEMINI_API_KEY (or API_KEY) must be set");
        };

        Ok(Self {
            api_key,
            model: non_empty("LEADGEN_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty("GEMINI_BASE_URL"),
        })
    }

    /// Engine settings for this configuration.
    pub fn acquire_config(&self) -> AcquireConfig {
        AcquireConfig::default().with_model(&self.model)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
