use anyhow::{Context, Result};

use crate::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL, DEMO_KEY};

/// Service configuration from the environment (after `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => 8080,
        };
        Ok(Config {
            gemini_api_key: lookup("GEMINI_API_KEY").unwrap_or_else(|| DEMO_KEY.into()),
            gemini_api_base: lookup("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            port,
        })
    }
}
