use anyhow::{Result, bail};
use axum::http::HeaderValue;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: parse_origins(DEFAULT_CORS_ORIGINS),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let raw = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into());
        let cors_allowed_origins = parse_origins(&raw);
        if let Some(bad) = cors_allowed_origins
            .iter()
            .find(|origin| origin.parse::<HeaderValue>().is_err())
        {
            bail!("CORS_ALLOWED_ORIGINS contains an invalid origin: {bad:?}");
        }
        Ok(Self {
            cors_allowed_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
