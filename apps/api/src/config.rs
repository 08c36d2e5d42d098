use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the AI path is disabled.
    pub anthropic_api_key: Option<String>,
    /// When unset an in-process cache is used.
    pub redis_url: Option<String>,
    pub ai_timeout: Duration,
    pub cache_ttl: Duration,
    pub min_text_chars: usize,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            redis_url: optional("REDIS_URL"),
            ai_timeout: Duration::from_secs(parse_or(&lookup, "AI_TIMEOUT_SECS", 20)?),
            cache_ttl: Duration::from_secs(parse_or(&lookup, "CACHE_TTL_SECS", 604_800)?),
            min_text_chars: parse_or(&lookup, "MIN_TEXT_CHARS", 50)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.ai_timeout, Duration::from_secs(20));
        assert_eq!(config.cache_ttl, Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(config.min_text_chars, 50);
        assert_eq!(config.max_upload_bytes, 10_485_760);
        assert_eq!(config.rust_log, "info");
        assert!(config.anthropic_api_key.is_none());
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn test_overrides_and_blank_optionals() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("AI_TIMEOUT_SECS", " 5 "),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("REDIS_URL", "  "),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.ai_timeout, Duration::from_secs(5));
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn test_malformed_number_names_the_variable() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
