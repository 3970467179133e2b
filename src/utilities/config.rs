//! Environment-driven configuration.
//!
//! # Environment Variables
//!
//! - `GROQ_API_KEY`: generation API key (required)
//! - `GROQ_BASE_URL`: OpenAI-compatible base URL (default `https://api.groq.com/openai/v1`)
//! - `GROQ_MODEL`: model name (default `llama-3.3-70b-versatile`)
//! - `GROQ_TEMPERATURE`: sampling temperature (default 1.0)
//! - `GROQ_MAX_TOKENS`: completion token cap (default 500)
//! - `GROQ_TIMEOUT_SECS`: per-request timeout (default 30)
//! - `GROQ_MAX_RETRIES`: retries after the first attempt (default 1)
//! - `PORT`: HTTP port (default 8080)
//! - `DIALOGOS_DEFAULT_URBAN_LEVEL`: urban level when the request omits it (default 50)
//! - `DIALOGOS_MEMORY_THRESHOLD`: minimum relevance to persist a message (default 0.3)

use std::str::FromStr;

use super::errors::ConfigError;

/// Default Groq OpenAI-compatible endpoint.
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default generation model.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Runtime configuration for the server and chat pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogosConfig {
    pub groq_api_key: String,
    pub groq_base_url: String,
    pub groq_model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub port: u16,
    pub default_urban_level: u8,
    pub memory_relevance_threshold: f64,
}

impl DialogosConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let groq_api_key = lookup("GROQ_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let default_urban_level: u8 = parse_or(&lookup, "DIALOGOS_DEFAULT_URBAN_LEVEL", 50)?;

        Ok(Self {
            groq_api_key,
            groq_base_url: lookup("GROQ_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
            groq_model: lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            temperature: parse_or(&lookup, "GROQ_TEMPERATURE", 1.0)?,
            max_tokens: parse_or(&lookup, "GROQ_MAX_TOKENS", 500)?,
            request_timeout_secs: parse_or(&lookup, "GROQ_TIMEOUT_SECS", 30)?,
            max_retries: parse_or(&lookup, "GROQ_MAX_RETRIES", 1)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            default_urban_level: default_urban_level.min(100),
            memory_relevance_threshold: parse_or(&lookup, "DIALOGOS_MEMORY_THRESHOLD", 0.3)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = DialogosConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = DialogosConfig::from_lookup(lookup_from(&[("GROQ_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_defaults() {
        let config = DialogosConfig::from_lookup(lookup_from(&[("GROQ_API_KEY", "k")])).unwrap();
        assert_eq!(config.groq_base_url, DEFAULT_GROQ_BASE_URL);
        assert_eq!(config.groq_model, DEFAULT_GROQ_MODEL);
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_urban_level, 50);
        assert!((config.memory_relevance_threshold - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overrides_and_clamping() {
        let config = DialogosConfig::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "k"),
            ("PORT", "9000"),
            ("DIALOGOS_DEFAULT_URBAN_LEVEL", "250"),
            ("GROQ_TEMPERATURE", "0.4"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.default_urban_level, 100);
        assert!((config.temperature - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_value() {
        let err = DialogosConfig::from_lookup(lookup_from(&[("GROQ_API_KEY", "k"), ("PORT", "eighty")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value } => {
                assert_eq!(key, "PORT");
                assert_eq!(value, "eighty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
