use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::env;

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origin: String,
    pub max_upload_bytes: usize,
}

#[derive(Clone)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub openai_api_base: String,
}

// Keeps the credential out of startup logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = if self.openai_api_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("LLMConfig")
            .field("openai_api_key", &key)
            .field("openai_api_base", &self.openai_api_base)
            .finish()
    }
}

impl LLMConfig {
    pub fn has_api_key(&self) -> bool {
        !self.openai_api_key.trim().is_empty()
    }
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cors_allowed_origin = var("ALLOWED_ORIGIN", "http://localhost:5173").trim().to_string();
        HeaderValue::from_str(&cors_allowed_origin)
            .with_context(|| format!("ALLOWED_ORIGIN is not a valid origin: {cors_allowed_origin}"))?;

        Ok(Self {
            server: ServerConfig {
                port: var("PORT", "8080")
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: var("HOST", "0.0.0.0"),
                cors_allowed_origin,
                max_upload_bytes: var("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
                    .parse()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
            },
            llm: LLMConfig {
                openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
                openai_api_base: var("OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
            },
        })
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
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.cors_allowed_origin, "http://localhost:5173");
        assert_eq!(config.server.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.llm.openai_api_base, DEFAULT_OPENAI_API_BASE);
        assert!(!config.llm.has_api_key());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("ALLOWED_ORIGIN", "https://app.example.com"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "http://127.0.0.1:1234/v1/"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_allowed_origin, "https://app.example.com");
        assert_eq!(config.server.max_upload_bytes, 1024);
        assert_eq!(config.llm.openai_api_base, "http://127.0.0.1:1234/v1");
        assert!(config.llm.has_api_key());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
    }

    #[test]
    fn test_whitespace_key_counts_as_unset() {
        let config = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap();
        assert!(!config.llm.has_api_key());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-secret")]).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
