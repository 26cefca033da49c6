//! Generator configuration parsed from environment variables.

use std::fmt;

use super::types::GenerateError;

pub const DEFAULT_API_KEY_ENV: &str = "REPLICATE_API_TOKEN";
pub const DEFAULT_MODEL: &str = "recraft-ai/recraft-v3-svg";
pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_MAX_POLLS: u32 = 60;

/// A hosted model, addressed as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSlug {
    pub owner: String,
    pub name: String,
}

impl ModelSlug {
    /// Parse `owner/name`; both halves must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::ConfigParse`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, GenerateError> {
        match raw.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self { owner: owner.to_owned(), name: name.to_owned() })
            }
            _ => Err(GenerateError::ConfigParse(format!("invalid SVG_GEN_MODEL '{raw}' (expected 'owner/name')"))),
        }
    }
}

impl fmt::Display for ModelSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// How long to wait for a prediction that did not finish on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval_ms: u64,
    pub max_polls: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub model: ModelSlug,
    pub base_url: String,
    pub timeouts: GeneratorTimeouts,
    pub poll: PollPolicy,
}

impl GeneratorConfig {
    /// Build typed generator config from environment variables.
    ///
    /// Optional:
    /// - `SVG_GEN_API_KEY_ENV`: names the env var containing the token
    ///   (default `REPLICATE_API_TOKEN`; the named var itself is required)
    /// - `SVG_GEN_MODEL`: `owner/name`, default `recraft-ai/recraft-v3-svg`
    /// - `SVG_GEN_BASE_URL`: default Replicate API base URL
    /// - `SVG_GEN_REQUEST_TIMEOUT_SECS`: default 120
    /// - `SVG_GEN_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SVG_GEN_POLL_INTERVAL_MS`: default 1000
    /// - `SVG_GEN_MAX_POLLS`: default 60
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or the model slug is invalid.
    pub fn from_env() -> Result<Self, GenerateError> {
        let key_var = std::env::var("SVG_GEN_API_KEY_ENV").unwrap_or_else(|_| DEFAULT_API_KEY_ENV.to_string());
        let api_key = match std::env::var(&key_var) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => return Err(GenerateError::MissingApiKey { var: key_var }),
        };

        let model = ModelSlug::parse(&std::env::var("SVG_GEN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()))?;
        let base_url = std::env::var("SVG_GEN_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = GeneratorTimeouts {
            request_secs: env_parse("SVG_GEN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("SVG_GEN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let poll = PollPolicy {
            interval_ms: env_parse("SVG_GEN_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS),
            max_polls: env_parse("SVG_GEN_MAX_POLLS", DEFAULT_MAX_POLLS),
        };

        Ok(Self { api_key, model, base_url, timeouts, poll })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
