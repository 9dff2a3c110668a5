use crate::constants::env as env_names;
use crate::errors::ToolError;

/// Process-scoped API credentials, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    base_url: String,
    token: String,
}

impl Config {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Reads `BAKLIB_TOKEN` and `BAKLIB_API_BASE`. A missing token is fatal;
    /// the base URL falls back to the public endpoint so private deployments
    /// only need to override it.
    pub fn from_env() -> Result<Self, ToolError> {
        let token = std::env::var(env_names::TOKEN).unwrap_or_default();
        if token.trim().is_empty() {
            return Err(ToolError::config(format!(
                "{} environment variable must be set",
                env_names::TOKEN
            )));
        }
        let base_url = std::env::var(env_names::API_BASE)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| env_names::DEFAULT_API_BASE.to_string());
        Ok(Self::new(base_url, token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
