use std::fmt;
use std::time::Duration;

use docqa_core::chunking::DEFAULT_CHUNK_SIZE;
use docqa_core::error::AppError;

use crate::huggingface::HfModel;
use crate::index::DEFAULT_TOP_K;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Per-session settings for retrieval and answer generation.
#[derive(Clone, PartialEq)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub model: HfModel,
    /// Replaces the model's hosted URL, e.g. for a self-hosted server.
    pub endpoint_override: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_k: usize,
    pub chunk_size: usize,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: HfModel::default(),
            endpoint_override: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_k: DEFAULT_TOP_K,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AiSettings {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.temperature.is_finite() || !(0.0..=1.0).contains(&self.temperature) {
            return Err(invalid("temperature must be between 0 and 1")
                .with_details(format!("temperature={}", self.temperature)));
        }
        if self.max_tokens == 0 {
            return Err(invalid("max_tokens must be at least 1"));
        }
        if self.top_k == 0 {
            return Err(invalid("top_k must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(invalid("chunk_size must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs must be at least 1"));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        match self.endpoint_override.as_deref() {
            Some(e) if !e.trim().is_empty() => e.trim(),
            _ => self.model.endpoint(),
        }
    }

    /// Key with surrounding whitespace removed; blank keys count as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn invalid(message: &str) -> AppError {
    AppError::new("CONFIG_INVALID", message)
}

impl fmt::Debug for AiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiSettings")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint_override", &self.endpoint_override)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("top_k", &self.top_k)
            .field("chunk_size", &self.chunk_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
