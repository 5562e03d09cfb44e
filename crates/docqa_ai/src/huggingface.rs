use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use docqa_core::error::AppError;
use serde::{Deserialize, Serialize};

/// Hosted models the inference API is known to serve.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum HfModel {
    #[default]
    #[serde(rename = "Meta-Llama-4")]
    MetaLlama4,
    #[serde(rename = "Meta-Llama-3-70B-Instruct")]
    MetaLlama3_70bInstruct,
    #[serde(rename = "Meta-Llama-3-8B-Instruct")]
    MetaLlama3_8bInstruct,
}

impl HfModel {
    pub const ALL: [HfModel; 3] = [
        HfModel::MetaLlama4,
        HfModel::MetaLlama3_70bInstruct,
        HfModel::MetaLlama3_8bInstruct,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HfModel::MetaLlama4 => "Meta-Llama-4",
            HfModel::MetaLlama3_70bInstruct => "Meta-Llama-3-70B-Instruct",
            HfModel::MetaLlama3_8bInstruct => "Meta-Llama-3-8B-Instruct",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            HfModel::MetaLlama4 => {
                "https://api-inference.huggingface.co/models/meta-llama/Meta-Llama-4"
            }
            HfModel::MetaLlama3_70bInstruct => {
                "https://api-inference.huggingface.co/models/meta-llama/Meta-Llama-3-70B-Instruct"
            }
            HfModel::MetaLlama3_8bInstruct => {
                "https://api-inference.huggingface.co/models/meta-llama/Meta-Llama-3-8B-Instruct"
            }
        }
    }
}

impl fmt::Display for HfModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HfModel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        HfModel::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AppError::new("CONFIG_UNKNOWN_MODEL", "Unknown model name").with_details(format!(
                    "model={wanted}; known={}",
                    HfModel::ALL.map(|m| m.name()).join(", ")
                ))
            })
    }
}

/// Connection details for one hosted inference endpoint.
#[derive(Clone)]
pub struct HuggingFaceClient {
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl HuggingFaceClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self, AppError> {
        let endpoint = endpoint.trim().trim_end_matches('/').to_string();
        let host = endpoint
            .strip_prefix("https://")
            .or_else(|| endpoint.strip_prefix("http://"))
            .unwrap_or("");
        if host.is_empty() || host.starts_with('/') {
            return Err(AppError::new(
                "AI_ENDPOINT_INVALID",
                "Inference endpoint must be an http(s) URL",
            )
            .with_details(format!("endpoint={endpoint}")));
        }

        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::new(
                "AI_API_KEY_MISSING",
                "No Hugging Face API key provided",
            ));
        }

        Ok(Self {
            endpoint,
            api_key: api_key.to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl fmt::Debug for HuggingFaceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
