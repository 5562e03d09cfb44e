use docqa_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::config::AiSettings;
use crate::huggingface::HuggingFaceClient;
use crate::llm::hf_llm::{HuggingFaceLlm, STATUS_ERROR_CODE};
use crate::llm::{GenerationRequest, Llm};
use crate::retrieve::extract_sources;

pub mod prompts;

pub const MISSING_KEY_ANSWER: &str = "Error: No Hugging Face API key provided.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerResponse {
    pub answer: String,
    pub sources: Vec<String>,
    pub success: bool,
}

impl AnswerResponse {
    pub fn failure(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            success: false,
        }
    }
}

/// Turns a question plus retrieved context into an answer.
///
/// Never returns an error: every failure is folded into an
/// [`AnswerResponse`] with `success == false` so the caller can render it.
pub struct AnswerGenerator {
    llm: Option<Box<dyn Llm>>,
}

impl AnswerGenerator {
    /// Generator backed by the hosted endpoint. Without an API key the
    /// generator is built but every call reports the missing key.
    pub fn from_settings(settings: &AiSettings) -> Result<Self, AppError> {
        let Some(key) = settings.api_key() else {
            tracing::warn!("no Hugging Face API key configured; answers are disabled");
            return Ok(Self::unconfigured());
        };
        let client = HuggingFaceClient::new(settings.endpoint(), key, settings.timeout())?;
        Ok(Self::with_llm(Box::new(HuggingFaceLlm::new(client))))
    }

    pub fn with_llm(llm: Box<dyn Llm>) -> Self {
        Self { llm: Some(llm) }
    }

    pub fn unconfigured() -> Self {
        Self { llm: None }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    pub fn generate_response(
        &self,
        question: &str,
        context: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> AnswerResponse {
        let Some(llm) = self.llm.as_deref() else {
            return AnswerResponse::failure(MISSING_KEY_ANSWER);
        };

        let temperature = if temperature.is_finite() {
            temperature.clamp(0.0, 1.0)
        } else {
            crate::config::DEFAULT_TEMPERATURE
        };
        let request = GenerationRequest {
            messages: prompts::build_messages(question, context),
            temperature,
            max_new_tokens: max_tokens.max(1),
        };

        match llm.generate(&request) {
            Ok(answer) => {
                let sources = extract_sources(context);
                tracing::info!(sources = sources.len(), grounded = !context.is_empty(), "generated answer");
                AnswerResponse {
                    answer,
                    sources,
                    success: true,
                }
            }
            Err(e) => {
                tracing::warn!(code = %e.code, error = %e, "answer generation failed");
                if e.code == STATUS_ERROR_CODE {
                    AnswerResponse::failure(e.message)
                } else {
                    AnswerResponse::failure(format!("Error generating response: {}", e.describe()))
                }
            }
        }
    }
}
