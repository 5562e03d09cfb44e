use docqa_core::error::AppError;
use serde::Serialize;
use serde_json::Value;

use super::{GenerationRequest, Llm};
use crate::huggingface::HuggingFaceClient;

pub const NO_ANSWER_TEXT: &str = "No answer generated.";

/// Code for a non-200 reply; the message is the user-facing error text.
pub const STATUS_ERROR_CODE: &str = "AI_INFERENCE_STATUS";

#[derive(Debug, Clone)]
pub struct HuggingFaceLlm {
    client: HuggingFaceClient,
}

impl HuggingFaceLlm {
    pub fn new(client: HuggingFaceClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
struct InferenceParameters {
    temperature: f32,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Clone, Serialize)]
struct InferencePayload {
    // Chat messages serialised to a JSON string.
    inputs: String,
    parameters: InferenceParameters,
}

pub(crate) fn build_payload(req: &GenerationRequest) -> Result<Value, AppError> {
    let inputs = serde_json::to_string(&req.messages).map_err(|e| {
        AppError::new("AI_INFERENCE_FAILED", "Failed to encode chat messages")
            .with_details(e.to_string())
    })?;
    serde_json::to_value(InferencePayload {
        inputs,
        parameters: InferenceParameters {
            temperature: req.temperature,
            max_new_tokens: req.max_new_tokens,
            return_full_text: false,
        },
    })
    .map_err(|e| {
        AppError::new("AI_INFERENCE_FAILED", "Failed to encode inference request")
            .with_details(e.to_string())
    })
}

/// Interpret an inference reply.
///
/// 200 with a JSON list yields the first element's `generated_text`; 200 with
/// any other JSON yields that JSON as text. Any other status becomes a
/// [`STATUS_ERROR_CODE`] error whose message quotes the JSON error body, or
/// the raw body when it is not JSON.
pub fn decode_generation(status: u16, body: &str) -> Result<String, AppError> {
    if status != 200 {
        let mut message = format!("Error: API returned status code {status}.");
        match serde_json::from_str::<Value>(body) {
            Ok(v) => message.push_str(&format!(" Details: {v}")),
            Err(_) => message.push_str(&format!(" Response: {body}")),
        }
        return Err(AppError::new(STATUS_ERROR_CODE, message)
            .with_details(format!("status={status}"))
            .with_retryable(status == 429 || status >= 500));
    }

    let v: Value = serde_json::from_str(body).map_err(|e| {
        AppError::new("AI_INFERENCE_DECODE_FAILED", "Failed to decode inference response")
            .with_details(e.to_string())
    })?;

    match v {
        Value::Array(items) if !items.is_empty() => Ok(match items[0].get("generated_text") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => NO_ANSWER_TEXT.to_string(),
        }),
        other => Ok(other.to_string()),
    }
}

impl Llm for HuggingFaceLlm {
    fn generate(&self, request: &GenerationRequest) -> Result<String, AppError> {
        let payload = build_payload(request)?;
        tracing::debug!(
            endpoint = self.client.endpoint(),
            messages = request.messages.len(),
            max_new_tokens = request.max_new_tokens,
            "calling inference endpoint"
        );

        let resp = ureq::post(self.client.endpoint())
            .timeout(self.client.timeout())
            .set("Authorization", &self.client.bearer())
            .send_json(payload);

        match resp {
            Ok(r) => {
                let status = r.status();
                let body = r.into_string().map_err(|e| {
                    AppError::new("AI_INFERENCE_DECODE_FAILED", "Failed to read inference response")
                        .with_details(e.to_string())
                })?;
                decode_generation(status, &body)
            }
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string().unwrap_or_default();
                tracing::warn!(status, "inference endpoint returned an error status");
                decode_generation(status, &body)
            }
            Err(e) => {
                tracing::warn!(error = %e, "inference endpoint unreachable");
                Err(AppError::new(
                    "AI_INFERENCE_UNREACHABLE",
                    "Failed to reach the inference endpoint",
                )
                .with_details(e.to_string())
                .with_retryable(true))
            }
        }
    }
}
