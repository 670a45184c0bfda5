//! Google Gemini provider implementation.

use serde::{Deserialize, Serialize};

use super::{GenerationRequest, LlmProvider};
use crate::AiError;
use crate::schema::to_gemini_schema;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` API provider.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

/// Extracts the generated text from a successful `generateContent` body.
fn parse_response(body: &str) -> Result<String, AiError> {
    let response: GeminiResponse = serde_json::from_str(body)?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(AiError::Provider {
            message: format!("Gemini returned no candidates ({reason})"),
        });
    };

    if let Some(reason) = candidate.finish_reason.as_deref()
        && reason != "STOP"
    {
        log::warn!("Gemini finished with reason {reason}");
    }

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    Ok(text)
}

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, AiError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: to_gemini_schema(&request.schema),
                temperature: request.temperature,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        log::debug!("POST {url}");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: GeminiError = serde_json::from_str(&body).unwrap_or_else(|_| GeminiError {
                error: GeminiErrorDetail {
                    message: format!("HTTP {status}: {body}"),
                },
            });
            return Err(AiError::Provider {
                message: err.error.message,
            });
        }

        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_candidate_text_parts() {
        let body = serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "[{\"a\":" }, { "text": "1}]" }] },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(parse_response(&body.to_string()).unwrap(), "[{\"a\":1}]");
    }

    #[test]
    fn blocked_prompt_is_a_provider_error() {
        let body = serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        });
        let err = parse_response(&body.to_string()).unwrap_err();
        assert!(matches!(err, AiError::Provider { message } if message.contains("SAFETY")));
    }

    #[test]
    fn candidate_without_content_yields_empty_text() {
        let body = serde_json::json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        });
        assert_eq!(parse_response(&body.to_string()).unwrap(), "");
    }

    #[test]
    fn request_uses_gemini_schema_dialect() {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: "find" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: to_gemini_schema(&crate::schema::response_schema()),
                temperature: 0.5,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "ARRAY");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "find");
    }
}
