//! `OpenAI` chat completions provider implementation.
//!
//! Also works against OpenAI-compatible servers (Ollama, vLLM, llama.cpp,
//! LM Studio) through a base URL override.

use serde::{Deserialize, Serialize};

use super::{GenerationRequest, LlmProvider};
use crate::AiError;
use crate::schema::{unwrap_object, wrap_in_object};

/// Default `OpenAI` model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` API provider.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a new `OpenAI` provider.
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the API base URL (e.g. `http://localhost:11434/v1`).
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    schema: serde_json::Value,
    strict: bool,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

/// Extracts the area array text from a successful chat completion body.
fn parse_response(body: &str) -> Result<String, AiError> {
    let response: OpenAiResponse = serde_json::from_str(body)?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AiError::Provider {
            message: "No choices in OpenAI response".to_string(),
        })?;

    if let Some(refusal) = choice.message.refusal {
        return Err(AiError::Provider {
            message: format!("Model refused: {refusal}"),
        });
    }

    if choice.finish_reason.as_deref() == Some("length") {
        log::warn!("OpenAI response truncated at max tokens");
    }

    let Some(content) = choice.message.content.filter(|c| !c.trim().is_empty()) else {
        return Ok(String::new());
    };

    let value: serde_json::Value = serde_json::from_str(&content)?;
    Ok(unwrap_object(value).to_string())
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, AiError> {
        let body = OpenAiRequest {
            model: &self.model,
            messages: vec![OpenAiMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "location_areas",
                    schema: wrap_in_object(request.schema.clone()),
                    strict: false,
                },
            },
            temperature: request.temperature,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Content-Type", "application/json");
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let resp = builder.json(&body).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: OpenAiError = serde_json::from_str(&body).unwrap_or_else(|_| OpenAiError {
                error: OpenAiErrorDetail {
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

    fn completion(content: serde_json::Value) -> String {
        serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
        .to_string()
    }

    #[test]
    fn unwraps_areas_object() {
        let body = completion(serde_json::json!("{\"areas\":[{\"name\":\"Soho\"}]}"));
        assert_eq!(parse_response(&body).unwrap(), "[{\"name\":\"Soho\"}]");
    }

    #[test]
    fn empty_content_yields_empty_text() {
        let body = completion(serde_json::Value::Null);
        assert_eq!(parse_response(&body).unwrap(), "");
    }

    #[test]
    fn refusal_is_a_provider_error() {
        let body = serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": null, "refusal": "no" },
                "finish_reason": "stop"
            }]
        })
        .to_string();
        assert!(matches!(
            parse_response(&body),
            Err(AiError::Provider { .. })
        ));
    }

    #[test]
    fn non_json_content_is_a_json_error() {
        let body = completion(serde_json::json!("Here are some areas!"));
        assert!(matches!(parse_response(&body), Err(AiError::Json(_))));
    }
}
