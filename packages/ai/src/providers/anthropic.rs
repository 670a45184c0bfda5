//! Anthropic Claude provider implementation.
//!
//! The messages API has no JSON response mode, so the schema is offered as
//! the input schema of a single tool and the model is forced to call it.
//! The tool input is the structured answer.

use serde::{Deserialize, Serialize};

use super::{GenerationRequest, LlmProvider};
use crate::AiError;
use crate::schema::{unwrap_object, wrap_in_object};

/// Default Claude model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Name of the tool the model is forced to call.
const REPORT_TOOL: &str = "report_areas";

/// Anthropic Claude API provider.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider.
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

/// Anthropic API request body.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
    tools: Vec<AnthropicTool>,
    tool_choice: ToolChoice,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicTool {
    name: &'static str,
    description: &'static str,
    input_schema: serde_json::Value,
}

#[derive(Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: &'static str,
    name: &'static str,
}

/// Anthropic API response body.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

/// Anthropic API error response.
#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

/// Extracts the area array text from a successful messages body.
///
/// Prefers the forced tool call; falls back to plain text blocks for
/// models that answer in text anyway.
fn parse_response(body: &str) -> Result<String, AiError> {
    let response: AnthropicResponse = serde_json::from_str(body)?;

    if response.stop_reason.as_deref() == Some("max_tokens") {
        log::warn!("Anthropic response truncated at max tokens");
    }

    let mut text = String::new();
    for block in response.content {
        match block {
            AnthropicContentBlock::ToolUse { name, input } if name == REPORT_TOOL => {
                return Ok(unwrap_object(input).to_string());
            }
            AnthropicContentBlock::Text { text: t } => text.push_str(&t),
            AnthropicContentBlock::ToolUse { .. } | AnthropicContentBlock::Other => {}
        }
    }

    Ok(text)
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, AiError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: 8192,
            temperature: request.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.prompt,
            }],
            tools: vec![AnthropicTool {
                name: REPORT_TOOL,
                description: "Report the candidate filming areas.",
                input_schema: wrap_in_object(request.schema.clone()),
            }],
            tool_choice: ToolChoice {
                choice_type: "tool",
                name: REPORT_TOOL,
            },
        };

        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: AnthropicError =
                serde_json::from_str(&body).unwrap_or_else(|_| AnthropicError {
                    error: AnthropicErrorDetail {
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
