//! OpenRouter chat-completion client.
//!
//! OpenRouter speaks the OpenAI chat-completions wire format, so this client
//! is a plain reqwest implementation of that protocol with bearer auth.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{OnboardError, OnboardResult};

use super::{ChatMessage, ChatRole, GenerateOptions, LanguageModel};

/// Request timeout for chat completions.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat-completions request message.
#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

/// Response-format hint for JSON mode.
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

/// OpenRouter chat-completion client.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenRouterClient {
    /// Create a new client for the given API key and model.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> OnboardResult<Self> {
        let client = Client::builder()
            .user_agent("onboard-agent/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OnboardError::LanguageModel {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    fn convert_messages(messages: &[ChatMessage]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|msg| ApiMessage {
                role: match msg.role {
                    ChatRole::System => "system".to_string(),
                    ChatRole::User => "user".to_string(),
                    ChatRole::Assistant => "assistant".to_string(),
                },
                content: msg.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl LanguageModel for OpenRouterClient {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> OnboardResult<String> {
        let response_format = if options.json_mode {
            Some(ResponseFormat {
                format_type: "json_object".to_string(),
            })
        } else {
            None
        };

        let request = ApiRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(messages),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            response_format,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| OnboardError::LanguageModel {
                reason: format!("request failed: {e}"),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OnboardError::LanguageModel {
                reason: format!("failed to read response: {e}"),
            })?;

        if !status.is_success() {
            // Prefer the structured error message when the body parses
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(OnboardError::LanguageModel {
                    reason: format!("API error: {}", error_response.error.message),
                });
            }
            return Err(OnboardError::LanguageModel {
                reason: format!("API error ({status}): {body}"),
            });
        }

        let api_response: ApiResponse =
            serde_json::from_str(&body).map_err(|e| OnboardError::LanguageModel {
                reason: format!("failed to parse response: {e}"),
            })?;

        let text = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenRouterClient {
        OpenRouterClient::new("sk-or-test", "anthropic/claude-3-sonnet", server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-or-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "{\"name\": \"inventory-api\"}"}}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let messages = vec![ChatMessage::user("extract")];
        let options = GenerateOptions {
            temperature: Some(0.1),
            max_tokens: Some(500),
            json_mode: true,
        };

        let text = client.generate(&messages, &options).await.unwrap();
        assert_eq!(text, "{\"name\": \"inventory-api\"}");
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Invalid API key"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid API key"), "{err}");
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("failed to parse"), "{err}");
    }
}
