//! OpenAI client implementation

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use std::time::Duration;

use crate::config::OpenAiConfig;
use crate::llm::core::{
    error::CompletionError, provider::CompletionProvider, types::GenerateRequest,
};

use super::types::{ApiErrorEnvelope, ChatCompletionRequest, ChatCompletionResponse};

/// OpenAI model identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenAiModel {
    /// GPT-5 nano, the model the installation answers with
    #[default]
    Gpt5Nano,
}

impl OpenAiModel {
    /// Get the model identifier string for the API
    pub fn as_str(&self) -> &'static str {
        match self {
            OpenAiModel::Gpt5Nano => "gpt-5-nano",
        }
    }
}

/// Client for the OpenAI chat-completions endpoint
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Bearer credential; `None` makes every call fail without a request
    api_key: Option<String>,
    /// API root, e.g. `https://api.openai.com/v1`
    base_url: String,
    /// Model to use
    model: OpenAiModel,
}

impl OpenAiClient {
    /// Create a new client from configuration
    ///
    /// A missing API key is not an error here: the server must keep running
    /// without one, so the failure is reported per call instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &OpenAiConfig) -> Result<Self, CompletionError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CompletionError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: OpenAiModel::default(),
        })
    }

    /// Build the chat-completions endpoint URL
    fn build_endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Make a blocking (non-streaming) completion request
    async fn make_request(&self, request: GenerateRequest) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CompletionError::AuthenticationError("OPENAI_API_KEY is not set".to_string())
        })?;

        let body = ChatCompletionRequest {
            model: self.model.as_str().to_string(),
            messages: request.messages.into_iter().map(Into::into).collect(),
        };

        let response = self
            .http_client
            .post(self.build_endpoint_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, retry_after, &body));
        }

        let text = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&text)?;
        extract_answer(completion)
    }
}

/// Translate a non-2xx response into a `CompletionError`
fn map_error_status(
    status: StatusCode,
    retry_after: Option<Duration>,
    body: &str,
) -> CompletionError {
    let envelope = serde_json::from_str::<ApiErrorEnvelope>(body).ok();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::AuthenticationError(
            envelope
                .map(|e| e.error.message)
                .unwrap_or_else(|| format!("status {}", status.as_u16())),
        ),
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimitExceeded { retry_after },
        _ => match envelope {
            Some(e) => CompletionError::ProviderError {
                code: e.error.code_or_kind(),
                message: e.error.message,
            },
            None => CompletionError::HttpError {
                status: status.as_u16(),
                body: body.to_string(),
            },
        },
    }
}

/// First choice's text, or an error when there is none
fn extract_answer(response: ChatCompletionResponse) -> Result<String, CompletionError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::EmptyResponse("no choices returned".to_string()))?;

    match choice.message.content {
        Some(content) => Ok(content),
        None => Err(CompletionError::EmptyResponse(
            choice
                .message
                .refusal
                .unwrap_or_else(|| "no text content".to_string()),
        )),
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String, CompletionError> {
        self.make_request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::openai::types::{Choice, ChoiceMessage};

    fn config(base_url: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_openai_model_as_str() {
        assert_eq!(OpenAiModel::Gpt5Nano.as_str(), "gpt-5-nano");
        assert_eq!(OpenAiModel::default(), OpenAiModel::Gpt5Nano);
    }

    #[test]
    fn test_endpoint_url_strips_trailing_slash() {
        let client = OpenAiClient::new(&config("https://api.openai.com/v1/")).unwrap();
        assert_eq!(
            client.build_endpoint_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_map_unauthorized() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "code": "invalid_api_key"}}"#;
        let err = map_error_status(StatusCode::UNAUTHORIZED, None, body);
        match err {
            CompletionError::AuthenticationError(msg) => assert!(msg.contains("Incorrect API key")),
            other => panic!("Expected authentication error, got {:?}", other),
        }
    }

    #[test]
    fn test_map_rate_limited() {
        let err = map_error_status(
            StatusCode::TOO_MANY_REQUESTS,
            Some(Duration::from_secs(3)),
            "",
        );
        assert!(matches!(
            err,
            CompletionError::RateLimitExceeded { retry_after: Some(d) } if d == Duration::from_secs(3)
        ));
    }

    #[test]
    fn test_map_server_error_without_envelope() {
        let err = map_error_status(StatusCode::BAD_GATEWAY, None, "upstream down");
        match err {
            CompletionError::HttpError { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("Expected HTTP error, got {:?}", other),
        }
    }

    #[test]
    fn test_map_provider_envelope() {
        let body = r#"{"error": {"message": "The model does not exist", "type": "invalid_request_error", "code": "model_not_found"}}"#;
        let err = map_error_status(StatusCode::NOT_FOUND, None, body);
        assert!(matches!(err, CompletionError::ProviderError { ref code, .. } if code == "model_not_found"));
    }

    #[test]
    fn test_extract_answer_first_choice() {
        let response = ChatCompletionResponse {
            choices: vec![
                Choice {
                    message: ChoiceMessage {
                        content: Some("first".to_string()),
                        refusal: None,
                    },
                },
                Choice {
                    message: ChoiceMessage {
                        content: Some("second".to_string()),
                        refusal: None,
                    },
                },
            ],
        };
        assert_eq!(extract_answer(response).unwrap(), "first");
    }

    #[test]
    fn test_extract_answer_no_choices() {
        let response = ChatCompletionResponse {
            choices: vec![],
        };
        assert!(matches!(
            extract_answer(response),
            Err(CompletionError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.api_key = None;
        let client = OpenAiClient::new(&cfg).unwrap();

        let result = client
            .generate(GenerateRequest::with_system("persona", "hello"))
            .await;
        assert!(matches!(result, Err(CompletionError::AuthenticationError(_))));
    }
}
