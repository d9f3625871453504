use crate::error::{ApiError, Result};
use crate::ml::openai_embedder::auth_headers;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const CLASSIFICATION_PROMPT: &str = "Given the image of a clothing item, identify if it is a top, bottom wear, or accessory. \
Then, suggest the other two categories with real product names (not invented) that would match well. \
Format:\n\
Given: [top/bottom wear/accessory]\n\
Bottom Wear: [suggestion]\n\
Top: [suggestion]\n\
Accessory: [suggestion]\n";

/// A hosted multimodal model that describes an uploaded clothing image.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Sends the image (as a data URL) with the classification prompt and returns the raw reply.
    async fn classify_image(&self, image_data_url: &str) -> Result<String>;
}

/// Chat-completions client for OpenAI-compatible multimodal models.
#[derive(Clone)]
pub struct OpenAiVisionClient {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl OpenAiVisionClient {
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(ApiError::ConfigError("Missing chat model name".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(auth_headers(api_key)?)
            .build()
            .map_err(|e| ApiError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    fn build_request<'a>(&'a self, image_data_url: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: CLASSIFICATION_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_url,
                        },
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionClient {
    async fn classify_image(&self, image_data_url: &str) -> Result<String> {
        debug!(
            "Sending {} byte image to {} for classification",
            image_data_url.len(),
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.build_request(image_data_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            debug!("Chat completion failed ({}): {}", status, body);
            return Err(ApiError::ExternalServiceError(format!(
                "Chat completion failed ({})",
                status
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ApiError::ModelInferenceError(format!("Failed to parse chat completion: {}", e))
        })?;

        extract_reply(parsed)
    }
}

fn extract_reply(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            ApiError::ModelInferenceError("Chat completion contained no text reply".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::fake_provider::FakeProvider;

    fn client() -> OpenAiVisionClient {
        OpenAiVisionClient::new(
            "sk-test",
            "https://api.openai.com/v1",
            "gpt-4o",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_request_carries_prompt_and_image() {
        let client = client();
        let request = client.build_request("data:image/jpeg;base64,AAAA");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["messages"][0]["role"], "user");
        let content = &value["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], CLASSIFICATION_PROMPT);
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[test]
    fn test_prompt_lists_labeled_lines() {
        for label in ["Given:", "Bottom Wear:", "Top:", "Accessory:"] {
            assert!(CLASSIFICATION_PROMPT.contains(label));
        }
    }

    #[test]
    fn test_extract_reply() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Given: Top"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_reply(parsed).unwrap(), "Given: Top");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_reply(empty),
            Err(ApiError::ModelInferenceError(_))
        ));

        let refusal: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        )
        .unwrap();
        assert!(extract_reply(refusal).is_err());
    }

    fn client_for(provider: &FakeProvider) -> OpenAiVisionClient {
        OpenAiVisionClient::new(
            "sk-test",
            &provider.base_url,
            "gpt-4o",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    const IMAGE: &str = "data:image/jpeg;base64,/9j/4AAQ";

    #[actix_web::test]
    async fn test_classify_image_returns_reply_text() {
        let provider = FakeProvider::start(
            "/v1/chat/completions",
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":"Given: Top\nBottom Wear: Black Jeans"}}]}"#,
        );

        let reply = client_for(&provider).classify_image(IMAGE).await.unwrap();
        assert_eq!(reply, "Given: Top\nBottom Wear: Black Jeans");

        provider.stop().await;
    }

    #[actix_web::test]
    async fn test_error_status_hides_provider_body() {
        let provider = FakeProvider::start(
            "/v1/chat/completions",
            429,
            r#"{"error":{"message":"You exceeded your current quota for org-secret"}}"#,
        );

        let err = client_for(&provider)
            .classify_image(IMAGE)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ExternalServiceError(_)));
        assert!(err.to_string().contains("429"));
        assert!(!err.to_string().contains("org-secret"));

        provider.stop().await;
    }

    #[actix_web::test]
    async fn test_empty_choices_is_inference_failure() {
        let provider = FakeProvider::start("/v1/chat/completions", 200, r#"{"choices":[]}"#);

        let result = client_for(&provider).classify_image(IMAGE).await;
        assert!(matches!(result, Err(ApiError::ModelInferenceError(_))));

        provider.stop().await;
    }

    #[actix_web::test]
    async fn test_unparseable_body_is_inference_failure() {
        let provider = FakeProvider::start("/v1/chat/completions", 200, "not json");

        let result = client_for(&provider).classify_image(IMAGE).await;
        assert!(matches!(result, Err(ApiError::ModelInferenceError(_))));

        provider.stop().await;
    }
}
