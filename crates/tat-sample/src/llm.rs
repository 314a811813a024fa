//! LLM client for the Gemini `generateContent` API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tat_core::{LlmClient, LlmConfig, Result, TatError};

/// Reply text used when the response carries neither content nor a block reason
pub const UNEXPECTED_RESPONSE: &str = "Sorry, I couldn't get a response. The response format was unexpected.";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
    #[serde(default)]
    safety_ratings: serde_json::Value,
}

/// Text of the first part of the first candidate, or the reason there is none
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text);
    if let Some(text) = text {
        return Ok(text);
    }

    match response.prompt_feedback {
        Some(PromptFeedback {
            block_reason: Some(reason),
            safety_ratings,
        }) => Err(TatError::LlmError(format!(
            "Content blocked due to: {reason}. Details: {safety_ratings}"
        ))),
        _ => Err(TatError::LlmError(UNEXPECTED_RESPONSE.to_string())),
    }
}

// ============================================================================
// Gemini Client
// ============================================================================

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client against the public endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: LlmConfig::default().base_url,
            model: model.into(),
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TatError::ConfigError("Gemini API key required".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TatError::LlmError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Set custom base URL (for proxies or a local stub)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        tracing::debug!("Requesting {} from {}", self.model, self.base_url);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TatError::LlmError(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini error response: {}", error_text);
            return Err(TatError::LlmError(format!(
                "API request failed with status {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TatError::LlmError(format!("Failed to parse response: {e}")))?;

        extract_text(result)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Create the LLM client described by `config`
pub fn create_llm_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    Ok(Box::new(GeminiClient::from_config(config)?))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String> {
        extract_text(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_extracts_first_part() {
        let text = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello"},{"text":"ignored"}]}}]}"#,
        );
        assert_eq!(text.unwrap(), "Hello");
    }

    #[test]
    fn test_block_reason() {
        let err = parse(
            r#"{"promptFeedback":{"blockReason":"SAFETY","safetyRatings":[{"category":"HARM","probability":"HIGH"}]}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"LLM error: Content blocked due to: SAFETY. Details: [{"category":"HARM","probability":"HIGH"}]"#
        );
    }

    #[test]
    fn test_unexpected_shape() {
        let err = parse(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap_err();
        assert_eq!(err.to_string(), format!("LLM error: {UNEXPECTED_RESPONSE}"));
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some("hi".to_string()),
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = LlmConfig::default();
        assert!(matches!(
            GeminiClient::from_config(&config),
            Err(TatError::ConfigError(_))
        ));

        let config = LlmConfig {
            api_key: Some("test-key".to_string()),
            base_url: "http://localhost:9/v1beta/".to_string(),
            ..LlmConfig::default()
        };
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(client.name(), "gemini");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let client = GeminiClient::new("test-key", "gemini-2.0-flash").with_base_url("http://127.0.0.1:9");
        let err = client.generate("prompt").await.unwrap_err();
        assert!(err.to_string().starts_with("LLM error: Request failed"));
    }
}
