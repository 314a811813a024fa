//! TAT Sample - Sample text for trying out the pipeline
//!
//! Asks a remote LLM for a paragraph suitable for NER and POS tagging. When
//! no API key is configured, the built-in paragraph is returned instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tat_core::{sanitize, LlmClient, LlmConfig, Result};

pub mod llm;

pub use llm::{create_llm_client, GeminiClient};

/// Paragraph used when no LLM is configured
pub const SAMPLE_TEXT: &str = "Apple Inc. announced on Monday that Tim Cook, the CEO, will visit their new headquarters in Cupertino next month. The company reported $90 billion in revenue for the last quarter, exceeding analysts' expectations. Meanwhile, Microsoft's Satya Nadella commented on the recent partnership between the two tech giants during an interview in New York.";

/// Where a sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSource {
    Llm,
    Builtin,
}

/// A sanitized sample paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleText {
    pub text: String,
    pub source: SampleSource,
}

impl SampleText {
    pub fn builtin() -> Self {
        Self {
            text: SAMPLE_TEXT.to_string(),
            source: SampleSource::Builtin,
        }
    }
}

/// Produces sample text from an LLM, or the built-in paragraph
#[derive(Clone)]
pub struct SampleTextGenerator {
    client: Option<Arc<dyn LlmClient>>,
    prompt: String,
}

impl SampleTextGenerator {
    /// Generator that always returns the built-in paragraph
    pub fn offline() -> Self {
        Self {
            client: None,
            prompt: LlmConfig::default().sample_prompt,
        }
    }

    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client: Some(client),
            ..Self::offline()
        }
    }

    /// Gemini-backed when an API key is set, offline otherwise
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let has_key = config.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
        let generator = if has_key {
            Self::with_client(Arc::new(GeminiClient::from_config(config)?))
        } else {
            tracing::info!("No LLM API key configured; sample text uses the built-in paragraph");
            Self::offline()
        };
        Ok(generator.with_prompt(config.sample_prompt.clone()))
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn is_remote(&self) -> bool {
        self.client.is_some()
    }

    /// Request a sample; remote failures are returned as errors
    pub async fn generate(&self) -> Result<SampleText> {
        let Some(client) = &self.client else {
            return Ok(SampleText::builtin());
        };

        tracing::info!("Requesting sample text from {}", client.name());
        let text = client.generate(&self.prompt).await?;

        Ok(SampleText {
            text: sanitize(&text),
            source: SampleSource::Llm,
        })
    }

    /// Request a sample, falling back to the built-in paragraph on failure
    pub async fn generate_or_builtin(&self) -> SampleText {
        match self.generate().await {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!("Sample text request failed, using built-in paragraph: {}", e);
                SampleText::builtin()
            }
        }
    }
}

impl Default for SampleTextGenerator {
    fn default() -> Self {
        Self::offline()
    }
}

impl std::fmt::Debug for SampleTextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleTextGenerator")
            .field("client", &self.client.as_ref().map(|c| c.name()))
            .field("prompt", &self.prompt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tat_core::TatError;

    /// Records prompts and replies with a fixed result
    struct MockClient {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockClient {
        fn new(reply: std::result::Result<&str, &str>) -> Self {
            Self {
                reply: reply.map(str::to_string).map_err(str::to_string),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmClient for MockClient {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(TatError::LlmError)
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_offline_returns_builtin() {
        let sample = SampleTextGenerator::offline().generate().await.unwrap();
        assert_eq!(sample, SampleText::builtin());
        assert!(sample.text.starts_with("Apple Inc. announced on Monday"));
    }

    #[tokio::test]
    async fn test_remote_text_is_sanitized() {
        let client = Arc::new(MockClient::new(Ok("Paris <script>x()</script>is lovely.")));
        let generator = SampleTextGenerator::with_client(client.clone()).with_prompt("custom prompt");

        let sample = generator.generate().await.unwrap();
        assert_eq!(sample.text, "Paris is lovely.");
        assert_eq!(sample.source, SampleSource::Llm);
        assert_eq!(*client.prompts.lock().unwrap(), vec!["custom prompt"]);
    }

    #[tokio::test]
    async fn test_remote_failure() {
        let generator = SampleTextGenerator::with_client(Arc::new(MockClient::new(Err("quota exceeded"))));

        let err = generator.generate().await.unwrap_err();
        assert_eq!(err.to_string(), "LLM error: quota exceeded");

        let sample = generator.generate_or_builtin().await;
        assert_eq!(sample.source, SampleSource::Builtin);
    }

    #[test]
    fn test_from_config() {
        let offline = SampleTextGenerator::from_config(&LlmConfig::default()).unwrap();
        assert!(!offline.is_remote());

        let config = LlmConfig {
            api_key: Some("key".to_string()),
            ..LlmConfig::default()
        };
        let remote = SampleTextGenerator::from_config(&config).unwrap();
        assert!(remote.is_remote());
        assert_eq!(remote.prompt, config.sample_prompt);
    }

    #[test]
    fn test_sample_serialization() {
        let json = serde_json::to_value(SampleText::builtin()).unwrap();
        assert_eq!(json["source"], "builtin");
    }

    #[test]
    fn test_blocking_generate() {
        let sample = tokio_test::block_on(SampleTextGenerator::default().generate()).unwrap();
        assert_eq!(sample.source, SampleSource::Builtin);
    }
}
