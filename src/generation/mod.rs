//! Text generation provider abstraction
//!
//! Meal plans, rationales and cleaned labels all come from a prompt-in /
//! text-out service. This module hides the provider behind a trait so the
//! orchestrators can be tested against a deterministic fake.

mod fake;
mod gemini;
mod throttle;

pub use fake::FakeGenerator;
pub use gemini::GeminiGenerator;
pub use throttle::Throttled;

use crate::config::GenerationConfig;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error type for text generation calls.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    ParseError(String),

    #[error("response contained no text")]
    EmptyResponse,

    #[error("rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("text generation not configured")]
    NotConfigured,
}

/// Prompt-in / text-out generation service.
///
/// Implementations must be thread-safe; one instance is shared by all
/// requests.
#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    /// Send a prompt and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Provider name (e.g. "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    /// Model name (e.g. "gemini-1.5-flash").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Build the configured generator, if any.
///
/// Without an API key there is no generator; callers fall back to their
/// degraded-mode outputs.
pub fn create_generator(
    config: &GenerationConfig,
) -> Result<Option<Arc<dyn TextGenerator>>, GenerationError> {
    let Some(api_key) = config.api_key.clone() else {
        tracing::warn!("GEMINI_API_KEY not set; text generation disabled");
        return Ok(None);
    };

    let gemini = GeminiGenerator::new(
        api_key,
        config.model.clone(),
        config.base_url.clone(),
        config.timeout,
    )?;

    tracing::info!(
        provider = gemini.provider_name(),
        model = gemini.model_name(),
        delay_ms = config.delay.as_millis() as u64,
        "Text generation enabled"
    );

    let generator: Arc<dyn TextGenerator> = Arc::new(Throttled::new(gemini, config.delay));
    Ok(Some(generator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(api_key: Option<&str>) -> GenerationConfig {
        GenerationConfig {
            api_key: api_key.map(str::to_string),
            model: "gemini-1.5-flash".to_string(),
            base_url: "http://localhost:9".to_string(),
            delay: Duration::ZERO,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_no_api_key_means_no_generator() {
        assert!(create_generator(&config(None)).unwrap().is_none());
    }

    #[test]
    fn test_api_key_builds_throttled_gemini() {
        let generator = create_generator(&config(Some("key"))).unwrap().unwrap();
        assert_eq!(generator.provider_name(), "gemini");
        assert_eq!(generator.model_name(), "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_shared_generator_can_be_throttled() {
        let shared: Arc<dyn TextGenerator> = Arc::new(FakeGenerator::with_response("hi", "there"));
        let throttled = Throttled::new(shared, Duration::ZERO);
        assert_eq!(throttled.generate("say hi").await.unwrap(), "there");
        assert_eq!(throttled.provider_name(), "fake");
    }
}
