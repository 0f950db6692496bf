//! Fake text generator for testing.
//!
//! Returns canned responses matched by prompt substring so tests run without
//! network access.

use super::{GenerationError, TextGenerator};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A fake generator for testing.
///
/// Responses are matched in registration order by checking whether the
/// prompt contains the pattern (case-insensitive). Without a match the
/// default response is returned, or an error if there is none.
#[derive(Debug, Default)]
pub struct FakeGenerator {
    responses: Vec<(String, String)>,
    default_response: Option<String>,
    fail_all: bool,
    calls: AtomicUsize,
}

impl FakeGenerator {
    /// A generator with no responses; every call fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator answering prompts containing `prompt_contains`.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut generator = Self::new();
        generator.add_response(prompt_contains, response);
        generator
    }

    /// A generator that fails every call with a request error.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .push((prompt_contains.to_lowercase(), response.to_string()));
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_all {
            return Err(GenerationError::RequestFailed(
                "FakeGenerator: configured to fail".to_string(),
            ));
        }

        let prompt_lower = prompt.to_lowercase();
        if let Some((_, response)) = self
            .responses
            .iter()
            .find(|(pattern, _)| prompt_lower.contains(pattern.as_str()))
        {
            return Ok(response.clone());
        }

        self.default_response.clone().ok_or_else(|| {
            let preview: String = prompt.chars().take(100).collect();
            GenerationError::RequestFailed(format!(
                "FakeGenerator: no response configured for prompt: {preview}"
            ))
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
