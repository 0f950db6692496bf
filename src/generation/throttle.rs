//! Minimum spacing between calls to a text generator.

use super::{GenerationError, TextGenerator};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Wraps a generator so a call never starts within `min_delay` of the last
/// successful one.
///
/// Calls are serialized: the lock is held for the whole request, so
/// concurrent callers queue behind one another.
#[derive(Debug)]
pub struct Throttled<G> {
    inner: G,
    min_delay: Duration,
    /// Completion time of the previous successful call
    last_call: Mutex<Option<Instant>>,
}

impl<G> Throttled<G> {
    pub fn new(inner: G, min_delay: Duration) -> Self {
        Self {
            inner,
            min_delay,
            last_call: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for Throttled<G> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                sleep(self.min_delay - elapsed).await;
            }
        }

        let result = self.inner.generate(prompt).await;
        if result.is_ok() {
            *last_call = Some(Instant::now());
        }
        result
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
