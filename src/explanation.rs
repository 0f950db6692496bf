//! Explanation text for lookups
//!
//! Prose rationales for a product's eco-score and cleaned display labels.
//! Both degrade to fixed text when no generator is configured or a call
//! fails, so a lookup always completes.

use crate::catalog::ProductRecord;
use crate::generation::{GenerationError, TextGenerator};
use crate::scorer::{EmissionComponent, SustainabilityCategory};
use moka::future::Cache;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

pub const MISSING_KEY_RATIONALE: &str =
    "Sustainability analysis unavailable: Missing Gemini API key";

pub const API_ERROR_RATIONALE: &str = "Sustainability analysis unavailable: API error occurred";

/// Fixed rationale shown when generation is unavailable
pub fn fallback_rationale(err: &GenerationError) -> &'static str {
    match err {
        GenerationError::NotConfigured => MISSING_KEY_RATIONALE,
        _ => API_ERROR_RATIONALE,
    }
}

/// Prompt asking for a two-part explanation of one product's score
pub fn rationale_prompt(record: &ProductRecord, category: SustainabilityCategory) -> String {
    let mut components = String::new();
    for component in EmissionComponent::ALL {
        let _ = writeln!(
            components,
            "- {}: {:.2}",
            component.column(),
            record.components.get(component)
        );
    }

    format!(
        "You explain the carbon footprint of grocery products to shoppers in plain language.\n\
         \n\
         Product: {name}\n\
         Sustainability label: {category}\n\
         Total emissions (kg CO2e per kg): {total:.2}\n\
         \n\
         Emissions by life-cycle stage:\n\
         {components}\n\
         Answer in two short sections:\n\
         1. Eco-Score Summary: why the product received its label.\n\
         2. Recommendation: whether it is a good sustainable choice.\n\
         \n\
         Stay factual and concise.\n",
        name = record.name,
        category = category,
        total = record.total_emissions,
    )
}

/// Prompt asking to tidy a raw dataset product name for display
pub fn label_prompt(label: &str) -> String {
    format!(
        "Rewrite this grocery product name so it reads well in a shopping app.\n\
         \n\
         Product name: \"{label}\"\n\
         \n\
         - Use proper capitalization\n\
         - Put details such as percentages in parentheses\n\
         - Drop stray periods, dashes and underscores\n\
         - Keep the meaning and keep it short\n\
         \n\
         Reply with the cleaned name only.\n"
    )
}

/// Writes rationales and display labels with an optional generator
#[derive(Debug, Clone, Default)]
pub struct RationaleWriter {
    generator: Option<Arc<dyn TextGenerator>>,
    /// Generated rationales keyed by product name
    cache: Option<Cache<String, String>>,
}

impl RationaleWriter {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            cache: None,
        }
    }

    /// Keep successful rationales for `ttl`; fallback texts are never cached
    pub fn with_cache(mut self, max_capacity: u64, ttl: Duration) -> Self {
        self.cache = Some(
            Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        );
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Generated rationale, exposing the failure path
    pub async fn try_rationale(
        &self,
        record: &ProductRecord,
        category: SustainabilityCategory,
    ) -> Result<String, GenerationError> {
        let generator = self.generator.as_ref().ok_or(GenerationError::NotConfigured)?;
        let text = generator.generate(&rationale_prompt(record, category)).await?;
        Ok(text.replace("**", "").trim().to_string())
    }

    /// Rationale text, or the fixed unavailable message
    pub async fn rationale(
        &self,
        record: &ProductRecord,
        category: SustainabilityCategory,
    ) -> String {
        if let Some(cached) = self.cached_rationale(&record.name).await {
            return cached;
        }

        match self.try_rationale(record, category).await {
            Ok(text) => {
                if let Some(cache) = &self.cache {
                    cache.insert(record.name.clone(), text.clone()).await;
                }
                text
            }
            Err(e) => {
                if !matches!(e, GenerationError::NotConfigured) {
                    tracing::warn!(product = %record.name, error = %e, "Rationale generation failed");
                }
                fallback_rationale(&e).to_string()
            }
        }
    }

    async fn cached_rationale(&self, name: &str) -> Option<String> {
        match &self.cache {
            Some(cache) => cache.get(name).await,
            None => None,
        }
    }

    /// Cleaned display label; falls back to the trimmed input
    pub async fn clean_label(&self, label: &str) -> String {
        let Some(generator) = &self.generator else {
            return label.trim().to_string();
        };

        match generator.generate(&label_prompt(label)).await {
            Ok(text) => {
                let cleaned = text.trim().replace('"', "");
                if cleaned.is_empty() {
                    label.trim().to_string()
                } else {
                    cleaned
                }
            }
            Err(e) => {
                tracing::warn!(label, error = %e, "Label cleaning failed");
                label.trim().to_string()
            }
        }
    }
}
