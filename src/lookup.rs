//! Lookup and Recommendation Service
//!
//! Read-only queries over the catalog: name lookup with a scored result,
//! the full item list, and random low-emission recommendations.

use crate::catalog::{Catalog, ProductRecord};
use crate::explanation::RationaleWriter;
use crate::scorer::{ComponentEmissions, SustainabilityCategory};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Normalized score at or below which a product counts as sustainable
pub const SUSTAINABLE_THRESHOLD: f64 = 0.33;

pub const DEFAULT_RECOMMENDATION_COUNT: usize = 5;

/// Name and image for list views
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub name: String,
    pub image_link: Option<String>,
}

impl From<&ProductRecord> for ItemSummary {
    fn from(record: &ProductRecord) -> Self {
        Self {
            name: record.name.trim().to_string(),
            image_link: record.image_link.clone(),
        }
    }
}

/// Scored lookup result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub name: String,
    pub label: SustainabilityCategory,
    /// Human-facing 0-10 score
    pub eco_score: f64,
    pub rationale: String,
    pub components: ComponentEmissions,
    pub total_emissions: f64,
    pub image_link: Option<String>,
}

impl ScoreResult {
    pub fn new(record: &ProductRecord, rationale: String) -> Self {
        Self {
            name: record.name.clone(),
            label: record.category(),
            eco_score: record.eco_score(),
            rationale,
            components: record.components,
            total_emissions: record.total_emissions,
            image_link: record.image_link.clone(),
        }
    }
}

/// Payload returned when no product matches
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotFound {
    pub error: String,
    pub image_link: Option<String>,
}

impl Default for NotFound {
    fn default() -> Self {
        Self {
            error: "Item not found".to_string(),
            image_link: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LookupOutcome {
    Found(ScoreResult),
    NotFound(NotFound),
}

/// First record whose name contains `query`, case-insensitively
///
/// The query is trimmed first; an empty query matches the first row.
pub fn find_record<'a>(catalog: &'a Catalog, query: &str) -> Option<&'a ProductRecord> {
    let needle = query.trim().to_lowercase();
    catalog
        .iter()
        .find(|r| r.name.to_lowercase().contains(&needle))
}

/// Look up a product and build its scored result with a rationale
pub async fn find_by_name(
    catalog: &Catalog,
    query: &str,
    writer: &RationaleWriter,
) -> LookupOutcome {
    match find_record(catalog, query) {
        Some(record) => {
            let rationale = writer.rationale(record, record.category()).await;
            LookupOutcome::Found(ScoreResult::new(record, rationale))
        }
        None => {
            tracing::debug!(query, "No catalog match");
            LookupOutcome::NotFound(NotFound::default())
        }
    }
}

/// Every catalog row, in table order
pub fn list_all(catalog: &Catalog) -> Vec<ItemSummary> {
    catalog.iter().map(ItemSummary::from).collect()
}

/// Random sample of `n` low-emission products
///
/// Samples from rows with `eco_score_normalized <= 0.33`. When fewer than
/// `n` rows qualify the sample is drawn from the whole catalog instead; a
/// catalog smaller than `n` is returned whole, shuffled.
pub fn recommend<R: Rng + ?Sized>(catalog: &Catalog, n: usize, rng: &mut R) -> Vec<ItemSummary> {
    let sustainable: Vec<&ProductRecord> = catalog
        .iter()
        .filter(|r| r.eco_score_normalized <= SUSTAINABLE_THRESHOLD)
        .collect();

    let pool = if sustainable.len() >= n {
        sustainable
    } else {
        tracing::debug!(
            eligible = sustainable.len(),
            requested = n,
            "Too few sustainable items, sampling whole catalog"
        );
        catalog.iter().collect()
    };

    pool.choose_multiple(rng, n)
        .map(|record| ItemSummary::from(*record))
        .collect()
}
