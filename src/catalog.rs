//! Product Catalog - the loaded, scored, immutable table
//!
//! Built once at startup from a scored DataFrame and shared read-only
//! (behind `Arc`) by every lookup, recommendation and selection.

use crate::data::{self, DataLoadError, FOOD_PRODUCT_COL, IMAGE_LINK_COL, TOTAL_EMISSIONS_COL};
use crate::scorer::{
    self, ComponentEmissions, EmissionComponent, SustainabilityCategory, NORMALIZED_SCORE_COL,
    RAW_SCORE_COL,
};
use crate::utils::frame_helpers::{f64_values, string_values};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::Path;

/// One product row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub name: String,
    /// kg CO2e per kg product
    pub total_emissions: f64,
    pub components: ComponentEmissions,
    pub image_link: Option<String>,
    pub eco_score_raw: f64,
    /// Min-max scaled over the whole catalog, in [0, 1]
    pub eco_score_normalized: f64,
}

impl ProductRecord {
    /// Human-facing 0-10 score derived from the raw composite
    pub fn eco_score(&self) -> f64 {
        scorer::raw_to_eco_score(self.eco_score_raw)
    }

    pub fn category(&self) -> SustainabilityCategory {
        SustainabilityCategory::from_score(self.eco_score())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    /// Load, validate and score a dataset file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let df = data::load_emissions(path)?;
        Self::from_scored_frame(&scorer::score_frame(df)?)
    }

    /// Validate and score an in-memory frame
    pub fn from_frame(df: DataFrame) -> Result<Self, DataLoadError> {
        let prepared = data::prepare_frame(df)?;
        Self::from_scored_frame(&scorer::score_frame(prepared)?)
    }

    /// Wrap records as-is (derived scores are not recomputed)
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    /// Extract typed records from a frame carrying the derived score columns
    fn from_scored_frame(df: &DataFrame) -> Result<Self, DataLoadError> {
        let names = string_values(df, FOOD_PRODUCT_COL)?;
        let totals = f64_values(df, TOTAL_EMISSIONS_COL)?;
        let images = string_values(df, IMAGE_LINK_COL)?;
        let raw = f64_values(df, RAW_SCORE_COL)?;
        let normalized = f64_values(df, NORMALIZED_SCORE_COL)?;

        let mut component_values = Vec::with_capacity(EmissionComponent::ALL.len());
        for component in EmissionComponent::ALL {
            component_values.push((component, f64_values(df, component.column())?));
        }

        let null_at = |column: &str, row: usize| DataLoadError::NullValue {
            column: column.to_string(),
            row,
        };

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let name = names[row].clone().ok_or_else(|| null_at(FOOD_PRODUCT_COL, row))?;
            let total_emissions = totals[row].ok_or_else(|| null_at(TOTAL_EMISSIONS_COL, row))?;

            // ALL order matches the enum discriminants
            let mut values = [0.0; 6];
            for (slot, (component, column)) in values.iter_mut().zip(&component_values) {
                *slot = column[row].ok_or_else(|| null_at(component.column(), row))?;
            }
            let components = ComponentEmissions::from_fn(|component| values[component as usize]);

            records.push(ProductRecord {
                name,
                total_emissions,
                components,
                image_link: images[row].clone(),
                eco_score_raw: raw[row].ok_or_else(|| null_at(RAW_SCORE_COL, row))?,
                eco_score_normalized: normalized[row]
                    .ok_or_else(|| null_at(NORMALIZED_SCORE_COL, row))?,
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record whose name equals `name` exactly (case-sensitive)
    ///
    /// With duplicate names the last row in table order wins.
    pub fn get_exact(&self, name: &str) -> Option<&ProductRecord> {
        self.records.iter().rev().find(|r| r.name == name)
    }
}
