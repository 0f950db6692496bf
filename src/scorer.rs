//! Eco-Score Engine
//!
//! Weighted emissions composite, dataset-wide min-max normalization, and the
//! fixed-ceiling 0-10 display score with its sustainability category.
//!
//! Two separate scales live here and must not be mixed up:
//! - `eco_score_normalized` (0-1): relative to the currently loaded dataset
//! - `raw_to_eco_score` (0-10): absolute, against a 10 kg CO2e/kg ceiling

use crate::data::DataLoadError;
use crate::utils::frame_helpers::f64_values;
use crate::utils::normalization::{inverted_ceiling_score, min_max_normalize};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived column: weighted emissions composite
pub const RAW_SCORE_COL: &str = "eco_score_raw";

/// Derived column: min-max normalized composite (0-1)
pub const NORMALIZED_SCORE_COL: &str = "eco_score_normalized";

/// Ceiling for the display score (kg CO2e per kg product)
pub const MAX_EMISSIONS: f64 = 10.0;

/// Emission categories contributing to the composite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmissionComponent {
    Agriculture,
    Iluc,
    Processing,
    Packaging,
    Transport,
    Retail,
}

impl EmissionComponent {
    pub const ALL: [EmissionComponent; 6] = [
        EmissionComponent::Agriculture,
        EmissionComponent::Iluc,
        EmissionComponent::Processing,
        EmissionComponent::Packaging,
        EmissionComponent::Transport,
        EmissionComponent::Retail,
    ];

    /// Column name in the source dataset
    pub fn column(self) -> &'static str {
        match self {
            EmissionComponent::Agriculture => "Agriculture",
            EmissionComponent::Iluc => "ILUC",
            EmissionComponent::Processing => "Processing",
            EmissionComponent::Packaging => "Packaging",
            EmissionComponent::Transport => "Transport",
            EmissionComponent::Retail => "Retail",
        }
    }

    /// Fixed weight in the composite (weights sum to 1.0)
    pub fn weight(self) -> f64 {
        match self {
            EmissionComponent::Agriculture => 0.50,
            EmissionComponent::Iluc => 0.20,
            EmissionComponent::Processing => 0.10,
            EmissionComponent::Packaging => 0.14,
            EmissionComponent::Transport => 0.03,
            EmissionComponent::Retail => 0.03,
        }
    }
}

/// Per-component emissions for one product (kg CO2e per kg)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentEmissions {
    #[serde(rename = "Agriculture")]
    pub agriculture: f64,
    #[serde(rename = "ILUC")]
    pub iluc: f64,
    #[serde(rename = "Processing")]
    pub processing: f64,
    #[serde(rename = "Packaging")]
    pub packaging: f64,
    #[serde(rename = "Transport")]
    pub transport: f64,
    #[serde(rename = "Retail")]
    pub retail: f64,
}

impl ComponentEmissions {
    /// Build from a per-component accessor
    pub fn from_fn(mut value: impl FnMut(EmissionComponent) -> f64) -> Self {
        Self {
            agriculture: value(EmissionComponent::Agriculture),
            iluc: value(EmissionComponent::Iluc),
            processing: value(EmissionComponent::Processing),
            packaging: value(EmissionComponent::Packaging),
            transport: value(EmissionComponent::Transport),
            retail: value(EmissionComponent::Retail),
        }
    }

    pub fn get(&self, component: EmissionComponent) -> f64 {
        match component {
            EmissionComponent::Agriculture => self.agriculture,
            EmissionComponent::Iluc => self.iluc,
            EmissionComponent::Processing => self.processing,
            EmissionComponent::Packaging => self.packaging,
            EmissionComponent::Transport => self.transport,
            EmissionComponent::Retail => self.retail,
        }
    }
}

/// Weighted emissions composite: Σ component × weight
pub fn raw_composite(components: &ComponentEmissions) -> f64 {
    EmissionComponent::ALL
        .iter()
        .map(|&c| components.get(c) * c.weight())
        .sum()
}

/// Convert a raw composite onto the 0-10 "lower emissions is better" scale
///
/// Uses a fixed ceiling of 10 kg CO2e/kg, clipped and rounded to one decimal.
pub fn raw_to_eco_score(raw: f64) -> f64 {
    inverted_ceiling_score(raw, MAX_EMISSIONS)
}

/// Sustainability band for a 0-10 eco-score
///
/// Lower bounds are inclusive: 7.0 is High, 4.0 is Medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SustainabilityCategory {
    #[serde(rename = "High Sustainability")]
    High,
    #[serde(rename = "Medium Sustainability")]
    Medium,
    #[serde(rename = "Low Sustainability")]
    Low,
}

impl SustainabilityCategory {
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            SustainabilityCategory::High
        } else if score >= 4.0 {
            SustainabilityCategory::Medium
        } else {
            SustainabilityCategory::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SustainabilityCategory::High => "High Sustainability",
            SustainabilityCategory::Medium => "Medium Sustainability",
            SustainabilityCategory::Low => "Low Sustainability",
        }
    }
}

impl fmt::Display for SustainabilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Append `eco_score_raw` and `eco_score_normalized` to a validated frame
///
/// The frame must already carry every component column as non-null Float64
/// (see `data::prepare_frame`). Normalization runs over all rows of this
/// frame, so it is recomputed for every dataset.
pub fn score_frame(mut df: DataFrame) -> Result<DataFrame, DataLoadError> {
    let mut raw = vec![0.0; df.height()];

    for component in EmissionComponent::ALL {
        let values = f64_values(&df, component.column())?;
        for (row, value) in values.into_iter().enumerate() {
            let value = value.ok_or_else(|| DataLoadError::NullValue {
                column: component.column().to_string(),
                row,
            })?;
            raw[row] += value * component.weight();
        }
    }

    let normalized = min_max_normalize(&raw);

    df.with_column(Series::new(RAW_SCORE_COL.into(), raw))?;
    df.with_column(Series::new(NORMALIZED_SCORE_COL.into(), normalized))?;

    Ok(df)
}
