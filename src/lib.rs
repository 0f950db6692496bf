//! Eco Cart Scorer
//!
//! Eco-scores for food products from a life-cycle emissions dataset, plus
//! lookups, recommendations and generated meal plans built on top of them.
//!
//! Layout:
//! - `data/`, `scorer/`, `catalog/`: load, validate and score the dataset
//! - `selector/`, `lookup/`: read-only queries over the catalog
//! - `generation/`, `explanation/`, `meal_plan/`: generated text with fallbacks
//! - `api_server/`: axum routes (feature `api`)

pub mod catalog;
pub mod config;
pub mod data;
pub mod explanation;
pub mod generation;
pub mod lookup;
pub mod meal_plan;
pub mod scorer;
pub mod selector;
pub mod utils;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use catalog::{Catalog, ProductRecord};
pub use config::{ConfigError, GenerationConfig, ServerConfig};
pub use data::{load_emissions, DataLoadError};
pub use explanation::RationaleWriter;
pub use generation::{create_generator, FakeGenerator, GenerationError, TextGenerator};
pub use lookup::{find_by_name, list_all, recommend, ItemSummary, LookupOutcome, ScoreResult};
pub use meal_plan::{GenerationFailure, Meal, MealPlan, MealPlanner, MealSource};
pub use scorer::{raw_composite, raw_to_eco_score, ComponentEmissions, SustainabilityCategory};
pub use selector::{derive_cart_selection, pick_random, CartSelection};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
