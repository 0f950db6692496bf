// Axum API Server Module
//
// Purpose: JSON endpoints for eco-score lookups, recommendations and meal plans
// over a catalog loaded once at startup.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::{ServerConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::explanation::RationaleWriter;
use crate::generation::{self, TextGenerator};
use crate::lookup::{self, ItemSummary, LookupOutcome};
use crate::meal_plan::{Meal, MealPlan, MealPlanner, MealSource};
use crate::selector::{self, DEFAULT_BACKFILL_COUNT, DEFAULT_MIN_CART_ITEMS, DEFAULT_RANDOM_COUNT};

// ============================================================================
// Application State
// ============================================================================

const RATIONALE_CACHE_CAPACITY: u64 = 10_000;
const RATIONALE_CACHE_TTL: Duration = Duration::from_secs(3600); // 1 hour

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub planner: Arc<MealPlanner>,
    /// Rationale writer with a per-product cache
    pub writer: Arc<RationaleWriter>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(catalog: Catalog, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let writer = RationaleWriter::new(generator.clone())
            .with_cache(RATIONALE_CACHE_CAPACITY, RATIONALE_CACHE_TTL);

        Self {
            catalog: Arc::new(catalog),
            planner: Arc::new(MealPlanner::new(generator)),
            writer: Arc::new(writer),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load the catalog and build the generator described by `config`
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading emissions catalog...");
        let catalog = Catalog::load(&config.data_path).with_context(|| {
            format!("Failed to load emissions data from {}", config.data_path.display())
        })?;
        tracing::info!("Loaded {} products", catalog.len());

        tracing::info!("Initializing text generation...");
        let generator = generation::create_generator(&config.generation)
            .context("Failed to initialize text generation")?;

        let state = Self::new(catalog, generator).with_request_timeout(config.request_timeout);
        if !state.writer.is_enabled() {
            tracing::warn!("Rationales and meal plans will use fallback output");
        }

        Ok(state)
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let timeout = state.request_timeout;

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Catalog endpoints
        .route("/all_items", get(all_items))
        .route("/recommendations", get(recommendations))
        .route("/classify", post(classify))
        .route("/clean_label", post(clean_label))

        // Meal plan endpoints
        .route("/generate_random_meals", post(generate_random_meals))
        .route("/generate_cart_meals", post(generate_cart_meals))

        // Middleware (applied in reverse order)
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub food_name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LabelPayload {
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct CartMealsResponse {
    pub used_cart_items: Vec<String>,
    pub added_recommendations: Vec<String>,
    pub final_ingredients_used: Vec<String>,
    /// Normalized score per final ingredient (null when not in the catalog)
    pub ingredient_eco_scores: BTreeMap<String, Option<f64>>,
    pub meals: MealPlan,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn all_items(State(state): State<AppState>) -> Json<Vec<ItemSummary>> {
    Json(lookup::list_all(&state.catalog))
}

async fn recommendations(State(state): State<AppState>) -> Json<Vec<ItemSummary>> {
    let mut rng = rand::thread_rng();
    Json(lookup::recommend(
        &state.catalog,
        lookup::DEFAULT_RECOMMENDATION_COUNT,
        &mut rng,
    ))
}

async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<LookupOutcome>, AppError> {
    let Json(request) = payload?;
    let outcome = lookup::find_by_name(&state.catalog, &request.food_name, &state.writer).await;
    Ok(Json(outcome))
}

async fn clean_label(
    State(state): State<AppState>,
    payload: Result<Json<LabelPayload>, JsonRejection>,
) -> Result<Json<LabelPayload>, AppError> {
    let Json(request) = payload?;
    let label = state.writer.clean_label(&request.label).await;
    Ok(Json(LabelPayload { label }))
}

async fn generate_random_meals(State(state): State<AppState>) -> Json<Vec<Meal>> {
    let ingredients = {
        let mut rng = rand::thread_rng();
        selector::pick_random(&state.catalog, DEFAULT_RANDOM_COUNT, &mut rng)
    };

    tracing::info!("Generating random meal plan from {} ingredients", ingredients.len());
    let plan = state.planner.generate(&ingredients, MealSource::Random).await;

    Json(plan.meals)
}

async fn generate_cart_meals(
    State(state): State<AppState>,
    payload: Result<Json<Vec<String>>, JsonRejection>,
) -> Result<Json<CartMealsResponse>, AppError> {
    let Json(cart_items) = payload?;

    let selection = {
        let mut rng = rand::thread_rng();
        selector::derive_cart_selection(
            &state.catalog,
            &cart_items,
            DEFAULT_MIN_CART_ITEMS,
            DEFAULT_BACKFILL_COUNT,
            &mut rng,
        )
    };

    tracing::info!(
        cart = cart_items.len(),
        used = selection.used.len(),
        added = selection.recommended.len(),
        "Generating cart meal plan"
    );
    let meals = state
        .planner
        .generate(&selection.final_ingredients, MealSource::Cart)
        .await;

    let ingredient_eco_scores = ingredient_scores(&state.catalog, &selection.final_ingredients);

    Ok(Json(CartMealsResponse {
        used_cart_items: selection.used,
        added_recommendations: selection.recommended,
        final_ingredients_used: selection.final_ingredients,
        ingredient_eco_scores,
        meals,
    }))
}

/// Normalized score per ingredient name; later catalog rows win on duplicates
fn ingredient_scores(catalog: &Catalog, names: &[String]) -> BTreeMap<String, Option<f64>> {
    names
        .iter()
        .map(|name| {
            let score = catalog.get_exact(name).map(|r| r.eco_score_normalized);
            (name.clone(), score)
        })
        .collect()
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    InvalidBody(JsonRejection),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::InvalidBody(rejection) => (rejection.status(), rejection.body_text()),
        };

        let status = if status.is_client_error() {
            status
        } else {
            StatusCode::BAD_REQUEST
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
