//! Meal-Plan Orchestrator
//!
//! Builds a meal-planning prompt from an ingredient list, sends it to the
//! text generator and parses the first JSON object out of the reply.
//! Every failure collapses to an empty plan; callers never see an error
//! unless they ask for one through `try_generate`.

use crate::generation::{GenerationError, TextGenerator};
use crate::utils::json_span::{extract_json_object, SpanError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Which selection produced the ingredient list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSource {
    Random,
    Cart,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default)]
    pub meal_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Extras outside the cart (cart mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_items: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default)]
    pub meals: Vec<Meal>,
}

#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("reply contained no JSON object")]
    NoObjectFound,

    #[error("reply JSON did not match the meal plan shape: {0}")]
    InvalidJson(serde_json::Error),
}

impl From<SpanError> for GenerationFailure {
    fn from(err: SpanError) -> Self {
        match err {
            SpanError::NoObjectFound => GenerationFailure::NoObjectFound,
            SpanError::InvalidJson(e) => GenerationFailure::InvalidJson(e),
        }
    }
}

/// Build the meal-planning prompt for an ingredient list
///
/// Random mode restricts recipes to the listed ingredients. Cart mode
/// favours the cart and asks for any extras under `missing_items`.
pub fn build_prompt(ingredients: &[String], source: MealSource) -> String {
    let ingredient_list = ingredients.join(", ");

    match source {
        MealSource::Random => format!(
            r#"You are a meal planner focused on low-emission, healthy cooking.

Ingredients on hand:
{ingredient_list}

Suggest 5 realistic recipes.
- Use ONLY the ingredients listed above.
- Do not add anything that is not on the list.

Give each meal these fields: meal_name, description, ingredients (array of strings).

Reply with JSON only, in exactly this shape:
{{"meals": [{{"meal_name": "", "description": "", "ingredients": []}}]}}

No greeting and no commentary outside the JSON."#
        ),
        MealSource::Cart => format!(
            r#"You are a meal planner focused on low-emission, healthy cooking.

Items in the shopper's cart, followed by suggested additions:
{ingredient_list}

Suggest 5 realistic recipes.
- Use the cart items first.
- Add other ingredients only where a recipe needs them, and list each one under missing_items.

Give each meal these fields: meal_name, description, ingredients (array of strings), missing_items (array of strings).

Reply with JSON only, in exactly this shape:
{{"meals": [{{"meal_name": "", "description": "", "ingredients": [], "missing_items": []}}]}}

No greeting and no commentary outside the JSON."#
        ),
    }
}

/// Turns ingredient lists into meal plans with an optional generator
#[derive(Debug, Clone, Default)]
pub struct MealPlanner {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl MealPlanner {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// Generate and parse a plan, exposing the failure path
    pub async fn try_generate(
        &self,
        ingredients: &[String],
        source: MealSource,
    ) -> Result<MealPlan, GenerationFailure> {
        let generator = self.generator.as_ref().ok_or(GenerationError::NotConfigured)?;

        let reply = generator.generate(&build_prompt(ingredients, source)).await?;
        tracing::debug!(chars = reply.len(), "Meal plan reply received");

        let plan: MealPlan = extract_json_object(reply.trim())?;
        Ok(plan)
    }

    /// Generate a plan; any failure yields an empty plan
    pub async fn generate(&self, ingredients: &[String], source: MealSource) -> MealPlan {
        match self.try_generate(ingredients, source).await {
            Ok(plan) => {
                tracing::info!(
                    source = ?source,
                    ingredients = ingredients.len(),
                    meals = plan.meals.len(),
                    "Meal plan generated"
                );
                plan
            }
            Err(e) => {
                tracing::warn!(source = ?source, error = %e, "Meal plan generation failed");
                MealPlan::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::FakeGenerator;

    fn ingredients() -> Vec<String> {
        vec!["Oat milk".to_string(), "Rice".to_string(), "Lentils".to_string()]
    }

    fn planner(generator: FakeGenerator) -> MealPlanner {
        MealPlanner::new(Some(Arc::new(generator)))
    }

    #[test]
    fn test_prompts_differ_by_source() {
        let random = build_prompt(&ingredients(), MealSource::Random);
        let cart = build_prompt(&ingredients(), MealSource::Cart);

        assert!(random.contains("Oat milk, Rice, Lentils"));
        assert!(random.contains("ONLY"));
        assert!(!random.contains("missing_items"));
        assert!(cart.contains("missing_items"));
        assert!(cart.contains(r#"{"meals": [{"meal_name""#));
    }

    #[tokio::test]
    async fn test_parses_object_wrapped_in_prose() {
        let reply = r#"Sure! Here you go:
```json
{"meals": [{"meal_name": "Lentil rice bowl", "description": "Hearty {and} simple",
  "ingredients": ["Rice", "Lentils"]}]}
```
Enjoy."#;
        let planner = planner(FakeGenerator::new().with_default_response(reply));

        let plan = planner.generate(&ingredients(), MealSource::Random).await;
        assert_eq!(plan.meals.len(), 1);
        assert_eq!(plan.meals[0].meal_name, "Lentil rice bowl");
        assert_eq!(plan.meals[0].description, "Hearty {and} simple");
        assert_eq!(plan.meals[0].missing_items, None);
    }

    #[tokio::test]
    async fn test_cart_meals_keep_missing_items() {
        let reply = r#"{"meals": [{"meal_name": "Porridge", "description": "",
            "ingredients": ["Oat milk"], "missing_items": ["Oats"]}]}"#;
        let planner = planner(FakeGenerator::new().with_default_response(reply));

        let plan = planner.generate(&ingredients(), MealSource::Cart).await;
        assert_eq!(plan.meals[0].missing_items, Some(vec!["Oats".to_string()]));
    }

    #[tokio::test]
    async fn test_malformed_reply_yields_empty_plan() {
        let planner = planner(FakeGenerator::new().with_default_response("I cannot help with that"));
        let plan = planner.generate(&ingredients(), MealSource::Random).await;
        assert_eq!(plan, MealPlan::default());

        let err = planner
            .try_generate(&ingredients(), MealSource::Random)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationFailure::NoObjectFound));
    }

    #[tokio::test]
    async fn test_invalid_json_yields_empty_plan() {
        let planner = planner(FakeGenerator::new().with_default_response(r#"{"meals": [1, 2]}"#));

        let err = planner
            .try_generate(&ingredients(), MealSource::Random)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationFailure::InvalidJson(_)));
        assert!(planner.generate(&ingredients(), MealSource::Random).await.meals.is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_yields_empty_plan() {
        let planner = planner(FakeGenerator::failing());
        let plan = planner.generate(&ingredients(), MealSource::Cart).await;
        assert!(plan.meals.is_empty());
    }

    #[tokio::test]
    async fn test_without_generator() {
        let planner = MealPlanner::default();

        let err = planner
            .try_generate(&ingredients(), MealSource::Random)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationFailure::Generation(GenerationError::NotConfigured)));
        assert!(planner.generate(&ingredients(), MealSource::Random).await.meals.is_empty());
    }

    #[test]
    fn test_empty_plan_serialization() {
        let json = serde_json::to_value(MealPlan::default()).unwrap();
        assert_eq!(json, serde_json::json!({"meals": []}));
    }
}
