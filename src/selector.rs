//! Ingredient Selector
//!
//! Picks the ingredient list handed to the meal planner: either a uniform
//! random sample of catalog names, or the user's cart backfilled with random
//! catalog items when the cart is too small.

use crate::catalog::Catalog;
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;

/// Ingredients drawn for a random meal plan
pub const DEFAULT_RANDOM_COUNT: usize = 30;

/// Cart size below which recommendations are mixed in
pub const DEFAULT_MIN_CART_ITEMS: usize = 5;

/// Ingredients drawn to backfill a short cart
pub const DEFAULT_BACKFILL_COUNT: usize = 30;

/// Result of matching a cart against the catalog
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartSelection {
    /// Cart items found in the catalog (exact match, cart order)
    pub used: Vec<String>,
    /// Random catalog names added as backfill (empty when the cart sufficed)
    pub recommended: Vec<String>,
    /// Ingredients actually handed to the planner
    pub final_ingredients: Vec<String>,
}

/// Catalog names with duplicates removed, first occurrence order
fn distinct_names(catalog: &Catalog) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    catalog
        .iter()
        .map(|r| r.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Uniform sample without replacement of up to `n` distinct product names
///
/// Returns `min(n, distinct names)` entries; an empty catalog yields an
/// empty list.
pub fn pick_random<R: Rng + ?Sized>(catalog: &Catalog, n: usize, rng: &mut R) -> Vec<String> {
    distinct_names(catalog)
        .choose_multiple(rng, n)
        .map(|name| name.to_string())
        .collect()
}

/// Match cart items against the catalog, backfilling when too few match
///
/// # Arguments
/// * `cart_items` - Names from the user's cart (case-sensitive exact match)
/// * `min_required` - Matched items needed to skip backfill
/// * `backfill_n` - Random names drawn when backfilling
///
/// When backfilling, `final_ingredients` is the de-duplicated union of the
/// matched cart items and the random draw.
pub fn derive_cart_selection<R: Rng + ?Sized>(
    catalog: &Catalog,
    cart_items: &[String],
    min_required: usize,
    backfill_n: usize,
    rng: &mut R,
) -> CartSelection {
    let available: FxHashSet<&str> = catalog.iter().map(|r| r.name.as_str()).collect();

    let used: Vec<String> = cart_items
        .iter()
        .filter(|item| available.contains(item.as_str()))
        .cloned()
        .collect();

    if used.len() >= min_required {
        tracing::debug!(used = used.len(), "Cart has enough catalog items");
        return CartSelection {
            final_ingredients: used.clone(),
            used,
            recommended: Vec::new(),
        };
    }

    tracing::debug!(
        used = used.len(),
        min_required,
        "Not enough cart ingredients, adding recommendations"
    );

    let recommended = pick_random(catalog, backfill_n, rng);

    let mut seen = FxHashSet::default();
    let final_ingredients = used
        .iter()
        .chain(recommended.iter())
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect();

    CartSelection {
        used,
        recommended,
        final_ingredients,
    }
}
