//! Normalization Utilities
//!
//! Min-max scaling of a raw score column onto [0, 1], and the fixed-ceiling
//! transform that turns a raw emissions composite into the 0-10 display score.

/// Min-max normalize a slice of raw values onto [0, 1]
///
/// Algorithm:
/// 1. Find min and max over all values
/// 2. Scale each value: (x - min) / (max - min)
/// 3. Clip to [0, 1]
///
/// Zero range (every value equal, or a single value) maps every entry to 0.0.
/// Empty input returns an empty vector.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !range.is_finite() || range <= 0.0 {
        return vec![0.0; values.len()];
    }

    values
        .iter()
        .map(|&x| ((x - min) / range).clamp(0.0, 1.0))
        .collect()
}

/// Map a raw value onto a "lower is better" 0-10 scale against a fixed ceiling
///
/// `score = 10 - (raw / ceiling) * 10`, clipped to [0, 10] and rounded to one
/// decimal place. Raw values at or above the ceiling score 0.0; a raw value of
/// zero scores 10.0.
pub fn inverted_ceiling_score(raw: f64, ceiling: f64) -> f64 {
    let scaled = (10.0 - (raw / ceiling) * 10.0).clamp(0.0, 10.0);
    round_to_one_decimal(scaled)
}

/// Round to one decimal place
///
/// Rounds the exact stored binary value, so 9.95 (stored as
/// 9.9499999...) becomes 9.9. Scaling by ten first would round the product
/// instead and drift upward on such values.
pub fn round_to_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_min_max_endpoints() {
        let normalized = min_max_normalize(&[2.0, 4.0, 6.0]);
        assert_relative_eq!(normalized[0], 0.0);
        assert_relative_eq!(normalized[1], 0.5);
        assert_relative_eq!(normalized[2], 1.0);
    }

    #[test]
    fn test_min_max_unordered_input() {
        let normalized = min_max_normalize(&[10.0, -2.0, 4.0]);
        assert_relative_eq!(normalized[0], 1.0);
        assert_relative_eq!(normalized[1], 0.0);
        assert_relative_eq!(normalized[2], 0.5);
    }

    #[test]
    fn test_min_max_zero_variance_maps_to_zero() {
        assert_eq!(min_max_normalize(&[3.3, 3.3, 3.3]), vec![0.0, 0.0, 0.0]);
        assert_eq!(min_max_normalize(&[7.0]), vec![0.0]);
    }

    #[test]
    fn test_min_max_empty() {
        assert!(min_max_normalize(&[]).is_empty());
    }

    #[test]
    fn test_inverted_ceiling_score() {
        assert_eq!(inverted_ceiling_score(0.0, 10.0), 10.0);
        assert_eq!(inverted_ceiling_score(10.0, 10.0), 0.0);
        assert_eq!(inverted_ceiling_score(20.0, 10.0), 0.0);
        assert_eq!(inverted_ceiling_score(2.5, 10.0), 7.5);
        assert_eq!(inverted_ceiling_score(0.64, 10.0), 9.4);
    }

    #[test]
    fn test_inverted_ceiling_score_rounds_stored_value() {
        assert_eq!(inverted_ceiling_score(0.05, 10.0), 9.9);
        assert_eq!(inverted_ceiling_score(0.15, 10.0), 9.8);
        assert_eq!(inverted_ceiling_score(2.85, 10.0), 7.1);
        assert_eq!(inverted_ceiling_score(1.05, 10.0), 8.9);
    }

    #[test]
    fn test_round_to_one_decimal() {
        assert_eq!(round_to_one_decimal(9.36), 9.4);
        assert_eq!(round_to_one_decimal(7.1499999999999995), 7.1);
        assert_eq!(round_to_one_decimal(-0.26), -0.3);
        assert!(round_to_one_decimal(f64::NAN).is_nan());
    }

    #[test]
    fn test_inverted_ceiling_score_never_exceeds_ten() {
        assert_eq!(inverted_ceiling_score(-3.0, 10.0), 10.0);
    }
}
