//! Difference normalization
//!
//! Pure conversions from two absolute metric values into the comparative
//! figures the charts display: a signed percentage difference against the
//! baseline, and a 0-100 pair scaled against the larger of the two values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
  #[error("Baseline is zero, percent difference is undefined")]
  DivisionByZero,

  #[error("Percent difference is not a finite number")]
  NonFinite,
}

/// Radar values for one metric, both in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPair {
  pub selected_normalized: f64,
  pub comparison_normalized: f64,
}

/// Signed difference of `selected` relative to `baseline`, in percent.
/// Positive means the selected value exceeds the baseline.
pub fn percent_difference(selected: f64, baseline: f64) -> Result<f64, ArithmeticError> {
  if !selected.is_finite() || !baseline.is_finite() {
    return Err(ArithmeticError::NonFinite);
  }
  if baseline == 0.0 {
    return Err(ArithmeticError::DivisionByZero);
  }

  let difference = (selected - baseline) / baseline * 100.0;
  if difference.is_finite() {
    Ok(difference)
  } else {
    Err(ArithmeticError::NonFinite)
  }
}

/// Scale both values against their maximum. With `invert` the scale is
/// flipped so the smaller raw value displays larger ("lower is better").
pub fn normalize_to_radar(selected: f64, comparison: f64, invert: bool) -> RadarPair {
  let selected = sanitize(selected);
  let comparison = sanitize(comparison);
  let max = selected.max(comparison);

  if max <= 0.0 {
    return RadarPair { selected_normalized: 0.0, comparison_normalized: 0.0 };
  }

  let scale = |value: f64| {
    let scaled = value / max * 100.0;
    let shown = if invert { 100.0 - scaled } else { scaled };
    shown.clamp(0.0, 100.0)
  };

  RadarPair { selected_normalized: scale(selected), comparison_normalized: scale(comparison) }
}

// Negative and non-finite inputs have no meaning on a radar axis
fn sanitize(value: f64) -> f64 {
  if value.is_finite() && value > 0.0 {
    value
  } else {
    0.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
  }

  #[test]
  fn test_percent_difference_sign_convention() {
    assert!(approx(percent_difference(120.0, 100.0).unwrap(), 20.0));
    assert!(approx(percent_difference(50.0, 60.0).unwrap(), -16.666666666666664));
  }

  #[test]
  fn test_percent_difference_of_equal_values_is_zero() {
    for baseline in [0.001, 1.0, -7.5, 1e9] {
      assert_eq!(percent_difference(baseline, baseline).unwrap(), 0.0);
    }
  }

  #[test]
  fn test_percent_difference_zero_baseline() {
    assert_eq!(percent_difference(10.0, 0.0), Err(ArithmeticError::DivisionByZero));
    assert_eq!(percent_difference(0.0, 0.0), Err(ArithmeticError::DivisionByZero));
  }

  #[test]
  fn test_percent_difference_non_finite() {
    assert_eq!(percent_difference(f64::NAN, 1.0), Err(ArithmeticError::NonFinite));
    assert_eq!(percent_difference(1.0, f64::INFINITY), Err(ArithmeticError::NonFinite));
    assert_eq!(percent_difference(f64::MAX, f64::MIN_POSITIVE), Err(ArithmeticError::NonFinite));
  }

  #[test]
  fn test_radar_larger_value_maps_to_100() {
    let pair = normalize_to_radar(80.0, 40.0, false);
    assert!(approx(pair.selected_normalized, 100.0));
    assert!(approx(pair.comparison_normalized, 50.0));

    let pair = normalize_to_radar(40.0, 80.0, false);
    assert!(approx(pair.selected_normalized, 50.0));
    assert!(approx(pair.comparison_normalized, 100.0));
  }

  #[test]
  fn test_radar_inverted_is_complementary() {
    let plain = normalize_to_radar(50.0, 60.0, false);
    let inverted = normalize_to_radar(50.0, 60.0, true);
    assert!(approx(inverted.selected_normalized, 100.0 - plain.selected_normalized));
    assert!(approx(inverted.comparison_normalized, 100.0 - plain.comparison_normalized));
    assert!(approx(inverted.comparison_normalized, 0.0));
    assert!(inverted.selected_normalized > inverted.comparison_normalized);
  }

  #[test]
  fn test_radar_all_zero() {
    for invert in [false, true] {
      let pair = normalize_to_radar(0.0, 0.0, invert);
      assert_eq!(pair, RadarPair { selected_normalized: 0.0, comparison_normalized: 0.0 });
    }
  }

  #[test]
  fn test_radar_degenerate_inputs_stay_in_range() {
    let pair = normalize_to_radar(f64::NAN, 10.0, false);
    assert_eq!(pair.selected_normalized, 0.0);
    assert_eq!(pair.comparison_normalized, 100.0);

    let pair = normalize_to_radar(-5.0, f64::INFINITY, true);
    assert_eq!(pair, RadarPair { selected_normalized: 0.0, comparison_normalized: 0.0 });

    let pair = normalize_to_radar(-5.0, 10.0, true);
    assert_eq!(pair.selected_normalized, 100.0);
    assert_eq!(pair.comparison_normalized, 0.0);
  }
}
