//! Display helpers for differences and save names

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
  Positive,
  Negative,
  Neutral,
}

impl Tone {
  pub fn of(value: f64) -> Self {
    if value > 0.0 {
      Tone::Positive
    } else if value < 0.0 {
      Tone::Negative
    } else {
      Tone::Neutral
    }
  }
}

/// "+12.35%", "-3.10%", "0.00%"
pub fn format_difference(value: f64) -> String {
  let sign = if value > 0.0 { "+" } else { "" };
  format!("{sign}{value:.2}%")
}

/// Magnitude only, two decimals
pub fn format_difference_abs(value: f64) -> String {
  format!("{:.2}", value.abs())
}

/// Name proposed when saving a comparison on `date`
pub fn default_save_name(date: NaiveDate) -> String {
  format!("Comparison - {}", date.format("%d/%m/%Y"))
}
