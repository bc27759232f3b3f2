//! Chart projections
//!
//! Turns a comparison result into the two chart-ready structures the
//! rendering side consumes. Recomputed for every new result, never stored.

use serde::Serialize;
use tracing::debug;

use crate::metrics::{MetricSpec, BAR_METRICS, RADAR_METRICS};
use crate::model::{Attribute, ComparisonResult};
use crate::normalize::{normalize_to_radar, percent_difference};

pub const BAR_SERIES_LABEL: &str = "Difference (%)";

const POSITIVE_FILL: &str = "rgba(75, 192, 192, 0.6)";
const POSITIVE_BORDER: &str = "rgb(75, 192, 192)";
const NEGATIVE_FILL: &str = "rgba(255, 99, 132, 0.6)";
const NEGATIVE_BORDER: &str = "rgb(255, 99, 132)";

const SELECTED_COLOR: &str = "rgb(13, 127, 242)";
const COMPARISON_COLOR: &str = "rgb(242, 127, 13)";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarEntry {
  pub attribute: Attribute,
  pub label: &'static str,
  /// Signed percent difference, always finite
  pub value: f64,
  pub favorable: bool,
  /// The difference could not be determined and was clamped to 0
  pub degenerate: bool,
  pub fill_color: &'static str,
  pub border_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
  pub label: &'static str,
  pub entries: Vec<BarEntry>,
}

impl BarSeries {
  pub fn labels(&self) -> Vec<&'static str> {
    self.entries.iter().map(|entry| entry.label).collect()
  }

  pub fn values(&self) -> Vec<f64> {
    self.entries.iter().map(|entry| entry.value).collect()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarDataset {
  /// Bucket code
  pub label: String,
  pub values: Vec<f64>,
  pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
  pub labels: Vec<&'static str>,
  pub selected: RadarDataset,
  pub comparison: RadarDataset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
  pub bars: BarSeries,
  pub radar: RadarSeries,
}

/// Build both chart structures for a result
pub fn project(result: &ComparisonResult) -> ChartSet {
  ChartSet { bars: project_bars(result), radar: project_radar(result) }
}

pub fn project_bars(result: &ComparisonResult) -> BarSeries {
  let entries = BAR_METRICS.iter().map(|spec| bar_entry(result, spec)).collect();
  BarSeries { label: BAR_SERIES_LABEL, entries }
}

pub fn project_radar(result: &ComparisonResult) -> RadarSeries {
  let mut selected = Vec::with_capacity(RADAR_METRICS.len());
  let mut comparison = Vec::with_capacity(RADAR_METRICS.len());

  for spec in RADAR_METRICS {
    let pair = normalize_to_radar(
      result.selected_bucket.value(spec.attribute).unwrap_or(0.0),
      result.comparison_bucket.value(spec.attribute).unwrap_or(0.0),
      spec.lower_is_better,
    );
    selected.push(pair.selected_normalized);
    comparison.push(pair.comparison_normalized);
  }

  RadarSeries {
    labels: RADAR_METRICS.iter().map(|spec| spec.label).collect(),
    selected: RadarDataset {
      label: result.selected_bucket.code.clone(),
      values: selected,
      color: SELECTED_COLOR,
    },
    comparison: RadarDataset {
      label: result.comparison_bucket.code.clone(),
      values: comparison,
      color: COMPARISON_COLOR,
    },
  }
}

fn bar_entry(result: &ComparisonResult, spec: &MetricSpec) -> BarEntry {
  let (value, degenerate) = match difference_for(result, spec.attribute) {
    Some(value) => (value, false),
    None => (0.0, true),
  };

  let favorable = if spec.lower_is_better { value <= 0.0 } else { value >= 0.0 };
  let (fill_color, border_color) =
    if value >= 0.0 { (POSITIVE_FILL, POSITIVE_BORDER) } else { (NEGATIVE_FILL, NEGATIVE_BORDER) };

  BarEntry {
    attribute: spec.attribute,
    label: spec.label,
    value,
    favorable,
    degenerate,
    fill_color,
    border_color,
  }
}

/// Backend difference first, then one derived from the raw values
fn difference_for(result: &ComparisonResult, attribute: Attribute) -> Option<f64> {
  if let Some(value) = result.comparison_result.get(attribute).filter(|v| v.is_finite()) {
    return Some(value);
  }

  let selected = result.selected_bucket.value(attribute)?;
  let baseline = result.comparison_bucket.value(attribute)?;
  match percent_difference(selected, baseline) {
    Ok(value) => Some(value),
    Err(e) => {
      debug!(%attribute, selected, baseline, "difference undefined: {e}");
      None
    }
  }
}
