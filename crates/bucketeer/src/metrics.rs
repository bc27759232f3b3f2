//! Tracked metric tables
//!
//! The chart projections walk these tables in order. Tracking another metric
//! means adding a row here.

use crate::model::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
  pub attribute: Attribute,
  pub label: &'static str,
  /// Smaller values are favorable (prices)
  pub lower_is_better: bool,
}

impl MetricSpec {
  const fn higher(attribute: Attribute, label: &'static str) -> Self {
    Self { attribute, label, lower_is_better: false }
  }

  const fn lower(attribute: Attribute, label: &'static str) -> Self {
    Self { attribute, label, lower_is_better: true }
  }
}

/// Relative-difference bars
pub const BAR_METRICS: &[MetricSpec] = &[
  MetricSpec::higher(Attribute::Volume, "Volume"),
  MetricSpec::higher(Attribute::Capacity, "Capacity"),
  MetricSpec::higher(Attribute::AbrasionResistance, "Abrasion resistance"),
  MetricSpec::higher(Attribute::TractionResistance, "Traction resistance"),
  MetricSpec::lower(Attribute::PricePerMeter, "Price per meter"),
];

/// Normalized radar axes
pub const RADAR_METRICS: &[MetricSpec] = &[
  MetricSpec::higher(Attribute::Volume, "Volume"),
  MetricSpec::higher(Attribute::Capacity, "Capacity"),
  MetricSpec::higher(Attribute::AbrasionResistance, "Abrasion resistance"),
  MetricSpec::higher(Attribute::TractionResistance, "Traction resistance"),
  MetricSpec::lower(Attribute::PricePerMeter, "Price per meter"),
];

pub fn spec_for(attribute: Attribute) -> Option<&'static MetricSpec> {
  BAR_METRICS.iter().chain(RADAR_METRICS).find(|spec| spec.attribute == attribute)
}
