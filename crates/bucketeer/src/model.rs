//! Comparison data model as exchanged with the calculation backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ComparisonError;

/// Default operating point for a fresh comparison request
pub const DEFAULT_SPEED: f64 = 3.0;
pub const DEFAULT_PRODUCT_DENSITY: f64 = 750.0;
pub const DEFAULT_NUMBER_OF_ROWS: u32 = 2;
pub const DEFAULT_PITCH: f64 = 150.0;
pub const DEFAULT_FILLING: f64 = 95.0;

/// Every numeric bucket attribute the backend reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
  Volume,
  EdgeVolume,
  Displacement,
  TractionResistance,
  RecommendedPitch,
  UnitPrice,
  BucketsPerMeter,
  Filling,
  NumberOfRows,
  Capacity,
  AbrasionResistance,
  PricePerMeter,
}

impl Attribute {
  pub const ALL: [Attribute; 12] = [
    Attribute::Volume,
    Attribute::EdgeVolume,
    Attribute::Displacement,
    Attribute::TractionResistance,
    Attribute::RecommendedPitch,
    Attribute::UnitPrice,
    Attribute::BucketsPerMeter,
    Attribute::Filling,
    Attribute::NumberOfRows,
    Attribute::Capacity,
    Attribute::AbrasionResistance,
    Attribute::PricePerMeter,
  ];

  /// Wire name of the attribute
  pub fn key(&self) -> &'static str {
    match self {
      Attribute::Volume => "volume",
      Attribute::EdgeVolume => "edgeVolume",
      Attribute::Displacement => "displacement",
      Attribute::TractionResistance => "tractionResistance",
      Attribute::RecommendedPitch => "recommendedPitch",
      Attribute::UnitPrice => "unitPrice",
      Attribute::BucketsPerMeter => "bucketsPerMeter",
      Attribute::Filling => "filling",
      Attribute::NumberOfRows => "numberOfRows",
      Attribute::Capacity => "capacity",
      Attribute::AbrasionResistance => "abrasionResistance",
      Attribute::PricePerMeter => "pricePerMeter",
    }
  }
}

impl fmt::Display for Attribute {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

/// Measured and derived properties of one bucket, as calculated by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BucketDetails {
  pub id: i64,
  pub code: String,
  pub dimensions: String,
  pub volume: f64,
  pub edge_volume: f64,
  pub material_id: i64,
  pub material_name: String,
  pub drilling: String,
  pub displacement: f64,
  pub traction_resistance: f64,
  pub recommended_pitch: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit_price: Option<f64>,
  pub buckets_per_meter: f64,
  pub filling: f64,
  pub number_of_rows: u32,
  pub capacity: f64,
  pub abrasion_resistance: f64,
  pub price_per_meter: f64,
}

impl BucketDetails {
  /// Lookup table from attribute identifier to value.
  /// `None` only when the backend omitted an optional attribute.
  pub fn value(&self, attribute: Attribute) -> Option<f64> {
    match attribute {
      Attribute::Volume => Some(self.volume),
      Attribute::EdgeVolume => Some(self.edge_volume),
      Attribute::Displacement => Some(self.displacement),
      Attribute::TractionResistance => Some(self.traction_resistance),
      Attribute::RecommendedPitch => Some(self.recommended_pitch),
      Attribute::UnitPrice => self.unit_price,
      Attribute::BucketsPerMeter => Some(self.buckets_per_meter),
      Attribute::Filling => Some(self.filling),
      Attribute::NumberOfRows => Some(f64::from(self.number_of_rows)),
      Attribute::Capacity => Some(self.capacity),
      Attribute::AbrasionResistance => Some(self.abrasion_resistance),
      Attribute::PricePerMeter => Some(self.price_per_meter),
    }
  }
}

/// Signed percent differences of the selected bucket against the comparison bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DifferenceSet {
  pub dimensions_difference: Option<f64>,
  pub volume_difference: Option<f64>,
  pub buckets_per_meter_difference: Option<f64>,
  pub filling_difference: Option<f64>,
  pub capacity_difference: Option<f64>,
  pub edge_volume_difference: Option<f64>,
  pub abrasion_resistance_difference: Option<f64>,
  pub traction_resistance_difference: Option<f64>,
  pub displacement_difference: Option<f64>,
  pub price_per_unit_difference: Option<f64>,
  pub price_per_meter_difference: Option<f64>,
}

impl DifferenceSet {
  /// Difference tracked for an attribute, if the backend reports one
  pub fn get(&self, attribute: Attribute) -> Option<f64> {
    match attribute {
      Attribute::Volume => self.volume_difference,
      Attribute::EdgeVolume => self.edge_volume_difference,
      Attribute::Displacement => self.displacement_difference,
      Attribute::TractionResistance => self.traction_resistance_difference,
      Attribute::UnitPrice => self.price_per_unit_difference,
      Attribute::BucketsPerMeter => self.buckets_per_meter_difference,
      Attribute::Filling => self.filling_difference,
      Attribute::Capacity => self.capacity_difference,
      Attribute::AbrasionResistance => self.abrasion_resistance_difference,
      Attribute::PricePerMeter => self.price_per_meter_difference,
      Attribute::RecommendedPitch | Attribute::NumberOfRows => None,
    }
  }
}

/// AI generated summary attached to a persisted comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
  pub text: String,
  #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
  pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  pub selected_bucket: BucketDetails,
  pub comparison_bucket: BucketDetails,
  #[serde(default)]
  pub comparison_result: DifferenceSet,
  #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
  pub calculated_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub insight: Option<Insight>,
}

impl ComparisonResult {
  pub fn is_persisted(&self) -> bool {
    self.id.is_some()
  }
}

/// A comparison stored by the backend; always carries an id
#[derive(Debug, Clone, PartialEq)]
pub struct SavedComparison {
  id: i64,
  result: ComparisonResult,
}

impl SavedComparison {
  pub fn id(&self) -> i64 {
    self.id
  }

  pub fn name(&self) -> Option<&str> {
    self.result.name.as_deref()
  }

  pub fn calculated_at(&self) -> Option<DateTime<Utc>> {
    self.result.calculated_at
  }

  pub fn result(&self) -> &ComparisonResult {
    &self.result
  }

  pub fn into_result(self) -> ComparisonResult {
    self.result
  }
}

impl TryFrom<ComparisonResult> for SavedComparison {
  type Error = ComparisonError;

  fn try_from(result: ComparisonResult) -> Result<Self, Self::Error> {
    match result.id {
      Some(id) => Ok(Self { id, result }),
      None => Err(ComparisonError::NotPersisted),
    }
  }
}

/// Parameters for a comparison calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// Belt speed (m/s)
  pub speed: f64,
  /// Product density (kg/m3)
  pub product_density: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub number_of_rows: Option<u32>,
  /// Bucket pitch (mm)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pitch: Option<f64>,
  /// Filling (%)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub filling: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub selected_bucket_unit_price: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub comparison_bucket_unit_price: Option<f64>,
  pub selected_bucket_id: i64,
  pub comparison_bucket_id: i64,
}

impl ComparisonRequest {
  /// Request at the default operating point
  pub fn new(selected_bucket_id: i64, comparison_bucket_id: i64) -> Self {
    Self {
      id: None,
      name: None,
      speed: DEFAULT_SPEED,
      product_density: DEFAULT_PRODUCT_DENSITY,
      number_of_rows: Some(DEFAULT_NUMBER_OF_ROWS),
      pitch: Some(DEFAULT_PITCH),
      filling: Some(DEFAULT_FILLING),
      selected_bucket_unit_price: None,
      comparison_bucket_unit_price: None,
      selected_bucket_id,
      comparison_bucket_id,
    }
  }

  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }
}

/// Catalog entry used to pick buckets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketListItem {
  pub id: i64,
  pub code: String,
  pub dimensions: String,
  pub material_id: i64,
  pub material_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
  pub id: i64,
  pub name: String,
}

/// Backend timestamps arrive either as RFC 3339 or as zone-less ISO strings (UTC)
pub mod timestamp {
  use chrono::{DateTime, NaiveDateTime, Utc};
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
      .map(|parsed| parsed.with_timezone(&Utc))
      .ok()
      .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc()))
  }

  pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match value {
      Some(value) => serializer.serialize_some(&value.to_rfc3339()),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse))
  }
}
