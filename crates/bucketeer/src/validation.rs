//! Local request checks; a request that fails here never reaches the backend

use crate::error::{ComparisonError, Result};
use crate::model::ComparisonRequest;

pub const SPEED_RANGE: (f64, f64) = (0.1, 10.0);
pub const PRODUCT_DENSITY_RANGE: (f64, f64) = (100.0, 5000.0);
pub const NUMBER_OF_ROWS_RANGE: (u32, u32) = (1, 10);
pub const PITCH_RANGE: (f64, f64) = (50.0, 500.0);
pub const FILLING_RANGE: (f64, f64) = (1.0, 100.0);

pub fn validate_request(request: &ComparisonRequest) -> Result<()> {
  check_range("speed", request.speed, SPEED_RANGE)?;
  check_range("productDensity", request.product_density, PRODUCT_DENSITY_RANGE)?;

  if let Some(rows) = request.number_of_rows {
    let (min, max) = NUMBER_OF_ROWS_RANGE;
    if !(min..=max).contains(&rows) {
      return Err(ComparisonError::validation(
        "numberOfRows",
        format!("must be between {min} and {max}"),
      ));
    }
  }
  if let Some(pitch) = request.pitch {
    check_range("pitch", pitch, PITCH_RANGE)?;
  }
  if let Some(filling) = request.filling {
    check_range("filling", filling, FILLING_RANGE)?;
  }

  check_price("selectedBucketUnitPrice", request.selected_bucket_unit_price)?;
  check_price("comparisonBucketUnitPrice", request.comparison_bucket_unit_price)?;

  check_bucket_id("selectedBucketId", request.selected_bucket_id)?;
  check_bucket_id("comparisonBucketId", request.comparison_bucket_id)?;

  Ok(())
}

/// Trimmed save name; blank names are rejected
pub fn validate_name(name: &str) -> Result<String> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(ComparisonError::validation("name", "enter a name for the comparison"));
  }
  Ok(trimmed.to_string())
}

fn check_range(field: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
  if !value.is_finite() {
    return Err(ComparisonError::validation(field, "must be a number"));
  }
  if value < min || value > max {
    return Err(ComparisonError::validation(field, format!("must be between {min} and {max}")));
  }
  Ok(())
}

fn check_price(field: &str, price: Option<f64>) -> Result<()> {
  match price {
    Some(price) if !price.is_finite() => Err(ComparisonError::validation(field, "must be a number")),
    Some(price) if price < 0.0 => Err(ComparisonError::validation(field, "must not be negative")),
    _ => Ok(()),
  }
}

fn check_bucket_id(field: &str, id: i64) -> Result<()> {
  if id <= 0 {
    return Err(ComparisonError::validation(field, "select a bucket"));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn field_of(result: Result<()>) -> String {
    match result {
      Err(ComparisonError::Validation { field, .. }) => field,
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn test_default_request_is_valid() {
    assert!(validate_request(&ComparisonRequest::new(1, 2)).is_ok());
  }

  #[test]
  fn test_optional_fields_may_be_absent() {
    let request = ComparisonRequest {
      number_of_rows: None,
      pitch: None,
      filling: None,
      ..ComparisonRequest::new(3, 4)
    };
    assert!(validate_request(&request).is_ok());
  }

  #[test]
  fn test_speed_bounds() {
    let mut request = ComparisonRequest::new(1, 2);
    request.speed = 0.0;
    assert_eq!(field_of(validate_request(&request)), "speed");
    request.speed = 10.5;
    assert_eq!(field_of(validate_request(&request)), "speed");
    request.speed = f64::NAN;
    assert_eq!(field_of(validate_request(&request)), "speed");
    request.speed = 10.0;
    assert!(validate_request(&request).is_ok());
  }

  #[test]
  fn test_out_of_range_fields() {
    let base = ComparisonRequest::new(1, 2);

    let request = ComparisonRequest { product_density: 50.0, ..base.clone() };
    assert_eq!(field_of(validate_request(&request)), "productDensity");

    let request = ComparisonRequest { number_of_rows: Some(0), ..base.clone() };
    assert_eq!(field_of(validate_request(&request)), "numberOfRows");

    let request = ComparisonRequest { pitch: Some(600.0), ..base.clone() };
    assert_eq!(field_of(validate_request(&request)), "pitch");

    let request = ComparisonRequest { filling: Some(101.0), ..base.clone() };
    assert_eq!(field_of(validate_request(&request)), "filling");

    let request = ComparisonRequest { comparison_bucket_unit_price: Some(-1.0), ..base.clone() };
    assert_eq!(field_of(validate_request(&request)), "comparisonBucketUnitPrice");

    let request = ComparisonRequest { selected_bucket_id: 0, ..base };
    assert_eq!(field_of(validate_request(&request)), "selectedBucketId");
  }

  #[test]
  fn test_validate_name() {
    assert_eq!(validate_name("  Line 3  ").unwrap(), "Line 3");
    assert!(validate_name("").is_err());
    assert!(validate_name(" \t\n").is_err());
  }
}
