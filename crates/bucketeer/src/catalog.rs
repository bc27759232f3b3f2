//! Reference data helpers for bucket and material pickers

use serde::Serialize;

use crate::model::{BucketListItem, Material};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketOption {
  pub label: String,
  pub value: i64,
}

/// "CODE (dimensions) - material" entries, in catalog order
pub fn bucket_options(buckets: &[BucketListItem]) -> Vec<BucketOption> {
  buckets
    .iter()
    .map(|bucket| BucketOption {
      label: format!("{} ({}) - {}", bucket.code, bucket.dimensions, bucket.material_name),
      value: bucket.id,
    })
    .collect()
}

pub fn bucket_code(buckets: &[BucketListItem], id: i64) -> Option<&str> {
  buckets.iter().find(|bucket| bucket.id == id).map(|bucket| bucket.code.as_str())
}

pub fn material_name(materials: &[Material], id: i64) -> Option<&str> {
  materials.iter().find(|material| material.id == id).map(|material| material.name.as_str())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn buckets() -> Vec<BucketListItem> {
    vec![
      BucketListItem {
        id: 4,
        code: "AC-160".to_string(),
        dimensions: "160x110".to_string(),
        material_id: 2,
        material_name: "Nylon".to_string(),
      },
      BucketListItem {
        id: 9,
        code: "DIN-200".to_string(),
        dimensions: "200x140".to_string(),
        material_id: 1,
        material_name: "Steel".to_string(),
      },
    ]
  }

  #[test]
  fn test_bucket_options_labels() {
    let options = bucket_options(&buckets());
    assert_eq!(options[0], BucketOption { label: "AC-160 (160x110) - Nylon".to_string(), value: 4 });
    assert_eq!(options[1].value, 9);
  }

  #[test]
  fn test_lookups() {
    let buckets = buckets();
    assert_eq!(bucket_code(&buckets, 9), Some("DIN-200"));
    assert_eq!(bucket_code(&buckets, 1), None);

    let materials = vec![Material { id: 1, name: "Steel".to_string() }];
    assert_eq!(material_name(&materials, 1), Some("Steel"));
    assert_eq!(material_name(&materials, 2), None);
  }
}
