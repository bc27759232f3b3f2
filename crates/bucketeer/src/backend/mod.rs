//! Boundary to the calculation and catalog services
//!
//! The session only talks to these traits. [`http::HttpBackend`] implements
//! both over the REST API; tests substitute mocks or in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{BucketListItem, ComparisonRequest, ComparisonResult, Material, SavedComparison};

pub mod http;

pub use http::HttpBackend;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalculationBackend: Send + Sync {
  /// Run a comparison without persisting it
  async fn calculate_comparison(&self, request: &ComparisonRequest) -> Result<ComparisonResult>;

  /// Run and persist a comparison; the request carries the name
  async fn save_comparison(&self, request: &ComparisonRequest) -> Result<ComparisonResult>;

  /// Comparisons saved by the current user
  async fn user_comparisons(&self) -> Result<Vec<SavedComparison>>;

  async fn comparison_by_id(&self, id: i64) -> Result<ComparisonResult>;

  /// Attach (or replace, with `regenerate`) the AI insight of a saved comparison
  async fn generate_insight(&self, id: i64, regenerate: bool) -> Result<ComparisonResult>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogBackend: Send + Sync {
  async fn buckets(&self) -> Result<Vec<BucketListItem>>;

  async fn materials(&self) -> Result<Vec<Material>>;
}
