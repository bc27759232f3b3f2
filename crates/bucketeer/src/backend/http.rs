//! REST client for the calculation and catalog endpoints

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{CalculationBackend, CatalogBackend};
use crate::config::ClientConfig;
use crate::error::{ComparisonError, Result};
use crate::model::{BucketListItem, ComparisonRequest, ComparisonResult, Material, SavedComparison};

pub struct HttpBackend {
  client: Client,
  config: ClientConfig,
}

impl HttpBackend {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .connect_timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| ComparisonError::transport(format!("Failed to create HTTP client: {e}")))?;

    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}", self.config.api_root(), path)
  }

  async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T> {
    let request = match &self.config.token {
      Some(token) => request.bearer_auth(token),
      None => request,
    };

    let response = timeout(Duration::from_secs(self.config.timeout_secs), request.send())
      .await
      .map_err(|_| {
        ComparisonError::transport(format!(
          "{action}: no response after {}s",
          self.config.timeout_secs
        ))
      })?
      .map_err(|e| ComparisonError::transport(format!("{action}: {e}")))?;

    let status = response.status();
    debug!(%status, action, "backend responded");

    if status.is_client_error() {
      let body = response.text().await.unwrap_or_default();
      let message = error_message(&body).unwrap_or_else(|| format!("{action} failed: HTTP {status}"));
      return Err(ComparisonError::business(Some(status.as_u16()), message));
    }
    if !status.is_success() {
      return Err(ComparisonError::transport(format!("{action} failed: HTTP {status}")));
    }

    response
      .json::<T>()
      .await
      .map_err(|e| ComparisonError::transport(format!("{action}: unreadable response: {e}")))
  }
}

/// Human readable message from an error body, if the backend sent one
fn error_message(body: &str) -> Option<String> {
  if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
    return ["message", "detail", "title", "error"]
      .iter()
      .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
      .map(str::to_string);
  }

  let text = body.trim();
  (!text.is_empty() && text.len() <= 200).then(|| text.to_string())
}

#[async_trait]
impl CalculationBackend for HttpBackend {
  async fn calculate_comparison(&self, request: &ComparisonRequest) -> Result<ComparisonResult> {
    let builder = self.client.post(self.url("calculations/comparison/calculate")).json(request);
    self.send(builder, "Calculate comparison").await
  }

  async fn save_comparison(&self, request: &ComparisonRequest) -> Result<ComparisonResult> {
    let builder = self.client.post(self.url("calculations/comparison/save")).json(request);
    self.send(builder, "Save comparison").await
  }

  async fn user_comparisons(&self) -> Result<Vec<SavedComparison>> {
    let builder = self.client.get(self.url("calculations/comparison/user"));
    let records: Vec<ComparisonResult> = self.send(builder, "Load saved comparisons").await?;

    let total = records.len();
    let saved: Vec<SavedComparison> =
      records.into_iter().filter_map(|record| SavedComparison::try_from(record).ok()).collect();
    if saved.len() < total {
      warn!(dropped = total - saved.len(), "saved comparisons without an id were skipped");
    }
    Ok(saved)
  }

  async fn comparison_by_id(&self, id: i64) -> Result<ComparisonResult> {
    let builder = self.client.get(self.url(&format!("calculations/comparison/{id}")));
    self.send(builder, "Load comparison").await
  }

  async fn generate_insight(&self, id: i64, regenerate: bool) -> Result<ComparisonResult> {
    let path = format!("calculations/comparison/{id}/insight?regenerate={regenerate}");
    let builder = self.client.post(self.url(&path));
    self.send(builder, "Generate insight").await
  }
}

#[async_trait]
impl CatalogBackend for HttpBackend {
  async fn buckets(&self) -> Result<Vec<BucketListItem>> {
    self.send(self.client.get(self.url("buckets")), "Load buckets").await
  }

  async fn materials(&self) -> Result<Vec<Material>> {
    self.send(self.client.get(self.url("buckets/materials")), "Load materials").await
  }
}
