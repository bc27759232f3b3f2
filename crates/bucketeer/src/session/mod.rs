//! Comparison session controller
//!
//! One [`ComparisonSession`] per user session owns the current result, the
//! selected history item, the saved history view and the phase. Every entry
//! point that talks to the backend first claims the phase: while a request is
//! in flight, further requests are rejected with [`ComparisonError::Busy`]
//! instead of racing. The claim is released (back to `idle` or `calculated`)
//! on success, failure, cancellation, or when the future is dropped.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::backend::{CalculationBackend, CatalogBackend, HttpBackend};
use crate::catalog::{self, BucketOption};
use crate::chart::{self, ChartSet};
use crate::error::{ComparisonError, Result};
use crate::history::{HistoryQuery, HistoryView, SortKey};
use crate::model::{BucketListItem, ComparisonRequest, ComparisonResult, Material, SavedComparison};
use crate::notice::{Notice, Notifier};
use crate::validation::{validate_name, validate_request};

mod phase;

pub use phase::Phase;

pub const INSIGHT_FAILED: &str = "Could not generate the insight. Try again.";

/// Everything the session holds; readers get clones via [`ComparisonSession::snapshot`]
#[derive(Debug, Clone, Default)]
pub struct SessionState {
  pub phase: Phase,
  pub current: Option<ComparisonResult>,
  pub charts: Option<ChartSet>,
  /// Request behind `current`, when it was calculated in this session
  pub last_request: Option<ComparisonRequest>,
  pub selected_history_item: Option<SavedComparison>,
  pub history: HistoryView,
  pub buckets: Vec<BucketListItem>,
  pub materials: Vec<Material>,
  /// Set when the last insight attempt failed, cleared by the next attempt
  pub insight_error: Option<String>,
}

impl SessionState {
  fn resting_phase(&self) -> Phase {
    Phase::resting(self.current.is_some())
  }

  fn show(&mut self, result: ComparisonResult) {
    self.charts = Some(chart::project(&result));
    self.current = Some(result);
  }
}

pub struct ComparisonSession {
  id: Uuid,
  calculations: Arc<dyn CalculationBackend>,
  catalog: Arc<dyn CatalogBackend>,
  notifier: Arc<dyn Notifier>,
  state: Mutex<SessionState>,
  shutdown: CancellationToken,
}

/// Holds the claimed phase; dropping it settles the session again
struct PhaseClaim<'a> {
  session: &'a ComparisonSession,
}

impl Drop for PhaseClaim<'_> {
  fn drop(&mut self) {
    self.session.update(|state| state.phase = state.resting_phase());
  }
}

impl ComparisonSession {
  pub fn new(
    calculations: Arc<dyn CalculationBackend>,
    catalog: Arc<dyn CatalogBackend>,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      calculations,
      catalog,
      notifier,
      state: Mutex::new(SessionState::default()),
      shutdown: CancellationToken::new(),
    }
  }

  /// Session backed by one HTTP client for both services
  pub fn over_http(backend: HttpBackend, notifier: Arc<dyn Notifier>) -> Self {
    let backend = Arc::new(backend);
    Self::new(backend.clone(), backend, notifier)
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  // Transitions
  // ===========

  /// Load buckets, materials and saved history. Each source that fails is
  /// reported; the first failure is returned after the others are applied.
  #[instrument(skip_all, fields(session = %self.id))]
  pub async fn start(&self) -> Result<()> {
    let _claim = self.claim(Phase::LoadingReferenceData)?;

    let (buckets, materials, history) = self
      .dispatch(async {
        Ok(tokio::join!(
          self.catalog.buckets(),
          self.catalog.materials(),
          self.calculations.user_comparisons()
        ))
      })
      .await?;

    let mut first_error = None;
    let mut record = |error: ComparisonError, detail: &str| {
      warn!(%error, "{detail}");
      self.notify(Notice::warn(detail));
      first_error.get_or_insert(error);
    };

    match buckets {
      Ok(buckets) => self.update(|state| state.buckets = buckets),
      Err(e) => record(e, "Could not load the bucket list."),
    }
    match materials {
      Ok(materials) => self.update(|state| state.materials = materials),
      Err(e) => record(e, "Could not load the material list."),
    }
    match history {
      Ok(history) => self.update(|state| state.history.replace(history)),
      Err(e) => record(e, "Could not load the saved comparisons."),
    }

    match first_error {
      Some(error) => Err(error),
      None => {
        info!("reference data loaded");
        Ok(())
      }
    }
  }

  /// Load only buckets and materials; saved history is left alone
  #[instrument(skip_all, fields(session = %self.id))]
  pub async fn load_catalog(&self) -> Result<()> {
    let _claim = self.claim(Phase::LoadingReferenceData)?;

    let (buckets, materials) = self
      .dispatch(async { Ok(tokio::join!(self.catalog.buckets(), self.catalog.materials())) })
      .await?;

    let buckets = buckets.inspect_err(|error| {
      self.report_failure(error, "Could not load the bucket list.");
    })?;
    let materials = materials.inspect_err(|error| {
      self.report_failure(error, "Could not load the material list.");
    })?;

    self.update(|state| {
      state.buckets = buckets;
      state.materials = materials;
    });
    Ok(())
  }

  /// Calculate a comparison. On failure the previous result stays in place.
  #[instrument(skip_all, fields(session = %self.id))]
  pub async fn calculate(&self, request: ComparisonRequest) -> Result<ComparisonResult> {
    let _claim = self.claim(Phase::Calculating)?;

    if let Err(error) = validate_request(&request) {
      self.notify(Notice::warn(format!("Please fill in all fields correctly ({error})")));
      return Err(error);
    }

    let outcome = self.dispatch(self.calculations.calculate_comparison(&request)).await;
    match outcome {
      Ok(result) => {
        info!(
          selected = request.selected_bucket_id,
          comparison = request.comparison_bucket_id,
          "comparison calculated"
        );
        self.update(|state| {
          state.show(result.clone());
          state.last_request = Some(request);
        });
        Ok(result)
      }
      Err(error) => {
        self.report_failure(&error, "An error occurred while calculating. Try again.");
        Err(error)
      }
    }
  }

  /// Persist the current calculation under `name`. The stored copy becomes
  /// the current result and joins the history.
  #[instrument(skip_all, fields(session = %self.id))]
  pub async fn save(&self, name: &str) -> Result<ComparisonResult> {
    let _claim = self.claim(Phase::Saving)?;

    let (has_result, request) =
      self.read(|state| (state.current.is_some(), state.last_request.clone()));
    let request = match (has_result, request) {
      (true, Some(request)) => request,
      (true, None) => {
        self.notify(Notice::info("Recalculate the loaded comparison before saving it again."));
        return Err(ComparisonError::NoResult);
      }
      (false, _) => {
        self.notify(Notice::info("Calculate a comparison before saving."));
        return Err(ComparisonError::NoResult);
      }
    };

    let name = match validate_name(name) {
      Ok(name) => name,
      Err(error) => {
        self.notify(Notice::warn("Enter a name for the comparison."));
        return Err(error);
      }
    };

    let outcome = self.dispatch(self.calculations.save_comparison(&request.named(name))).await;
    match outcome {
      Ok(saved) => {
        info!(id = ?saved.id, "comparison saved");
        self.update(|state| {
          match SavedComparison::try_from(saved.clone()) {
            Ok(item) => state.history.push(item),
            Err(_) => warn!("saved comparison came back without an id"),
          }
          state.show(saved.clone());
        });
        self.notify(Notice::success("Comparison saved."));
        Ok(saved)
      }
      Err(error) => {
        self.report_failure(&error, "An error occurred while saving the comparison. Try again.");
        Err(error)
      }
    }
  }

  /// Replace the current result with a saved comparison
  #[instrument(skip_all, fields(session = %self.id, id = id))]
  pub async fn load_calculation(&self, id: i64) -> Result<ComparisonResult> {
    let _claim = self.claim(Phase::LoadingHistoryItem)?;

    let outcome = self.dispatch(self.calculations.comparison_by_id(id)).await;
    match outcome {
      Ok(result) => {
        self.update(|state| {
          state.selected_history_item = state.history.find(id).cloned();
          state.show(result.clone());
          state.last_request = None;
          state.insight_error = None;
        });
        self.notify(Notice::success("Comparison loaded."));
        Ok(result)
      }
      Err(error) => {
        self.report_failure(&error, "An error occurred while loading the comparison. Try again.");
        Err(error)
      }
    }
  }

  /// Ask the backend for an AI insight on the current, saved comparison
  #[instrument(skip_all, fields(session = %self.id, regenerate = regenerate))]
  pub async fn generate_insight(&self, regenerate: bool) -> Result<ComparisonResult> {
    let _claim = self.claim(Phase::GeneratingInsight)?;

    let id = self.read(|state| state.current.as_ref().and_then(|result| result.id));
    let Some(id) = id else {
      self.notify(Notice::warn("Save the comparison before generating an insight."));
      return Err(ComparisonError::NotPersisted);
    };

    self.update(|state| state.insight_error = None);

    let outcome = self.dispatch(self.calculations.generate_insight(id, regenerate)).await;
    match outcome {
      Ok(result) => {
        self.update(|state| state.show(result.clone()));
        self.notify(Notice::success("Insight generated."));
        Ok(result)
      }
      Err(ComparisonError::Cancelled) => Err(ComparisonError::Cancelled),
      Err(error) => {
        warn!(%error, "insight generation failed");
        self.update(|state| state.insight_error = Some(INSIGHT_FAILED.to_string()));
        self.notify(Notice::error("AI insight generation failed."));
        Err(error)
      }
    }
  }

  /// Reload the saved comparisons; the current query is kept
  #[instrument(skip_all, fields(session = %self.id))]
  pub async fn refresh_history(&self) -> Result<()> {
    let _claim = self.claim(Phase::RefreshingHistory)?;

    match self.dispatch(self.calculations.user_comparisons()).await {
      Ok(history) => {
        self.update(|state| state.history.replace(history));
        Ok(())
      }
      Err(error) => {
        self.report_failure(&error, "Could not load the saved comparisons.");
        Err(error)
      }
    }
  }

  /// Drop the current result and selection
  pub fn reset(&self) -> Result<()> {
    self.update(|state| {
      if state.phase.is_transient() {
        return Err(ComparisonError::Busy { phase: state.phase });
      }
      state.current = None;
      state.charts = None;
      state.last_request = None;
      state.selected_history_item = None;
      state.insight_error = None;
      state.phase = Phase::Idle;
      Ok(())
    })
  }

  /// Cancel whatever is in flight; the session accepts no further requests
  pub fn shutdown(&self) {
    info!(session = %self.id, "session shutting down");
    self.shutdown.cancel();
  }

  pub fn is_shut_down(&self) -> bool {
    self.shutdown.is_cancelled()
  }

  // History query
  // =============

  pub fn set_search_query(&self, text: &str) {
    self.update(|state| state.history.set_search(text));
  }

  pub fn clear_search(&self) {
    self.update(|state| state.history.clear_search());
  }

  /// Same key flips the direction; a new key sorts descending
  pub fn set_sort(&self, key: SortKey) {
    self.update(|state| state.history.toggle_sort(key));
  }

  pub fn set_history_query(&self, query: HistoryQuery) {
    self.update(|state| state.history.set_query(query));
  }

  // Readers
  // =======

  pub fn snapshot(&self) -> SessionState {
    self.read(SessionState::clone)
  }

  pub fn phase(&self) -> Phase {
    self.read(|state| state.phase)
  }

  pub fn current_result(&self) -> Option<ComparisonResult> {
    self.read(|state| state.current.clone())
  }

  pub fn charts(&self) -> Option<ChartSet> {
    self.read(|state| state.charts.clone())
  }

  pub fn selected_history_item(&self) -> Option<SavedComparison> {
    self.read(|state| state.selected_history_item.clone())
  }

  /// Saved comparisons after the search query and sort order are applied
  pub fn history_view(&self) -> Vec<SavedComparison> {
    self.read(|state| state.history.visible().cloned().collect())
  }

  pub fn history_query(&self) -> HistoryQuery {
    self.read(|state| state.history.query().clone())
  }

  pub fn insight_error(&self) -> Option<String> {
    self.read(|state| state.insight_error.clone())
  }

  pub fn bucket_options(&self) -> Vec<BucketOption> {
    self.read(|state| catalog::bucket_options(&state.buckets))
  }

  pub fn bucket_code(&self, id: i64) -> Option<String> {
    self.read(|state| catalog::bucket_code(&state.buckets, id).map(str::to_string))
  }

  pub fn material_name(&self, id: i64) -> Option<String> {
    self.read(|state| catalog::material_name(&state.materials, id).map(str::to_string))
  }

  pub fn materials(&self) -> Vec<Material> {
    self.read(|state| state.materials.clone())
  }

  // Plumbing
  // ========

  fn claim(&self, phase: Phase) -> Result<PhaseClaim<'_>> {
    if self.shutdown.is_cancelled() {
      return Err(ComparisonError::Cancelled);
    }

    self.update(|state| {
      if state.phase.is_transient() {
        return Err(ComparisonError::Busy { phase: state.phase });
      }
      state.phase = phase;
      Ok(())
    })
    .inspect_err(|error| {
      warn!(%error, requested = %phase, "rejected overlapping request");
      self.notify(Notice::warn("Please wait for the current operation to finish."));
    })?;

    Ok(PhaseClaim { session: self })
  }

  async fn dispatch<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::select! {
      biased;
      _ = self.shutdown.cancelled() => Err(ComparisonError::Cancelled),
      outcome = call => outcome,
    }
  }

  fn report_failure(&self, error: &ComparisonError, detail: &str) {
    if matches!(error, ComparisonError::Cancelled) {
      return;
    }
    warn!(%error, "{detail}");
    self.notify(Notice::error(detail));
  }

  fn notify(&self, notice: Notice) {
    self.notifier.notify(&notice);
  }

  fn lock(&self) -> MutexGuard<'_, SessionState> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
    f(&self.lock())
  }

  fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
    f(&mut self.lock())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::{MockCalculationBackend, MockCatalogBackend};
  use crate::model::{BucketDetails, DifferenceSet, Insight};
  use crate::notice::{RecordingNotifier, Severity};
  use mockall::predicate::*;

  fn result(id: Option<i64>) -> ComparisonResult {
    ComparisonResult {
      id,
      name: id.map(|id| format!("Saved {id}")),
      selected_bucket: BucketDetails {
        code: "AC-160".to_string(),
        capacity: 120.0,
        price_per_meter: 50.0,
        ..Default::default()
      },
      comparison_bucket: BucketDetails {
        code: "AC-150".to_string(),
        capacity: 100.0,
        price_per_meter: 60.0,
        ..Default::default()
      },
      comparison_result: DifferenceSet {
        capacity_difference: Some(20.0),
        price_per_meter_difference: Some(-16.666666666666664),
        ..Default::default()
      },
      calculated_at: None,
      insight: None,
    }
  }

  fn session_with(
    calculations: MockCalculationBackend,
  ) -> (ComparisonSession, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let catalog = Arc::new(MockCatalogBackend::new());
    let session = ComparisonSession::new(Arc::new(calculations), catalog, notifier.clone());
    (session, notifier)
  }

  async fn calculated_session(
    mut calculations: MockCalculationBackend,
    current: ComparisonResult,
  ) -> (ComparisonSession, Arc<RecordingNotifier>) {
    calculations
      .expect_calculate_comparison()
      .with(eq(ComparisonRequest::new(1, 2)))
      .times(1)
      .returning(move |_| Ok(current.clone()));
    let (session, notifier) = session_with(calculations);
    session.calculate(ComparisonRequest::new(1, 2)).await.unwrap();
    notifier.take();
    (session, notifier)
  }

  #[tokio::test]
  async fn test_calculate_stores_result_and_projects_charts() {
    let mut calculations = MockCalculationBackend::new();
    calculations
      .expect_calculate_comparison()
      .with(eq(ComparisonRequest::new(1, 2)))
      .times(1)
      .returning(|_| Ok(result(None)));
    let (session, _notifier) = session_with(calculations);

    let calculated = session.calculate(ComparisonRequest::new(1, 2)).await.unwrap();

    assert_eq!(calculated.comparison_result.capacity_difference, Some(20.0));
    assert_eq!(session.phase(), Phase::Calculated);
    let charts = session.charts().unwrap();
    assert_eq!(charts.bars.entries.len(), 5);
    assert_eq!(charts.radar.selected.label, "AC-160");
  }

  #[tokio::test]
  async fn test_invalid_request_never_reaches_backend() {
    let mut calculations = MockCalculationBackend::new();
    calculations.expect_calculate_comparison().times(0);
    let (session, notifier) = session_with(calculations);

    let request = ComparisonRequest { speed: 0.0, ..ComparisonRequest::new(1, 2) };
    let error = session.calculate(request).await.unwrap_err();

    assert!(matches!(error, ComparisonError::Validation { .. }));
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(notifier.last().unwrap().severity, Severity::Warn);
  }

  #[tokio::test]
  async fn test_failed_calculation_keeps_previous_result() {
    let mut calculations = MockCalculationBackend::new();
    calculations
      .expect_calculate_comparison()
      .with(eq(ComparisonRequest::new(3, 4)))
      .returning(|_| Err(ComparisonError::transport("connection refused")));
    let (session, notifier) = calculated_session(calculations, result(None)).await;

    let error = session.calculate(ComparisonRequest::new(3, 4)).await.unwrap_err();

    assert!(matches!(error, ComparisonError::Transport { .. }));
    assert_eq!(session.phase(), Phase::Calculated);
    assert_eq!(session.current_result(), Some(result(None)));
    assert_eq!(session.snapshot().last_request, Some(ComparisonRequest::new(1, 2)));
    assert_eq!(notifier.last().unwrap().severity, Severity::Error);
  }

  #[tokio::test]
  async fn test_blank_name_is_rejected_locally() {
    let mut calculations = MockCalculationBackend::new();
    calculations.expect_save_comparison().times(0);
    let (session, notifier) = calculated_session(calculations, result(None)).await;

    let error = session.save("   ").await.unwrap_err();

    assert!(matches!(error, ComparisonError::Validation { .. }));
    assert_eq!(session.phase(), Phase::Calculated);
    assert_eq!(notifier.last().unwrap().severity, Severity::Warn);
  }

  #[tokio::test]
  async fn test_save_without_result() {
    let mut calculations = MockCalculationBackend::new();
    calculations.expect_save_comparison().times(0);
    let (session, notifier) = session_with(calculations);

    assert_eq!(session.save("Line 3").await, Err(ComparisonError::NoResult));
    assert_eq!(notifier.last().unwrap().severity, Severity::Info);
  }

  #[tokio::test]
  async fn test_save_sends_trimmed_name_and_appends_history() {
    let mut calculations = MockCalculationBackend::new();
    calculations
      .expect_save_comparison()
      .withf(|request| request.name.as_deref() == Some("Line 3") && request.selected_bucket_id == 1)
      .times(1)
      .returning(|_| Ok(result(Some(42))));
    let (session, notifier) = calculated_session(calculations, result(None)).await;

    let saved = session.save("  Line 3 ").await.unwrap();

    assert_eq!(saved.id, Some(42));
    assert_eq!(session.current_result().and_then(|r| r.id), Some(42));
    let history = session.history_view();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id(), 42);
    assert_eq!(notifier.last().unwrap().severity, Severity::Success);
  }

  #[tokio::test]
  async fn test_failed_save_leaves_state_unchanged() {
    let mut calculations = MockCalculationBackend::new();
    calculations
      .expect_save_comparison()
      .returning(|_| Err(ComparisonError::business(Some(422), "duplicate name")));
    let (session, _notifier) = calculated_session(calculations, result(None)).await;

    assert!(session.save("Line 3").await.is_err());
    assert_eq!(session.phase(), Phase::Calculated);
    assert_eq!(session.current_result(), Some(result(None)));
    assert!(session.history_view().is_empty());
  }

  #[tokio::test]
  async fn test_insight_requires_persisted_result() {
    let mut calculations = MockCalculationBackend::new();
    calculations.expect_generate_insight().times(0);
    let (session, notifier) = calculated_session(calculations, result(None)).await;

    assert_eq!(session.generate_insight(false).await, Err(ComparisonError::NotPersisted));
    assert_eq!(notifier.last().unwrap().severity, Severity::Warn);
    assert_eq!(session.phase(), Phase::Calculated);
  }

  #[tokio::test]
  async fn test_insight_failure_is_sticky_until_next_attempt() {
    let mut calculations = MockCalculationBackend::new();
    let mut attempts = 0;
    calculations.expect_generate_insight().with(eq(7), eq(true)).times(2).returning(move |_, _| {
      attempts += 1;
      if attempts == 1 {
        Err(ComparisonError::transport("timeout"))
      } else {
        let mut updated = result(Some(7));
        updated.insight =
          Some(Insight { text: "AC-160 is cheaper per meter.".to_string(), generated_at: None });
        Ok(updated)
      }
    });
    let (session, _notifier) = calculated_session(calculations, result(Some(7))).await;

    assert!(session.generate_insight(true).await.is_err());
    assert_eq!(session.insight_error().as_deref(), Some(INSIGHT_FAILED));
    assert_eq!(session.current_result().unwrap().insight, None);

    let updated = session.generate_insight(true).await.unwrap();
    assert!(updated.insight.is_some());
    assert_eq!(session.insight_error(), None);
    assert_eq!(session.current_result(), Some(updated));
  }

  #[tokio::test]
  async fn test_load_calculation_replaces_current() {
    let mut calculations = MockCalculationBackend::new();
    calculations.expect_comparison_by_id().with(eq(9)).returning(|_| Ok(result(Some(9))));
    let (session, _notifier) = session_with(calculations);

    let loaded = session.load_calculation(9).await.unwrap();

    assert_eq!(loaded.id, Some(9));
    assert_eq!(session.phase(), Phase::Calculated);
    assert!(session.charts().is_some());
    assert!(session.snapshot().last_request.is_none());
  }

  #[tokio::test]
  async fn test_loaded_comparison_must_be_recalculated_before_saving() {
    let mut calculations = MockCalculationBackend::new();
    calculations.expect_comparison_by_id().with(eq(9)).returning(|_| Ok(result(Some(9))));
    calculations.expect_save_comparison().times(0);
    let (session, notifier) = session_with(calculations);
    session.load_calculation(9).await.unwrap();

    assert_eq!(session.save("Copy").await, Err(ComparisonError::NoResult));

    let notice = notifier.last().unwrap();
    assert_eq!(notice.severity, Severity::Info);
    assert_eq!(notice.detail, "Recalculate the loaded comparison before saving it again.");
    assert_eq!(session.phase(), Phase::Calculated);
  }

  #[tokio::test]
  async fn test_load_catalog_skips_history() {
    let mut catalog = MockCatalogBackend::new();
    catalog.expect_buckets().returning(|| Ok(Vec::new()));
    catalog.expect_materials().returning(|| Ok(vec![Material { id: 3, name: "Steel".to_string() }]));
    let mut calculations = MockCalculationBackend::new();
    calculations.expect_user_comparisons().times(0);

    let notifier = Arc::new(RecordingNotifier::new());
    let session = ComparisonSession::new(Arc::new(calculations), Arc::new(catalog), notifier.clone());

    session.load_catalog().await.unwrap();

    assert_eq!(session.material_name(3).as_deref(), Some("Steel"));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(notifier.notices().is_empty());
  }

  #[tokio::test]
  async fn test_start_reports_each_failed_source() {
    let mut catalog = MockCatalogBackend::new();
    catalog.expect_buckets().returning(|| Err(ComparisonError::transport("down")));
    catalog.expect_materials().returning(|| Ok(vec![Material { id: 1, name: "Steel".to_string() }]));
    let mut calculations = MockCalculationBackend::new();
    calculations.expect_user_comparisons().returning(|| Ok(Vec::new()));

    let notifier = Arc::new(RecordingNotifier::new());
    let session = ComparisonSession::new(Arc::new(calculations), Arc::new(catalog), notifier.clone());

    let error = session.start().await.unwrap_err();

    assert!(matches!(error, ComparisonError::Transport { .. }));
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.material_name(1).as_deref(), Some("Steel"));
    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Warn);
  }

  #[tokio::test]
  async fn test_shutdown_rejects_new_requests() {
    let mut calculations = MockCalculationBackend::new();
    calculations.expect_calculate_comparison().times(0);
    let (session, _notifier) = session_with(calculations);

    session.shutdown();

    assert!(session.is_shut_down());
    assert_eq!(session.calculate(ComparisonRequest::new(1, 2)).await, Err(ComparisonError::Cancelled));
    assert_eq!(session.phase(), Phase::Idle);
  }

  #[tokio::test]
  async fn test_reset_clears_current() {
    let (session, _notifier) = calculated_session(MockCalculationBackend::new(), result(None)).await;

    session.reset().unwrap();

    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.current_result().is_none());
    assert!(session.charts().is_none());
  }
}
