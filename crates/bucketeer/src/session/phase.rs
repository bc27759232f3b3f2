use serde::Serialize;
use std::fmt;

/// Where the session is in its calculate / save / reload / insight cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
  #[default]
  Idle,
  LoadingReferenceData,
  Calculating,
  Calculated,
  Saving,
  LoadingHistoryItem,
  RefreshingHistory,
  GeneratingInsight,
}

impl Phase {
  /// A request is in flight; no other transition may start
  pub fn is_transient(&self) -> bool {
    !matches!(self, Phase::Idle | Phase::Calculated)
  }

  /// Phase to settle in once nothing is in flight
  pub fn resting(has_result: bool) -> Self {
    if has_result {
      Phase::Calculated
    } else {
      Phase::Idle
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      Phase::Idle => "idle",
      Phase::LoadingReferenceData => "loading reference data",
      Phase::Calculating => "calculating",
      Phase::Calculated => "calculated",
      Phase::Saving => "saving",
      Phase::LoadingHistoryItem => "loading history item",
      Phase::RefreshingHistory => "refreshing history",
      Phase::GeneratingInsight => "generating insight",
    };
    f.write_str(text)
  }
}
