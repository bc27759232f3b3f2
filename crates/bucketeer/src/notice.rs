//! User-facing notices
//!
//! The session reports outcomes (saved, failed, rejected) through a
//! [`Notifier`]. The console notifier prints them to stderr with a colored
//! level prefix; embedders can collect them instead.

use colored::*;
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Success,
  Info,
  Warn,
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      Severity::Success => "sccs",
      Severity::Info => "info",
      Severity::Warn => "warn",
      Severity::Error => "error",
    };
    f.write_str(text)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
  pub severity: Severity,
  pub summary: String,
  pub detail: String,
}

impl Notice {
  pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
    Self { severity, summary: summary.into(), detail: detail.into() }
  }

  pub fn success(detail: impl Into<String>) -> Self {
    Self::new(Severity::Success, "Success", detail)
  }

  pub fn info(detail: impl Into<String>) -> Self {
    Self::new(Severity::Info, "Information", detail)
  }

  pub fn warn(detail: impl Into<String>) -> Self {
    Self::new(Severity::Warn, "Attention", detail)
  }

  pub fn error(detail: impl Into<String>) -> Self {
    Self::new(Severity::Error, "Error", detail)
  }
}

pub trait Notifier: Send + Sync {
  fn notify(&self, notice: &Notice);
}

/// Prints notices to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
  fn prefix(severity: Severity) -> String {
    let color = match severity {
      Severity::Success => Color::Green,
      Severity::Info => Color::Blue,
      Severity::Warn => Color::Yellow,
      Severity::Error => Color::Red,
    };
    let label = severity.to_string();
    format!("[{}]{:<width$}", label.color(color).bold(), "", width = 7 - label.len() - 2)
  }
}

impl Notifier for ConsoleNotifier {
  fn notify(&self, notice: &Notice) {
    let prefix = Self::prefix(notice.severity);
    for line in notice.detail.lines() {
      eprintln!("{prefix} {line}");
    }
  }
}

/// Keeps every notice in memory, oldest first
#[derive(Debug, Default)]
pub struct RecordingNotifier {
  notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn notices(&self) -> Vec<Notice> {
    self.lock().clone()
  }

  pub fn last(&self) -> Option<Notice> {
    self.lock().last().cloned()
  }

  pub fn take(&self) -> Vec<Notice> {
    std::mem::take(&mut *self.lock())
  }

  fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
    self.notices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl Notifier for RecordingNotifier {
  fn notify(&self, notice: &Notice) {
    self.lock().push(notice.clone());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_constructors_set_severity_and_summary() {
    let notice = Notice::warn("Enter a name for the comparison.");
    assert_eq!(notice.severity, Severity::Warn);
    assert_eq!(notice.summary, "Attention");
    assert_eq!(Notice::error("x").summary, "Error");
    assert_eq!(Notice::success("x").severity, Severity::Success);
    assert_eq!(Notice::info("x").severity, Severity::Info);
  }

  #[test]
  fn test_recording_notifier_keeps_order() {
    let notifier = RecordingNotifier::new();
    notifier.notify(&Notice::info("first"));
    notifier.notify(&Notice::error("second"));

    assert_eq!(notifier.last().unwrap().detail, "second");
    let taken = notifier.take();
    assert_eq!(taken.len(), 2);
    assert_eq!(taken[0].detail, "first");
    assert!(notifier.notices().is_empty());
  }

  #[test]
  fn test_prefix_width_is_stable() {
    colored::control::set_override(false);
    assert_eq!(ConsoleNotifier::prefix(Severity::Info), "[info] ");
    assert_eq!(ConsoleNotifier::prefix(Severity::Error), "[error]");
    colored::control::unset_override();
  }
}
