//! Error taxonomy shared by the pipeline, the backend client and the session controller

use thiserror::Error;

use crate::normalize::ArithmeticError;
use crate::session::Phase;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
  #[error("Invalid {field}: {message}")]
  Validation { field: String, message: String },

  #[error("Backend unreachable: {message}")]
  Transport { message: String },

  #[error("Backend rejected the request: {message}")]
  Business { status: Option<u16>, message: String },

  #[error(transparent)]
  Arithmetic(#[from] ArithmeticError),

  #[error("Another operation is in progress ({phase})")]
  Busy { phase: Phase },

  #[error("Session was shut down")]
  Cancelled,

  #[error("No comparison has been calculated yet")]
  NoResult,

  #[error("Comparison must be saved first")]
  NotPersisted,
}

impl ComparisonError {
  pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Validation { field: field.into(), message: message.into() }
  }

  pub fn transport(message: impl Into<String>) -> Self {
    Self::Transport { message: message.into() }
  }

  pub fn business(status: Option<u16>, message: impl Into<String>) -> Self {
    Self::Business { status, message: message.into() }
  }

  /// True for failures that never left the client
  pub fn is_local(&self) -> bool {
    !matches!(self, Self::Transport { .. } | Self::Business { .. })
  }
}

pub type Result<T> = std::result::Result<T, ComparisonError>;
