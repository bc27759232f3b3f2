//! Bucketeer - Bucket Elevator Comparison Client
//!
//! Compares two elevator buckets through a remote calculation service:
//! side-by-side metrics, chart-ready projections of the differences, a
//! searchable history of saved comparisons and AI generated insights.

pub mod backend;
pub mod catalog;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod notice;
pub mod session;
pub mod validation;

pub use error::{ComparisonError, Result};
pub use session::{ComparisonSession, Phase};
