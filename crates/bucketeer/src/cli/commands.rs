use anyhow::{anyhow, Result};
use chrono::Local;
use colored::*;

use crate::cli::display;
use crate::format::default_save_name;
use crate::history::{HistoryQuery, SortDirection, SortKey};
use crate::model::ComparisonRequest;
use crate::session::ComparisonSession;

/// List the bucket catalog
pub async fn list_buckets(session: &ComparisonSession) -> Result<()> {
  session.load_catalog().await?;
  display::display_bucket_options(&session.bucket_options());
  Ok(())
}

pub async fn list_materials(session: &ComparisonSession) -> Result<()> {
  session.load_catalog().await?;
  display::display_materials(&session.materials());
  Ok(())
}

/// Calculate a comparison and optionally save it.
/// `save` is `Some(None)` when the flag was given without a name.
pub async fn compare(
  session: &ComparisonSession,
  request: ComparisonRequest,
  save: Option<Option<String>>,
) -> Result<()> {
  session.calculate(request).await?;

  if let Some(name) = save {
    let name = name.unwrap_or_else(|| default_save_name(Local::now().date_naive()));
    let saved = session.save(&name).await?;
    if let Some(id) = saved.id {
      println!("{} Saved as #{} {}", "✓".green(), id, name.cyan());
    }
  }

  show_current(session)
}

pub async fn history(
  session: &ComparisonSession,
  query: Option<String>,
  key: SortKey,
  ascending: bool,
) -> Result<()> {
  session.refresh_history().await?;

  let direction = if ascending { SortDirection::Asc } else { SortDirection::Desc };
  session.set_history_query(HistoryQuery { text: query.unwrap_or_default(), key, direction });

  display::display_history(&session.history_view(), &session.history_query());
  Ok(())
}

pub async fn show(session: &ComparisonSession, id: i64) -> Result<()> {
  session.load_calculation(id).await?;
  show_current(session)
}

/// Load a saved comparison and attach an AI insight to it
pub async fn insight(session: &ComparisonSession, id: i64, regenerate: bool) -> Result<()> {
  session.load_calculation(id).await?;

  let already_there = session.current_result().is_some_and(|result| result.insight.is_some());
  if already_there && !regenerate {
    return show_current(session);
  }

  session.generate_insight(regenerate).await?;
  show_current(session)
}

fn show_current(session: &ComparisonSession) -> Result<()> {
  let state = session.snapshot();
  let (Some(result), Some(charts)) = (state.current, state.charts) else {
    return Err(anyhow!("No comparison to show"));
  };

  display::display_comparison(&result, &charts);
  Ok(())
}
