//! Saved comparison history: free-text filtering and direction-aware sorting

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::model::SavedComparison;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
  #[default]
  Date,
  Capacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  Asc,
  #[default]
  Desc,
}

impl SortDirection {
  pub fn flipped(self) -> Self {
    match self {
      SortDirection::Asc => SortDirection::Desc,
      SortDirection::Desc => SortDirection::Asc,
    }
  }
}

impl fmt::Display for SortKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SortKey::Date => f.write_str("date"),
      SortKey::Capacity => f.write_str("capacity"),
    }
  }
}

impl fmt::Display for SortDirection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SortDirection::Asc => f.write_str("asc"),
      SortDirection::Desc => f.write_str("desc"),
    }
  }
}

/// Transient search and ordering state of the history list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
  pub text: String,
  pub key: SortKey,
  pub direction: SortDirection,
}

impl HistoryQuery {
  pub fn toggle_sort(&mut self, requested: SortKey) {
    (self.key, self.direction) = toggle_sort((self.key, self.direction), requested);
  }
}

/// Same key flips the direction, a new key starts descending
pub fn toggle_sort(
  current: (SortKey, SortDirection),
  requested: SortKey,
) -> (SortKey, SortDirection) {
  let (key, direction) = current;
  if key == requested {
    (key, direction.flipped())
  } else {
    (requested, SortDirection::Desc)
  }
}

/// Case-insensitive match on the name or either bucket's capacity.
/// A blank query keeps everything in its original order.
pub fn filter(items: &[SavedComparison], query: &str) -> Vec<SavedComparison> {
  let query = normalize_query(query);
  items.iter().filter(|item| matches_query(item, &query)).cloned().collect()
}

/// Stable sort; `Desc` reverses the comparison, so ties keep input order
pub fn sort(
  mut items: Vec<SavedComparison>,
  key: SortKey,
  direction: SortDirection,
) -> Vec<SavedComparison> {
  items.sort_by(|a, b| directed(compare(a, b, key), direction));
  items
}

/// Filter then sort
pub fn apply(items: &[SavedComparison], query: &HistoryQuery) -> Vec<SavedComparison> {
  visible_indices(items, query).into_iter().map(|index| items[index].clone()).collect()
}

fn visible_indices(items: &[SavedComparison], query: &HistoryQuery) -> Vec<usize> {
  let text = normalize_query(&query.text);
  let mut indices: Vec<usize> =
    (0..items.len()).filter(|&index| matches_query(&items[index], &text)).collect();
  indices.sort_by(|&a, &b| directed(compare(&items[a], &items[b], query.key), query.direction));
  indices
}

fn normalize_query(query: &str) -> String {
  query.trim().to_lowercase()
}

// `query` is already normalized; empty matches everything
fn matches_query(item: &SavedComparison, query: &str) -> bool {
  if query.is_empty() {
    return true;
  }

  let result = item.result();
  item.name().is_some_and(|name| name.to_lowercase().contains(query))
    || result.selected_bucket.capacity.to_string().contains(query)
    || result.comparison_bucket.capacity.to_string().contains(query)
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
  match direction {
    SortDirection::Asc => ordering,
    SortDirection::Desc => ordering.reverse(),
  }
}

fn compare(a: &SavedComparison, b: &SavedComparison, key: SortKey) -> Ordering {
  match key {
    SortKey::Date => timestamp_millis(a).cmp(&timestamp_millis(b)),
    SortKey::Capacity => {
      a.result().selected_bucket.capacity.total_cmp(&b.result().selected_bucket.capacity)
    }
  }
}

// Missing timestamps sort as the earliest possible
fn timestamp_millis(item: &SavedComparison) -> i64 {
  item.calculated_at().map(|at| at.timestamp_millis()).unwrap_or(0)
}

/// Saved comparisons plus the query applied to them. The visible sequence is
/// recomputed whenever either side changes.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
  items: Vec<SavedComparison>,
  query: HistoryQuery,
  visible: Vec<usize>,
}

impl HistoryView {
  pub fn new(items: Vec<SavedComparison>) -> Self {
    let mut view = Self { items, ..Default::default() };
    view.refresh();
    view
  }

  pub fn replace(&mut self, items: Vec<SavedComparison>) {
    self.items = items;
    self.refresh();
  }

  pub fn push(&mut self, item: SavedComparison) {
    self.items.push(item);
    self.refresh();
  }

  pub fn set_search(&mut self, text: impl Into<String>) {
    self.query.text = text.into();
    self.refresh();
  }

  pub fn clear_search(&mut self) {
    self.set_search(String::new());
  }

  pub fn set_query(&mut self, query: HistoryQuery) {
    self.query = query;
    self.refresh();
  }

  pub fn toggle_sort(&mut self, requested: SortKey) {
    self.query.toggle_sort(requested);
    self.refresh();
  }

  pub fn query(&self) -> &HistoryQuery {
    &self.query
  }

  pub fn items(&self) -> &[SavedComparison] {
    &self.items
  }

  pub fn find(&self, id: i64) -> Option<&SavedComparison> {
    self.items.iter().find(|item| item.id() == id)
  }

  pub fn visible(&self) -> impl Iterator<Item = &SavedComparison> {
    self.visible.iter().map(|&index| &self.items[index])
  }

  fn refresh(&mut self) {
    self.visible = visible_indices(&self.items, &self.query);
  }
}
