//! Display formatting utilities for CLI output

use chrono::{DateTime, Local, Utc};
use colored::*;

use crate::catalog::BucketOption;
use crate::chart::{BarSeries, ChartSet, RadarSeries};
use crate::format::{format_difference, Tone};
use crate::history::HistoryQuery;
use crate::metrics::spec_for;
use crate::model::{Attribute, BucketDetails, ComparisonResult, Material, SavedComparison};

const BAR_WIDTH: usize = 24;
const LABEL_WIDTH: usize = 22;

pub fn attribute_label(attribute: Attribute) -> &'static str {
  match attribute {
    Attribute::Volume => "Volume",
    Attribute::EdgeVolume => "Edge volume",
    Attribute::Displacement => "Displacement",
    Attribute::TractionResistance => "Traction resistance",
    Attribute::RecommendedPitch => "Recommended pitch",
    Attribute::UnitPrice => "Unit price",
    Attribute::BucketsPerMeter => "Buckets per meter",
    Attribute::Filling => "Filling",
    Attribute::NumberOfRows => "Number of rows",
    Attribute::Capacity => "Capacity",
    Attribute::AbrasionResistance => "Abrasion resistance",
    Attribute::PricePerMeter => "Price per meter",
  }
}

pub fn format_timestamp(utc_time: DateTime<Utc>) -> String {
  let local_time: DateTime<Local> = utc_time.into();
  local_time.format("%d/%m/%Y %H:%M").to_string()
}

/// Horizontal bar for a percent difference; 100% fills `width`
pub fn bar(value: f64, width: usize) -> String {
  let magnitude = if value.is_finite() { value.abs().min(100.0) } else { 0.0 };
  let cells = ((magnitude / 100.0) * width as f64).round() as usize;
  "█".repeat(cells.min(width))
}

fn tinted(text: String, value: f64, lower_is_better: bool) -> ColoredString {
  let tone = match Tone::of(value) {
    Tone::Positive if lower_is_better => Tone::Negative,
    Tone::Negative if lower_is_better => Tone::Positive,
    tone => tone,
  };
  match tone {
    Tone::Positive => text.green(),
    Tone::Negative => text.red(),
    Tone::Neutral => text.normal(),
  }
}

fn value_cell(bucket: &BucketDetails, attribute: Attribute) -> String {
  match bucket.value(attribute) {
    Some(value) => format!("{value:.2}"),
    None => "-".to_string(),
  }
}

pub fn display_bucket_options(options: &[BucketOption]) {
  if options.is_empty() {
    println!("No buckets found.");
    return;
  }

  for option in options {
    println!("{:>6}  {}", option.value.to_string().dimmed(), option.label);
  }
}

pub fn display_materials(materials: &[Material]) {
  if materials.is_empty() {
    println!("No materials found.");
    return;
  }

  for material in materials {
    println!("{:>6}  {}", material.id.to_string().dimmed(), material.name);
  }
}

pub fn display_comparison(result: &ComparisonResult, charts: &ChartSet) {
  let selected = &result.selected_bucket;
  let comparison = &result.comparison_bucket;

  let title = match &result.name {
    Some(name) => format!("{name}: {} vs {}", selected.code, comparison.code),
    None => format!("{} vs {}", selected.code, comparison.code),
  };
  println!("{}", title.bold());
  if let Some(id) = result.id {
    print!("{}", format!("#{id}").dimmed());
    match result.calculated_at {
      Some(at) => println!(" {}", format_timestamp(at).dimmed()),
      None => println!(),
    }
  }
  println!();

  println!(
    "{:<LABEL_WIDTH$} {:>12} {:>12} {:>10}",
    "",
    selected.code.cyan(),
    comparison.code.yellow(),
    "diff".dimmed()
  );
  for attribute in Attribute::ALL {
    let difference = match result.comparison_result.get(attribute) {
      Some(value) => {
        let lower_is_better = spec_for(attribute).is_some_and(|spec| spec.lower_is_better);
        tinted(format_difference(value), value, lower_is_better)
      }
      None => "".normal(),
    };
    println!(
      "{:<LABEL_WIDTH$} {:>12} {:>12} {:>10}",
      attribute_label(attribute),
      value_cell(selected, attribute),
      value_cell(comparison, attribute),
      difference
    );
  }

  println!();
  display_bars(&charts.bars);
  println!();
  display_radar(&charts.radar);

  if let Some(insight) = &result.insight {
    println!();
    println!("{}", "Insight".bold());
    println!("{}", insight.text);
  }
}

pub fn display_bars(bars: &BarSeries) {
  println!("{}", bars.label.bold());
  for entry in &bars.entries {
    if entry.degenerate {
      println!("{:<LABEL_WIDTH$} {}", entry.label, "n/a".dimmed());
      continue;
    }

    let drawn = bar(entry.value, BAR_WIDTH);
    let drawn = if entry.favorable { drawn.green() } else { drawn.red() };
    println!("{:<LABEL_WIDTH$} {:>9} {}", entry.label, format_difference(entry.value), drawn);
  }
}

pub fn display_radar(radar: &RadarSeries) {
  println!(
    "{:<LABEL_WIDTH$} {:>12} {:>12}",
    "Profile (0-100)".bold(),
    radar.selected.label.cyan(),
    radar.comparison.label.yellow()
  );
  for (index, label) in radar.labels.iter().enumerate() {
    let selected = radar.selected.values.get(index).copied().unwrap_or_default();
    let comparison = radar.comparison.values.get(index).copied().unwrap_or_default();
    println!("{label:<LABEL_WIDTH$} {selected:>12.1} {comparison:>12.1}");
  }
}

pub fn display_history(items: &[SavedComparison], query: &HistoryQuery) {
  let search = query.text.trim();
  if items.is_empty() {
    if search.is_empty() {
      println!("No saved comparisons.");
    } else {
      println!("No saved comparisons match {}", search.yellow());
    }
    return;
  }

  println!("{}", format!("Sorted by {} ({})", query.key, query.direction).dimmed());
  for item in items {
    let result = item.result();
    let when = item.calculated_at().map(format_timestamp).unwrap_or_else(|| "-".to_string());
    println!(
      "{:>6}  {:<16}  {}  {} vs {}  {}",
      item.id().to_string().dimmed(),
      when,
      item.name().unwrap_or("(unnamed)").bold(),
      result.selected_bucket.code.cyan(),
      result.comparison_bucket.code.yellow(),
      format!("{:.2} / {:.2}", result.selected_bucket.capacity, result.comparison_bucket.capacity)
        .dimmed()
    );
  }
}
