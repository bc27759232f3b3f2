use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use bucketeer::backend::HttpBackend;
use bucketeer::cli::commands;
use bucketeer::config::{default_config_path, ClientConfig, ConfigOverrides};
use bucketeer::history::SortKey;
use bucketeer::model::{self, ComparisonRequest};
use bucketeer::notice::ConsoleNotifier;
use bucketeer::ComparisonSession;

#[derive(Parser)]
#[command(name = "bucketeer")]
#[command(about = "Bucketeer - compare elevator buckets side by side")]
#[command(version)]
struct Cli {
  /// Calculation service base URL (default: BUCKETEER_API_URL or the config file)
  #[arg(long, global = true)]
  api_url: Option<String>,

  /// Bearer token for the calculation service (default: BUCKETEER_TOKEN)
  #[arg(long, global = true)]
  token: Option<String>,

  /// Request timeout in seconds
  #[arg(long, global = true)]
  timeout: Option<u64>,

  /// Config file (default: <config dir>/bucketeer/config.yaml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

/// Operating point of a comparison
#[derive(Args)]
struct OperatingPoint {
  /// Belt speed (m/s)
  #[arg(long, default_value_t = model::DEFAULT_SPEED)]
  speed: f64,
  /// Product density (kg/m3)
  #[arg(long, default_value_t = model::DEFAULT_PRODUCT_DENSITY)]
  density: f64,
  /// Number of bucket rows
  #[arg(long, default_value_t = model::DEFAULT_NUMBER_OF_ROWS)]
  rows: u32,
  /// Bucket pitch (mm)
  #[arg(long, default_value_t = model::DEFAULT_PITCH)]
  pitch: f64,
  /// Filling (%)
  #[arg(long, default_value_t = model::DEFAULT_FILLING)]
  filling: f64,
  /// Unit price override for the selected bucket
  #[arg(long)]
  selected_price: Option<f64>,
  /// Unit price override for the comparison bucket
  #[arg(long)]
  comparison_price: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
  /// List the bucket catalog
  Buckets,
  /// List bucket materials
  Materials,
  /// Compare two buckets
  Compare {
    /// Id of the selected bucket
    selected: i64,
    /// Id of the bucket to compare against
    comparison: i64,
    #[command(flatten)]
    point: OperatingPoint,
    /// Save the result; without a name, "Comparison - <today>" is used
    #[arg(long, num_args = 0..=1, value_name = "NAME")]
    save: Option<Option<String>>,
  },
  /// List saved comparisons
  History {
    /// Filter by name or capacity
    #[arg(short, long)]
    query: Option<String>,
    /// Sort key
    #[arg(short, long, value_enum, default_value_t = SortKey::Date)]
    sort: SortKey,
    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,
  },
  /// Show a saved comparison
  Show {
    /// Id of the saved comparison
    id: i64,
  },
  /// Generate an AI insight for a saved comparison
  Insight {
    /// Id of the saved comparison
    id: i64,
    /// Replace an existing insight
    #[arg(long)]
    regenerate: bool,
  },
}

impl OperatingPoint {
  fn into_request(self, selected: i64, comparison: i64) -> ComparisonRequest {
    ComparisonRequest {
      speed: self.speed,
      product_density: self.density,
      number_of_rows: Some(self.rows),
      pitch: Some(self.pitch),
      filling: Some(self.filling),
      selected_bucket_unit_price: self.selected_price,
      comparison_bucket_unit_price: self.comparison_price,
      ..ComparisonRequest::new(selected, comparison)
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("bucketeer=debug,reqwest=info,warn")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bucketeer=warn,error"))
  };
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  let overrides = ConfigOverrides { api_url: cli.api_url, timeout_secs: cli.timeout, token: cli.token };
  let config_path = cli.config.or_else(default_config_path);
  let config =
    ClientConfig::resolve(config_path.as_deref(), |key| std::env::var(key).ok(), overrides)?;
  info!(api = %config.api_root(), "using calculation service");

  let backend = HttpBackend::new(config)?;
  let session = Arc::new(ComparisonSession::over_http(backend, Arc::new(ConsoleNotifier)));

  let interrupted = session.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupted");
      interrupted.shutdown();
    }
  });

  match cli.command {
    Command::Buckets => commands::list_buckets(&session).await,
    Command::Materials => commands::list_materials(&session).await,
    Command::Compare { selected, comparison, point, save } => {
      commands::compare(&session, point.into_request(selected, comparison), save).await
    }
    Command::History { query, sort, asc } => commands::history(&session, query, sort, asc).await,
    Command::Show { id } => commands::show(&session, id).await,
    Command::Insight { id, regenerate } => commands::insight(&session, id, regenerate).await,
  }
}
