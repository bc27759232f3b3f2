//! Client configuration
//!
//! Resolution order, lowest to highest: built-in defaults, the YAML file in
//! the user config directory, `BUCKETEER_*` environment variables, and
//! finally explicit overrides (command line flags).

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "BUCKETEER_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "BUCKETEER_TIMEOUT_SECS";
pub const ENV_TOKEN: &str = "BUCKETEER_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  /// API root, e.g. "http://localhost:5000/api"
  pub base_url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
  /// Bearer token of the signed-in user
  pub token: Option<String>,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: DEFAULT_BASE_URL.to_string(), timeout_secs: DEFAULT_TIMEOUT_SECS, token: None }
  }
}

/// On-disk form; every key is optional
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
  api_url: Option<String>,
  timeout_secs: Option<u64>,
  token: Option<String>,
}

/// Explicit values that win over every other source
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
  pub api_url: Option<String>,
  pub timeout_secs: Option<u64>,
  pub token: Option<String>,
}

impl ClientConfig {
  /// Load from the default file location and the process environment
  pub fn load(overrides: ConfigOverrides) -> Result<Self> {
    let file = default_config_path();
    Self::resolve(file.as_deref(), |key| std::env::var(key).ok(), overrides)
  }

  pub fn resolve(
    file: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    overrides: ConfigOverrides,
  ) -> Result<Self> {
    let mut config = Self::default();

    if let Some(path) = file.filter(|path| path.exists()) {
      let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
      let parsed: ConfigFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
      config.apply(parsed.api_url, parsed.timeout_secs, parsed.token);
    }

    let env_timeout = match env(ENV_TIMEOUT_SECS) {
      Some(raw) => Some(
        raw.trim().parse::<u64>().with_context(|| format!("{ENV_TIMEOUT_SECS} must be a number"))?,
      ),
      None => None,
    };
    config.apply(env(ENV_API_URL), env_timeout, env(ENV_TOKEN));
    config.apply(overrides.api_url, overrides.timeout_secs, overrides.token);

    config.validate()?;
    Ok(config)
  }

  fn apply(&mut self, api_url: Option<String>, timeout_secs: Option<u64>, token: Option<String>) {
    if let Some(api_url) = api_url {
      self.base_url = api_url;
    }
    if let Some(timeout_secs) = timeout_secs {
      self.timeout_secs = timeout_secs;
    }
    if let Some(token) = token.filter(|token| !token.trim().is_empty()) {
      self.token = Some(token);
    }
  }

  pub fn validate(&self) -> Result<()> {
    let url = Url::parse(&self.base_url)
      .with_context(|| format!("Invalid API url '{}'", self.base_url))?;
    if !matches!(url.scheme(), "http" | "https") {
      return Err(anyhow!("API url must use http or https, got '{}'", url.scheme()));
    }
    if self.timeout_secs == 0 {
      return Err(anyhow!("Timeout must be at least one second"));
    }
    Ok(())
  }

  /// Base URL without a trailing slash
  pub fn api_root(&self) -> &str {
    self.base_url.trim_end_matches('/')
  }
}

pub fn default_config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| dir.join("bucketeer").join("config.yaml"))
}
