//! Client configuration loaded from TOML, with defaults that match the
//! development backend (localhost:8000, 2s poll interval, 30 attempts).
//!
//! Set LEARNWAY_CONFIG_PATH to point at a TOML file; any missing field falls
//! back to its default. LEARNWAY_API_URL overrides `base_url` on top of that.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Backend root, no trailing slash.
  pub base_url: String,
  /// Per-request timeout in seconds.
  pub request_timeout_secs: u64,
  /// Fixed delay between poll attempts, in seconds. Not exponential:
  /// parsing is expected to finish within a roughly known window.
  pub poll_interval_secs: u64,
  /// Hard ceiling on poll attempts before the client gives up.
  pub poll_max_attempts: u32,
  /// Default question count for quiz generation.
  pub quiz_count: u32,
  /// Directory holding the persisted profile. Defaults to the current dir.
  pub profile_dir: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:8000".into(),
      request_timeout_secs: 20,
      poll_interval_secs: 2,
      poll_max_attempts: 30,
      quiz_count: 5,
      profile_dir: ".".into(),
    }
  }
}

impl ClientConfig {
  pub fn poll_interval(&self) -> std::time::Duration {
    std::time::Duration::from_secs(self.poll_interval_secs)
  }
}

/// Load `ClientConfig` from LEARNWAY_CONFIG_PATH, then apply env overrides.
/// On any parsing/IO error the file is ignored and defaults are used.
pub fn load_config_from_env() -> ClientConfig {
  let mut cfg = match std::env::var("LEARNWAY_CONFIG_PATH") {
    Ok(path) => match std::fs::read_to_string(&path) {
      Ok(s) => match toml::from_str::<ClientConfig>(&s) {
        Ok(cfg) => {
          info!(target: "learnyourway", %path, "Loaded client config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "learnyourway", %path, error = %e, "Failed to parse TOML config; using defaults");
          ClientConfig::default()
        }
      },
      Err(e) => {
        error!(target: "learnyourway", %path, error = %e, "Failed to read TOML config file; using defaults");
        ClientConfig::default()
      }
    },
    Err(_) => ClientConfig::default(),
  };

  if let Ok(url) = std::env::var("LEARNWAY_API_URL") {
    cfg.base_url = url.trim_end_matches('/').to_string();
  }
  cfg
}
