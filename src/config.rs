//! Application-level configuration loading: search budgets, balancing bias and history location.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

use crate::services::{
    balancer::{BalanceSettings, DEFAULT_BIAS_OVERRIDE_PROBABILITY},
    rotation::{DEFAULT_MAX_ATTEMPTS, RotationSettings},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PADDLE_ROTATION_CONFIG_PATH";
/// Default location of the session history log.
const DEFAULT_HISTORY_PATH: &str = "data/history.json";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    balance: BalanceSettings,
    rotation: RotationSettings,
    history_path: PathBuf,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        max_pair_attempts = app_config.rotation.max_attempts,
                        bias_override_probability = app_config.balance.bias_override_probability,
                        history_path = %app_config.history_path.display(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Settings handed to the team balancer.
    pub fn balance(&self) -> &BalanceSettings {
        &self.balance
    }

    /// Settings handed to the round generator.
    pub fn rotation(&self) -> &RotationSettings {
        &self.rotation
    }

    /// File backing the session history log.
    pub fn history_path(&self) -> &Path {
        &self.history_path
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            balance: BalanceSettings::default(),
            rotation: RotationSettings::default(),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
///
/// Every field is optional; missing ones keep their default.
struct RawConfig {
    max_pair_attempts: Option<usize>,
    bias_override_probability: Option<f64>,
    history_path: Option<PathBuf>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let max_attempts = match value.max_pair_attempts {
            Some(0) => {
                warn!("max_pair_attempts must be positive; using default");
                DEFAULT_MAX_ATTEMPTS
            }
            Some(attempts) => attempts,
            None => DEFAULT_MAX_ATTEMPTS,
        };

        let bias_override_probability = match value.bias_override_probability {
            Some(probability) if (0.0..=1.0).contains(&probability) => probability,
            Some(probability) => {
                warn!(
                    probability,
                    "bias_override_probability must lie in [0, 1]; using default"
                );
                DEFAULT_BIAS_OVERRIDE_PROBABILITY
            }
            None => DEFAULT_BIAS_OVERRIDE_PROBABILITY,
        };

        Self {
            balance: BalanceSettings {
                bias_override_probability,
            },
            rotation: RotationSettings { max_attempts },
            history_path: value
                .history_path
                .filter(|path| !path.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH)),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_keep_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{ "max_pair_attempts": 250 }"#).unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.rotation().max_attempts, 250);
        assert_eq!(
            config.balance().bias_override_probability,
            DEFAULT_BIAS_OVERRIDE_PROBABILITY
        );
        assert_eq!(config.history_path(), Path::new(DEFAULT_HISTORY_PATH));
    }

    #[test]
    fn out_of_range_values_are_replaced() {
        let raw = RawConfig {
            max_pair_attempts: Some(0),
            bias_override_probability: Some(1.5),
            history_path: Some(PathBuf::new()),
        };
        let config: AppConfig = raw.into();

        assert_eq!(config.rotation().max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(
            config.balance().bias_override_probability,
            DEFAULT_BIAS_OVERRIDE_PROBABILITY
        );
        assert_eq!(config.history_path(), Path::new(DEFAULT_HISTORY_PATH));
    }
}
