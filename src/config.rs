//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/retrotree/retrotree.toml`
//! 3. Local config: `<dir>/.retrotree.toml` (current directory unless given)
//! 4. Environment variables: `RETROTREE__*`

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::BuildLimits;

/// Result assembly settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResultsConfig {
    /// Drop routes scoring below this value
    pub min_score: Option<f64>,
    /// Build the trees of a batch in parallel
    pub parallel: bool,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            min_score: None,
            parallel: true,
        }
    }
}

/// Raw limits for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLimits {
    pub max_nodes: Option<usize>,
    pub max_depth: Option<usize>,
}

/// Raw results settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawResultsConfig {
    pub min_score: Option<f64>,
    pub parallel: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub limits: RawLimits,
    pub results: RawResultsConfig,
}

/// Unified configuration for retrotree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Tree expansion ceilings (unbounded by default)
    pub limits: BuildLimits,
    /// Result assembly
    pub results: ResultsConfig,
}

/// Get the XDG config directory for retrotree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "retrotree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("retrotree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".retrotree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Typed value of an override key; unset is `None`, unparseable is an error.
fn env_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("environment override {}: {}", key, e),
        }),
    }
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            limits: BuildLimits {
                max_nodes: overlay.limits.max_nodes.or(self.limits.max_nodes),
                max_depth: overlay.limits.max_depth.or(self.limits.max_depth),
            },
            results: ResultsConfig {
                min_score: overlay.results.min_score.or(self.results.min_score),
                parallel: overlay.results.parallel.unwrap_or(self.results.parallel),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory holding `.retrotree.toml`; defaults to the current directory
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(local_dir, None)
    }

    /// Like [`Settings::load`], reading overrides from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        local_dir: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        let local_dir = match local_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(|e| ApplicationError::Config {
                message: format!("current directory: {}", e),
            })?,
        };
        let local_path = local_config_path(&local_dir);
        if local_path.exists() {
            debug!("loading local config: {}", local_path.display());
            current = current.merge_with(&load_raw_settings(&local_path)?);
        }

        Self::apply_env_overrides(current, env)
    }

    /// Apply RETROTREE__* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RETROTREE")
                    .separator("__")
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<usize>(&config, "limits.max_nodes")? {
            settings.limits.max_nodes = Some(val);
        }
        if let Some(val) = env_value::<usize>(&config, "limits.max_depth")? {
            settings.limits.max_depth = Some(val);
        }
        if let Some(val) = env_value::<f64>(&config, "results.min_score")? {
            settings.results.min_score = Some(val);
        }
        if let Some(val) = env_value::<bool>(&config, "results.parallel")? {
            settings.results.parallel = val;
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Starter config file content.
    pub fn template() -> &'static str {
        r#"# retrotree configuration

[limits]
# Maximum molecule nodes materialized per tree (unset = unbounded)
# max_nodes = 10000
# Maximum molecules on a root-to-leaf path (unset = unbounded)
# max_depth = 64

[results]
# Drop routes scoring below this value
# min_score = 0.5
# Build trees of a batch in parallel
parallel = true
"#
    }
}
