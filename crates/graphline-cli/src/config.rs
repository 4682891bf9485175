//! Configuration loading from TOML files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use graphline_ingest::{KindConfig, KindOverrides};
use graphline_kinds::Kind;
use serde::Deserialize;

/// Global configuration for graphline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sparql: SparqlConfig,
    pub index: IndexConfig,
    pub paths: PathsConfig,
    pub workers: WorkersConfig,
    pub http: HttpSection,
    /// Per-kind overrides, keyed by kind name
    pub kinds: BTreeMap<String, KindOverrides>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SparqlConfig {
    #[serde(deserialize_with = "deserialize_env_var")]
    pub endpoint: String,
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://deepcarbon.tw.rpi.edu:3030/VIVO/query".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    #[serde(deserialize_with = "deserialize_env_var")]
    pub endpoint: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `queries/` and `mappings/`
    pub root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorkersConfig {
    pub default: usize,
    pub max: usize,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self { default: 4, max: 16 }
    }
}

impl WorkersConfig {
    /// Requested worker count clamped to `1..=max`
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default).clamp(1, self.max.max(1))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            request_timeout_secs: 120,
        }
    }
}

/// Deserialize a string that may be an environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    expand_env_var(&s).ok_or_else(|| serde::de::Error::custom(format!("{s} is not set")))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./graphline.toml (current directory)
    /// 2. ~/.config/graphline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("graphline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "graphline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.check_kind_names()?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn check_kind_names(&self) -> Result<()> {
        for name in self.kinds.keys() {
            if Kind::from_name(name).is_none() {
                anyhow::bail!("Unknown kind in [kinds.{name}]");
            }
        }
        Ok(())
    }

    /// Built-in configuration for `kind` with the `[kinds.*]` overrides applied
    pub fn kind_config(&self, kind: Kind) -> KindConfig {
        let mut config = KindConfig::defaults(kind, &self.paths.root);
        for (name, overrides) in &self.kinds {
            if Kind::from_name(name) == Some(kind) {
                config.apply(overrides);
            }
        }
        config
    }

    pub fn http_config(&self, request_timeout_override: Option<u64>) -> graphline_core::HttpConfig {
        graphline_core::HttpConfig {
            connect_timeout: std::time::Duration::from_secs(self.http.connect_timeout_secs),
            request_timeout: std::time::Duration::from_secs(
                request_timeout_override.unwrap_or(self.http.request_timeout_secs),
            ),
        }
    }
}
