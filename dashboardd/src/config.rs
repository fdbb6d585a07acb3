use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Authoritative data directory, one JSON document per entity
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory older clients read the services list from
    #[serde(default = "default_legacy_dir")]
    pub legacy_dir: PathBuf,
    /// Bounded wait for the per-document write lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Scanner entry point, spawned fire-and-forget
    #[serde(default = "default_scan_script")]
    pub script: PathBuf,
    /// A progress record older than this is reported as idle
    #[serde(default = "default_stale_after")]
    pub stale_after_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/dashboardd/data")
}

fn default_legacy_dir() -> PathBuf {
    PathBuf::from("/var/www/site")
}

fn default_lock_timeout_ms() -> u64 {
    2000
}

fn default_scan_script() -> PathBuf {
    PathBuf::from("/opt/scan.sh")
}

fn default_stale_after() -> u64 {
    300
}

fn default_listen() -> String {
    "[::]:8090".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            legacy_dir: default_legacy_dir(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            script: default_scan_script(),
            stale_after_secs: default_stale_after(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}
