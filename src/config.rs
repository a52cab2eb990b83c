use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub alerts: AlertsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    /// Clock ticks per second; 0 means detect from the OS.
    pub clock_ticks: u64,
    pub max_rows: usize,
    pub default_sort: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 1500,
            clock_ticks: 0,
            max_rows: 100,
            default_sort: "cpu".to_string(),
        }
    }
}

/// Thresholds and destinations read by the alert evaluator. Shared between
/// threads only as an immutable `Arc` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    pub cpu_threshold: f64,
    pub mem_threshold: f64,
    /// Key into `webhooks`; empty disables webhook delivery.
    pub active_webhook: String,
    pub webhooks: BTreeMap<String, String>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        AlertsConfig {
            cpu_threshold: 80.0,
            mem_threshold: 80.0,
            active_webhook: String::new(),
            webhooks: BTreeMap::new(),
        }
    }
}

impl AlertsConfig {
    pub fn active_webhook_url(&self) -> Option<&str> {
        self.webhooks
            .get(&self.active_webhook)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sentinel").join("config.toml"))
}

/// Reads `path`; a missing or malformed file yields the defaults, which are
/// written back so later runs see the same values. A malformed file is first
/// copied aside to `<name>.bak`.
pub fn load_config_from_path(path: &Path) -> Config {
    match try_load_config(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), "using default config: {err:#}");
            if path.exists() {
                let backup = backup_path(path);
                if let Err(err) = std::fs::copy(path, &backup) {
                    tracing::warn!(path = %backup.display(), "could not back up config: {err}");
                }
            }
            let config = Config::default();
            if let Err(err) = save_config(path, &config) {
                tracing::warn!(path = %path.display(), "could not persist default config: {err:#}");
            }
            config
        }
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

/// Strict load used by hot reload, where a bad edit must keep the previous
/// configuration instead of resetting it.
pub fn try_load_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    toml::from_str(&contents).wrap_err_with(|| format!("parsing {}", path.display()))
}

pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
