use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the portfolio API lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server address (e.g., "http://localhost:5000"). A trailing API
    /// prefix is tolerated and not duplicated.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix every endpoint lives under (default: "api").
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Total request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Resource cache timers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Background refresh period for dashboard stats (0 disables it).
    #[serde(default = "default_stats_refresh")]
    pub stats_refresh_seconds: u64,
}

/// Form pipeline timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// How long the success indicator stays up before the form
    /// returns to editing.
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
}

/// Durable client storage placement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the durable store. Defaults to the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_api_prefix() -> String {
    "api".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_stats_refresh() -> u64 {
    30
}

fn default_success_display_ms() -> u64 {
    3000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stats_refresh_seconds: default_stats_refresh(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            success_display_ms: default_success_display_ms(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }
}

impl CacheConfig {
    /// Refresh period for dashboard stats, `None` when disabled.
    pub fn stats_refresh(&self) -> Option<Duration> {
        (self.stats_refresh_seconds > 0).then(|| Duration::from_secs(self.stats_refresh_seconds))
    }
}

impl FormConfig {
    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}

impl StorageConfig {
    /// Resolved storage directory.
    ///
    /// Uses `<data_dir>/folio` via `dirs::data_dir()`, falling back to the
    /// current directory when the platform has none.
    pub fn resolve_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("folio"),
        }
    }
}
