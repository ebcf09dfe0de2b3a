use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::url_model::NamingScheme;

/// Default output root, relative to the current working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "raw_html_content";

/// Global configuration loaded from `~/.config/rawfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawfetchConfig {
    /// Directory that receives one `_raw.html` file per fetched URL.
    pub output_dir: PathBuf,
    /// Maximum requests in flight at once (None = all URLs at once).
    #[serde(default)]
    pub max_concurrent: Option<usize>,
    /// Total time allowed for one request, connect through last body byte.
    pub request_timeout_secs: u64,
    /// Time allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Follow 3xx responses; when false a redirect is reported as an HTTP failure.
    pub follow_redirects: bool,
    /// Upper bound on redirects followed per request.
    pub max_redirects: u32,
    /// Optional `User-Agent` header (None = libcurl sends none).
    #[serde(default)]
    pub user_agent: Option<String>,
    /// How artifact filenames are derived from URLs.
    #[serde(default)]
    pub naming: NamingScheme,
}

impl Default for RawfetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_concurrent: None,
            request_timeout_secs: 300,
            connect_timeout_secs: 30,
            follow_redirects: true,
            max_redirects: 10,
            user_agent: None,
            naming: NamingScheme::Verbatim,
        }
    }
}

impl RawfetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rawfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RawfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RawfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)
            .with_context(|| format!("failed to write default config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let cfg: RawfetchConfig =
        toml::from_str(&data).with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}
