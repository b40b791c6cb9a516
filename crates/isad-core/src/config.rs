use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default sharedstreams host tried before any redirect.
pub const DEFAULT_HOST: &str = "p23-sharedstreams.icloud.com";

/// Global configuration loaded from `~/.config/isad/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsadConfig {
    /// Sharedstreams host contacted first; the service may redirect once
    /// to a shard-specific host.
    pub default_host: String,
    /// Maximum number of files downloaded at the same time.
    pub max_concurrent_downloads: usize,
    /// Connect timeout for every HTTP request, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for IsadConfig {
    fn default() -> Self {
        Self {
            default_host: DEFAULT_HOST.to_string(),
            max_concurrent_downloads: 3,
            connect_timeout_secs: 15,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("isad")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<IsadConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = IsadConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: IsadConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = IsadConfig::default();
        assert_eq!(cfg.default_host, "p23-sharedstreams.icloud.com");
        assert_eq!(cfg.max_concurrent_downloads, 3);
        assert_eq!(cfg.connect_timeout_secs, 15);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = IsadConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: IsadConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.default_host, cfg.default_host);
        assert_eq!(parsed.max_concurrent_downloads, cfg.max_concurrent_downloads);
        assert_eq!(parsed.connect_timeout_secs, cfg.connect_timeout_secs);
    }
}
