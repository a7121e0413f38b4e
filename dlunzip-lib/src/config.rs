use crate::error::DlUnzipError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ARCHIVE_URL: &str =
    "https://raw.githubusercontent.com/daisuke-t-jp/DownloadAndUnZip/master/image.zip";

#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for dlunzip data, scoped to the platform cache location
    pub cache_dir: PathBuf,

    /// Directory the archive is unpacked into. Wiped before every extraction.
    pub extract_dir: PathBuf,

    /// Where the archive is written while it is being downloaded
    pub download_path: PathBuf,

    /// Optional user overrides
    pub settings_file: PathBuf,

    pub settings: Settings,
}

/// User-tunable part of the configuration, read from `settings.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Archive to download
    pub url: String,

    /// Subdirectory of the archive holding the images
    pub image_dir: String,

    /// Shown on the first display surface
    pub first_image: String,

    /// Shown on the second display surface
    pub second_image: String,

    /// Time allowed until the transfer starts, in seconds
    pub connect_timeout_secs: u64,

    /// Time allowed for the whole transfer, in seconds
    pub overall_timeout_secs: u64,

    /// Download at reduced priority
    pub discretionary: bool,

    /// Allow locally cached responses instead of always going to the server
    pub reuse_cache: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_ARCHIVE_URL.to_string(),
            image_dir: "image".to_string(),
            first_image: "melon.png".to_string(),
            second_image: "lemon.png".to_string(),
            connect_timeout_secs: 10,
            overall_timeout_secs: 60 * 60,
            discretionary: true,
            reuse_cache: false,
        }
    }
}

/// How a download session treats locally cached responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    UseProtocolDefault,
    ReloadIgnoringLocalCache,
}

/// Transient network configuration, built fresh for every download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub discretionary: bool,
    pub cache_policy: CachePolicy,
    pub request_timeout: Duration,
    pub resource_timeout: Duration,
}

impl Settings {
    pub fn session(&self) -> SessionSettings {
        SessionSettings {
            discretionary: self.discretionary,
            cache_policy: if self.reuse_cache {
                CachePolicy::UseProtocolDefault
            } else {
                CachePolicy::ReloadIgnoringLocalCache
            },
            request_timeout: Duration::from_secs(self.connect_timeout_secs),
            resource_timeout: Duration::from_secs(self.overall_timeout_secs),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read settings file: {}", path.display()))?;
        let settings = toml::from_str(&content).map_err(|e| DlUnzipError::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = self.to_toml()?;
        fs::write(path, content)
            .context(format!("Failed to write settings file: {}", path.display()))?;
        Ok(())
    }
}

impl Config {
    pub fn new_for_path(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            extract_dir: cache_dir.join("unzip"),
            download_path: cache_dir.join("download.zip"),
            settings_file: cache_dir.join("settings.toml"),
            settings: Settings::default(),
        }
    }

    /// Sets up a new Config for the given cache directory and loads `settings.toml` from it.
    /// See also [Self::default_cache_dir].
    pub fn setup(cache_dir: Option<&Path>) -> Result<Self> {
        let cache_dir = cache_dir
            .map(|d| d.to_path_buf())
            .unwrap_or_else(Self::default_cache_dir);
        let mut config = Self::new_for_path(&cache_dir);

        fs::create_dir_all(&config.cache_dir).context(format!(
            "Failed to create cache directory: {}",
            config.cache_dir.display()
        ))?;
        config.settings = Settings::load(&config.settings_file)?;

        Ok(config)
    }

    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".cache"))
            .join("dlunzip")
    }

    pub fn image_paths(&self) -> [PathBuf; 2] {
        let image_dir = self.extract_dir.join(&self.settings.image_dir);
        [
            image_dir.join(&self.settings.first_image),
            image_dir.join(&self.settings.second_image),
        ]
    }
}
