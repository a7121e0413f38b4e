use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Snapshot of what is currently unpacked in the cache.
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    pub cache_dir: PathBuf,
    pub extract_dir: PathBuf,
    /// When the extraction directory was last recreated
    pub extracted_at: Option<DateTime<Local>>,
    /// Files relative to the extraction directory, sorted
    pub files: Vec<PathBuf>,
    pub total_bytes: u64,
    /// A partially downloaded archive is lying around
    pub leftover_download: bool,
}

impl CacheInfo {
    pub fn collect(config: &Config) -> Result<Self> {
        let extract_dir = &config.extract_dir;
        let mut files = Vec::new();
        let mut total_bytes = 0;

        let extracted_at = match fs::metadata(extract_dir) {
            Ok(metadata) if metadata.is_dir() => metadata.modified().ok().map(DateTime::from),
            _ => None,
        };

        if extracted_at.is_some() {
            for entry in WalkDir::new(extract_dir).min_depth(1) {
                let entry = entry.context("Failed to read extraction directory")?;
                if !entry.file_type().is_file() {
                    continue;
                }
                total_bytes += entry.metadata()?.len();
                if let Some(relative) = pathdiff::diff_paths(entry.path(), extract_dir) {
                    files.push(relative);
                }
            }
        }
        files.sort();

        Ok(Self {
            cache_dir: config.cache_dir.clone(),
            extract_dir: extract_dir.clone(),
            extracted_at,
            files,
            total_bytes,
            leftover_download: config.download_path.exists(),
        })
    }
}

/// Removes the extraction directory and any leftover download.
/// Returns whether anything was removed.
pub fn clear(config: &Config) -> Result<bool> {
    let mut removed = false;

    if config.extract_dir.exists() {
        fs::remove_dir_all(&config.extract_dir).context(format!(
            "Failed to remove {}",
            config.extract_dir.display()
        ))?;
        removed = true;
    }

    if config.download_path.exists() {
        fs::remove_file(&config.download_path).context(format!(
            "Failed to remove {}",
            config.download_path.display()
        ))?;
        removed = true;
    }

    Ok(removed)
}
