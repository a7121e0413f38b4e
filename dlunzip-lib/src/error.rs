use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DlUnzipError {
    #[error("Download failed: {url} returned {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("The UI thread is no longer running")]
    UiThreadGone,

    #[error("Invalid settings file {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    #[error("Failed to prepare extraction directory {path}: {source}")]
    PrepareDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
