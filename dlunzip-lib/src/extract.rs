use crate::error::DlUnzipError;
use crate::logging::spinner_style;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Unpacks a downloaded archive into a destination directory.
pub trait ArchiveExtractor {
    /// Returns the number of entries written.
    fn extract(&self, archive_path: &Path, destination: &Path) -> Result<usize>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    #[instrument(skip_all)]
    fn extract(&self, archive_path: &Path, destination: &Path) -> Result<usize> {
        let current_span = tracing::Span::current();
        current_span.pb_set_style(&spinner_style("{msg}")?);
        current_span.pb_set_message("Extracting...");
        current_span.pb_set_finish_message("Extracting... Done");

        let file = fs::File::open(archive_path)
            .context(format!("Failed to open archive: {}", archive_path.display()))?;
        let mut archive = zip::ZipArchive::new(file)?;
        let mut written = 0;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let outpath = match file.enclosed_name() {
                Some(path) => destination.join(path),
                None => {
                    tracing::warn!("Skipping unsafe archive entry: {}", file.name());
                    continue;
                }
            };

            if file.is_dir() {
                fs::create_dir_all(&outpath)?;
            } else {
                if let Some(p) = outpath.parent()
                    && !p.exists()
                {
                    fs::create_dir_all(p)?;
                }
                let mut outfile = fs::File::create(&outpath)?;
                std::io::copy(&mut file, &mut outfile)?;
            }
            written += 1;
        }

        Ok(written)
    }
}

/// Removes whatever is at `path` and recreates it as an empty directory.
pub fn prepare_extraction_dir(path: &Path) -> Result<(), DlUnzipError> {
    let io_err = |source| DlUnzipError::PrepareDirectory {
        path: path.to_path_buf(),
        source,
    };

    if let Ok(metadata) = fs::symlink_metadata(path) {
        if metadata.is_dir() {
            fs::remove_dir_all(path).map_err(io_err)?;
        } else {
            fs::remove_file(path).map_err(io_err)?;
        }
    }

    fs::create_dir_all(path).map_err(io_err)
}
