use crate::config::SessionSettings;
use anyhow::Result;
use std::path::Path;

pub trait DownloadClient {
    /// Downloads `url` into `output_path` using a network session built from `session`.
    /// The session only lives for the duration of this call.
    fn download(
        &self,
        session: &SessionSettings,
        url: &str,
        output_path: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}
