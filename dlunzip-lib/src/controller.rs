//! Download → extract → display pipeline with a single-flight guard.
//!
//! [`Controller::trigger`] starts at most one attempt at a time. An attempt
//! downloads the configured archive, wipes and recreates the extraction
//! directory, unpacks the archive into it and finally loads the two configured
//! images into the display surfaces on the UI thread.

use crate::config::Config;
use crate::display::{DisplaySurface, load_image};
use crate::download_client::DownloadClient;
use crate::extract::{ArchiveExtractor, prepare_extraction_dir};
use crate::ui_thread::UiThread;
use scopeguard::ScopeGuard;
use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

/// Result of pressing the trigger.
#[derive(Debug)]
pub enum Trigger {
    /// A new attempt was spawned; the handle resolves once it is over.
    Started(JoinHandle<AttemptOutcome>),
    /// Another attempt is still running. Nothing was started.
    AlreadyInFlight,
}

/// How an attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The transfer failed. The surfaces stay cleared.
    DownloadFailed(String),
    /// The extraction directory could not be wiped or recreated. The surfaces stay cleared.
    PrepareFailed(String),
    /// The display step ran.
    Displayed {
        extraction: ExtractionStatus,
        first_loaded: bool,
        second_loaded: bool,
    },
    /// The UI thread was gone when the display step was dispatched.
    UiUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    Extracted { entries: usize },
    Failed(String),
}

pub struct Controller<D, E> {
    config: Config,
    client: D,
    extractor: E,
    ui: UiThread,
    surfaces: [Arc<dyn DisplaySurface>; 2],
    in_flight: Mutex<bool>,
}

impl<D, E> Controller<D, E>
where
    D: DownloadClient + Send + Sync + 'static,
    E: ArchiveExtractor + Send + Sync + 'static,
{
    pub fn new(
        config: Config,
        client: D,
        extractor: E,
        ui: UiThread,
        surfaces: [Arc<dyn DisplaySurface>; 2],
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            client,
            extractor,
            ui,
            surfaces,
            in_flight: Mutex::new(false),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_downloading(&self) -> bool {
        *self.lock_in_flight()
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, bool> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a download unless one is already running. Must be called from within a tokio runtime.
    pub fn trigger(self: &Arc<Self>) -> Trigger {
        let mut in_flight = self.lock_in_flight();
        if *in_flight {
            tracing::debug!("Download already in progress, ignoring trigger");
            return Trigger::AlreadyInFlight;
        }
        *in_flight = true;

        self.clear_surfaces();

        // Clears the flag if the attempt panics or is dropped before completion.
        let guard = scopeguard::guard(self.clone(), Self::release as fn(Arc<Self>));
        let handle = tokio::spawn(Self::run_attempt(guard));
        Trigger::Started(handle)
    }

    fn clear_surfaces(&self) {
        let surfaces = self.surfaces.clone();
        let posted = self.ui.post(move || {
            for surface in &surfaces {
                surface.clear();
            }
        });
        if let Err(e) = posted {
            tracing::error!("Failed to clear display surfaces: {e}");
        }
    }

    fn release(controller: Arc<Self>) {
        controller.finish_attempt();
    }

    /// Clears the in-flight marker. Runs exactly once per attempt.
    fn finish_attempt(&self) {
        *self.lock_in_flight() = false;
        tracing::debug!("Download marked complete");
    }

    async fn run_attempt(guard: ScopeGuard<Arc<Self>, fn(Arc<Self>)>) -> AttemptOutcome {
        let session = guard.config.settings.session();
        let url = guard.config.settings.url.clone();

        let transfer = guard
            .client
            .download(&session, &url, &guard.config.download_path)
            .await;
        if transfer.is_err() {
            guard.discard_download();
        }
        let result = transfer.map(|()| guard.extraction_step());

        let controller = ScopeGuard::into_inner(guard);
        controller.finish_attempt();

        match result {
            Err(e) => {
                tracing::error!("Download of {url} failed: {e:#}");
                AttemptOutcome::DownloadFailed(format!("{e:#}"))
            }
            Ok(Err(message)) => AttemptOutcome::PrepareFailed(message),
            Ok(Ok(extraction)) => {
                tracing::info!("Download of {url} succeeded");
                controller.display_step(extraction).await
            }
        }
    }

    /// Wipes the extraction directory and unpacks the downloaded archive into it.
    /// `Err` means the directory could not be prepared and nothing was extracted.
    fn extraction_step(&self) -> Result<ExtractionStatus, String> {
        let extract_dir = &self.config.extract_dir;
        let archive = &self.config.download_path;

        if let Err(e) = prepare_extraction_dir(extract_dir) {
            tracing::error!("{e}");
            self.discard_download();
            return Err(e.to_string());
        }

        let status = match self.extractor.extract(archive, extract_dir) {
            Ok(entries) => {
                tracing::debug!("Extracted {entries} entries into {}", extract_dir.display());
                ExtractionStatus::Extracted { entries }
            }
            Err(e) => {
                tracing::warn!("Extraction of {} failed: {e:#}", archive.display());
                ExtractionStatus::Failed(format!("{e:#}"))
            }
        };

        self.discard_download();
        Ok(status)
    }

    /// Best-effort removal of the downloaded archive, complete or partial.
    fn discard_download(&self) {
        let archive = &self.config.download_path;
        match fs::remove_file(archive) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::debug!("Could not remove {}: {e}", archive.display()),
        }
    }

    async fn display_step(&self, extraction: ExtractionStatus) -> AttemptOutcome {
        let paths = self.config.image_paths();
        let surfaces = self.surfaces.clone();

        let loaded = self
            .ui
            .run_sync(move || {
                let mut loaded = [false; 2];
                for ((path, surface), flag) in paths.iter().zip(&surfaces).zip(&mut loaded) {
                    let image = load_image(path);
                    if image.is_none() {
                        tracing::warn!("{} is missing or unreadable", path.display());
                    }
                    *flag = image.is_some();
                    surface.set_image(image);
                }
                loaded
            })
            .await;

        match loaded {
            Ok([first_loaded, second_loaded]) => AttemptOutcome::Displayed {
                extraction,
                first_loaded,
                second_loaded,
            },
            Err(e) => {
                tracing::error!("{e}");
                AttemptOutcome::UiUnavailable
            }
        }
    }

    /// Runs only the display step against whatever is currently extracted.
    pub async fn refresh_display(&self) -> AttemptOutcome {
        let entries = walkdir::WalkDir::new(&self.config.extract_dir)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .count();
        self.display_step(ExtractionStatus::Extracted { entries }).await
    }
}
