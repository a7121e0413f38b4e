use crate::cli::GlobalArgs;
use crate::surface::{self, TerminalSurface};
use crate::ui;
use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use dlunzip_lib::config::Config;
use dlunzip_lib::controller::{AttemptOutcome, Controller, Trigger};
use dlunzip_lib::extract::ZipExtractor;
use dlunzip_lib::http::HttpDownloadClient;
use dlunzip_lib::ui_thread::UiThread;

#[derive(Args)]
pub struct FetchCommand {
    /// Download this archive instead of the configured one
    #[arg(long)]
    pub url: Option<String>,

    /// Download at normal priority instead of yielding to other work
    #[arg(long)]
    pub foreground: bool,
}

impl FetchCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let mut config = Config::setup(global_args.cachedir.as_deref())?;
        if let Some(url) = self.url {
            config.settings.url = url;
        }
        if self.foreground {
            config.settings.discretionary = false;
        }

        ui::info(&format!("Fetching {}", config.settings.url));

        let (ui_thread, ui_handle) = UiThread::spawn()?;
        let surfaces = TerminalSurface::pair(&config);
        let controller = Controller::new(
            config,
            HttpDownloadClient::new(),
            ZipExtractor,
            ui_thread,
            surface::as_surfaces(&surfaces),
        );

        let outcome = match controller.trigger() {
            Trigger::Started(handle) => handle.await.context("Download attempt panicked")?,
            Trigger::AlreadyInFlight => {
                ui::warning("A download is already in progress");
                return Ok(());
            }
        };

        drop(controller);
        tokio::task::spawn_blocking(move || ui_handle.join())
            .await?
            .map_err(|_| anyhow!("UI thread panicked"))?;

        match &outcome {
            AttemptOutcome::DownloadFailed(reason) => bail!("Download failed: {reason}"),
            AttemptOutcome::PrepareFailed(reason) => bail!("{reason}"),
            AttemptOutcome::UiUnavailable => {
                bail!("The display was shut down before the images could be shown")
            }
            AttemptOutcome::Displayed { .. } => surface::report(&outcome, &surfaces),
        }

        ui::tip("Run `dlunzip show` to display the images again without downloading.");
        Ok(())
    }
}
