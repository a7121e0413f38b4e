use crate::cli::GlobalArgs;
use crate::surface::{self, TerminalSurface};
use crate::ui;
use anyhow::{Result, bail};
use clap::Args;
use dlunzip_lib::config::Config;
use dlunzip_lib::controller::{AttemptOutcome, Controller};
use dlunzip_lib::extract::ZipExtractor;
use dlunzip_lib::http::HttpDownloadClient;
use dlunzip_lib::ui_thread::UiThread;

#[derive(Args)]
pub struct ShowCommand {}

impl ShowCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::setup(global_args.cachedir.as_deref())?;

        if !config.extract_dir.exists() {
            ui::warning("Nothing has been extracted yet");
            ui::tip("Run `dlunzip fetch` to download the archive.");
            return Ok(());
        }

        let (ui_thread, _ui_handle) = UiThread::spawn()?;
        let surfaces = TerminalSurface::pair(&config);
        let controller = Controller::new(
            config,
            HttpDownloadClient::new(),
            ZipExtractor,
            ui_thread,
            surface::as_surfaces(&surfaces),
        );

        let outcome = controller.refresh_display().await;
        if outcome == AttemptOutcome::UiUnavailable {
            bail!("The display was shut down before the images could be shown");
        }
        surface::report(&outcome, &surfaces);

        Ok(())
    }
}
