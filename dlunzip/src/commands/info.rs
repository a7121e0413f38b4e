use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::Result;
use clap::Args;
use dlunzip_lib::cache::CacheInfo;
use dlunzip_lib::config::Config;
use indicatif::HumanBytes;

#[derive(Args)]
pub struct InfoCommand {
    /// Print the information as JSON
    #[arg(long)]
    pub json: bool,
}

impl InfoCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::setup(global_args.cachedir.as_deref())?;
        let info = CacheInfo::collect(&config)?;

        if self.json {
            tracing::info!("{}", serde_json::to_string_pretty(&info)?);
            return Ok(());
        }

        ui::info(&format!("Cache location: {}", info.cache_dir.display()));
        ui::info(&format!("Archive URL: {}", config.settings.url));
        ui::info(&format!(
            "Images: {}/{} and {}/{}",
            config.settings.image_dir,
            config.settings.first_image,
            config.settings.image_dir,
            config.settings.second_image
        ));

        match info.extracted_at {
            Some(extracted_at) => {
                ui::info(&format!(
                    "Last extracted: {}",
                    extracted_at.format("%Y-%m-%d %H:%M:%S")
                ));
                ui::info(&format!(
                    "Extracted files: {} ({})",
                    info.files.len(),
                    HumanBytes(info.total_bytes)
                ));
                for file in &info.files {
                    ui::info(&format!("  {}", file.display()));
                }
            }
            None => ui::info("Nothing has been extracted yet"),
        }

        if info.leftover_download {
            ui::warning("An unfinished download is present");
            ui::tip("Run `dlunzip clear` to remove it.");
        }

        Ok(())
    }
}
