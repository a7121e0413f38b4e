use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::Result;
use clap::Subcommand;
use dlunzip_lib::config::{Config, Settings};

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Write a settings file with the default values
    Init {
        /// Overwrite an existing settings file
        #[arg(long, short)]
        force: bool,
    },
    /// Print the settings in effect
    Show,
}

impl SettingsCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::setup(global_args.cachedir.as_deref())?;

        match self {
            SettingsCommand::Init { force } => {
                if config.settings_file.exists() && !force {
                    ui::warning(&format!(
                        "{} already exists",
                        config.settings_file.display()
                    ));
                    ui::tip("Use `--force` to overwrite it.");
                    return Ok(());
                }
                Settings::default().save(&config.settings_file)?;
                ui::success(&format!("Wrote {}", config.settings_file.display()));
            }
            SettingsCommand::Show => {
                ui::info(&format!("# {}", config.settings_file.display()));
                ui::info(config.settings.to_toml()?.trim_end());
            }
        }

        Ok(())
    }
}
