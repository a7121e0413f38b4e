use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    clear::ClearCommand, fetch::FetchCommand, info::InfoCommand, settings::SettingsCommand,
    show::ShowCommand,
};

#[derive(Parser)]
#[command(name = "dlunzip")]
#[command(about = "Download a zip archive, unpack it and show the two images inside")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(clap::Args, Clone)]
pub struct GlobalArgs {
    /// Use a different cache location for downloads and extracted files (useful for testing)
    #[arg(long, global = true)]
    pub cachedir: Option<PathBuf>,

    /// Show debug output, including download progress
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the archive, unpack it and show both images
    #[command(alias = "download")]
    Fetch(FetchCommand),

    /// Show the images from the last extraction without downloading
    Show(ShowCommand),

    /// Remove extracted files and leftover downloads
    #[command(alias = "clean")]
    Clear(ClearCommand),

    /// Show cache location and extracted files
    Info(InfoCommand),

    /// Manage the settings file
    #[command(subcommand)]
    Settings(SettingsCommand),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Fetch(cmd) => cmd.run(self.global_args).await,
            Commands::Show(cmd) => cmd.run(self.global_args).await,
            Commands::Clear(cmd) => cmd.run(self.global_args).await,
            Commands::Info(cmd) => cmd.run(self.global_args).await,
            Commands::Settings(cmd) => cmd.run(self.global_args).await,
        }
    }
}
