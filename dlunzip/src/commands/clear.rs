use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::Result;
use clap::Args;
use dlunzip_lib::cache;
use dlunzip_lib::config::Config;

#[derive(Args)]
pub struct ClearCommand {}

impl ClearCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::setup(global_args.cachedir.as_deref())?;

        if cache::clear(&config)? {
            ui::success("Extracted files removed");
        } else {
            ui::success("Nothing to clear");
        }

        Ok(())
    }
}
