mod cli;
mod commands;
mod surface;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use dlunzip_lib::logging::initialize_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.global_args.verbose);
    cli.run().await
}
