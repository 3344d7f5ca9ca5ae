use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod events;
mod filter;
mod logging;
mod models;
mod page;
mod storage;
mod utils;
mod viewer;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The viewer owns the terminal and logs to a file instead.
    if !matches!(cli.command, Commands::View(_)) {
        logging::init_stderr();
    }

    match cli.command {
        Commands::View(args) => commands::view::execute(args).await,
        Commands::Status(args) => commands::status::execute(args).await,
        Commands::Set(args) => commands::set::execute(args).await,
        Commands::ShowAll(args) => commands::set::show_all(args).await,
        Commands::HideAll(args) => commands::set::hide_all(args).await,
        Commands::Reset(args) => commands::reset::execute(args).await,
    }
}
