mod app;
mod config;
mod dates;
mod db;
mod document;
mod error;
mod extractor;
mod fetcher;
mod listing;
mod logger;
mod models;
mod pipeline;
mod site;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser)]
#[command(name = "xornal")]
#[command(about = "Xornal Vigo article crawler")]
struct Cli {
    /// Read configuration from this file instead of the XDG config dir
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip website registration and database persistence
    #[arg(long)]
    no_db: bool,

    /// Print the website and article records as JSON to stdout
    #[arg(long)]
    print: bool,

    /// Show info-level logs on the console
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    app::run_crawler(app::RunOptions {
        config_path: cli.config,
        no_db: cli.no_db,
        print: cli.print,
        verbose: cli.verbose,
    })
    .await
}
