use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod catalog;
mod config;
mod error;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse the Open Food Facts product catalog from the terminal"
)]
pub struct App {
    #[command(subcommand)]
    pub command: crate::catalog::Commands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Product search endpoint
    #[clap(long, env = "FOODFACTS_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Products per displayed page
    #[clap(long, env = "FOODFACTS_PAGE_SIZE", global = true)]
    page_size: Option<usize>,

    /// Request timeout in seconds
    #[clap(long, env = "FOODFACTS_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Configuration file (defaults to <config dir>/foodfacts/config.toml)
    #[clap(long, env = "FOODFACTS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "FOODFACTS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    crate::catalog::run(app.command, app.global).await
}
