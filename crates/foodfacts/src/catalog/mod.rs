use crate::prelude::*;
use foodfacts_core::catalog::{parse_search_response, search_url, Product};
use foodfacts_core::config::CatalogConfig;
use foodfacts_core::error::FetchError;
use foodfacts_core::state::{Effect, Event, FetchRequest};
use std::time::Duration;

pub mod browse;
pub mod list;
pub mod render;
pub mod sorts;

const USER_AGENT: &str = concat!("foodfacts/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Fetch one page of products and print it
    #[clap(name = "list")]
    List(list::ListOptions),

    /// Browse the catalog interactively
    #[clap(name = "browse")]
    Browse(browse::BrowseOptions),

    /// Show the available sort options
    #[clap(name = "sorts")]
    Sorts,
}

pub async fn run(command: Commands, global: crate::Global) -> Result<()> {
    match command {
        Commands::List(options) => list::run(options, global).await,
        Commands::Browse(options) => browse::run(options, global).await,
        Commands::Sorts => sorts::run(),
    }
}

/// Print the effective configuration when running verbose
///
/// Goes to stderr; stdout only carries command output such as `--json`.
pub fn print_config(config: &CatalogConfig, global: &crate::Global) {
    if global.verbose {
        let mut stderr = anstream::stderr();
        if let Err(e) = write_config(&mut stderr, config) {
            log::warn!("Failed to print configuration: {e}");
        }
    }
}

fn write_config(out: &mut impl std::io::Write, config: &CatalogConfig) -> std::io::Result<()> {
    writeln!(out, "Search endpoint: {}", config.endpoint)?;
    writeln!(out, "Page size: {}", config.page_size)?;
    writeln!(out, "Timeout: {}s", config.timeout_secs)?;
    writeln!(out)
}

/// HTTP side of the catalog: turns fetch effects into fetch outcome events
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub async fn fetch_products(
        &self,
        request: &FetchRequest,
    ) -> std::result::Result<Vec<Product>, FetchError> {
        let url = search_url(&self.endpoint, request.page, request.sort);
        log::debug!("GET {url} (generation {})", request.generation);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        log::debug!("{url} responded with HTTP {status}");

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        parse_search_response(&body)
    }

    /// Run an effect and report its outcome as an event
    pub async fn execute(&self, effect: Effect) -> Event {
        match effect {
            Effect::Fetch(request) => match self.fetch_products(&request).await {
                Ok(products) => {
                    log::debug!(
                        "Fetched {} products for page {}",
                        products.len(),
                        request.page
                    );
                    Event::FetchSucceeded {
                        generation: request.generation,
                        products,
                    }
                }
                Err(error) => {
                    log::warn!(
                        "{error} (page {}, sort {}): {}",
                        request.page,
                        request.sort,
                        error.detail()
                    );
                    Event::FetchFailed {
                        generation: request.generation,
                        error,
                    }
                }
            },
        }
    }
}
