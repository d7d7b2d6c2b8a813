use crate::prelude::{eprint, print, println, *};
use foodfacts_core::catalog::SortOption;
use foodfacts_core::output::{build_list_output, ListOutput};
use foodfacts_core::state::{update, CatalogState, Event, Phase, QueryState};
use indicatif::{ProgressBar, ProgressStyle};

use super::render::{format_error, format_list_text, Navigation};
use super::{print_config, CatalogClient};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1", value_parser = parse_page)]
    pub page: usize,

    /// Sort order: none, unique_scans_n, popularity_key, nutriscore_score, ecoscore_score
    #[arg(short, long, env = "FOODFACTS_SORT", default_value = "none")]
    pub sort: SortOption,

    /// Only show products whose name or ingredients contain this text
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListOptions {
    pub fn query(&self) -> QueryState {
        QueryState {
            page: self.page,
            sort: self.sort,
            filter: self.filter.clone(),
        }
    }
}

/// Pages are 1-indexed
pub fn parse_page(value: &str) -> std::result::Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(format!("Invalid page: {value}. Pages start at 1")),
    }
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = crate::config::load(&global)?;
    print_config(&config, &global);

    let client = CatalogClient::new(&config)?;

    // Create spinner for progress indication
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| eyre!("Invalid spinner template: {}", e))?,
    );
    spinner.set_message("Fetching products...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = list_data(&client, options.query(), config.page_size).await;

    // Clear the spinner before printing output
    spinner.finish_and_clear();

    let output = match result {
        Ok(output) => output,
        Err(message) => {
            eprint!("{}", format_error(&message, Navigation::Commands));
            std::process::exit(1);
        }
    };

    if options.json {
        output_json(&output)?;
    } else {
        output_formatted(&output);
    }

    Ok(())
}

/// Fetches one page of products and returns it as a structured ListOutput
///
/// Drives the catalog reducer from mount until the fetch settles. A failed
/// fetch yields the message of the error screen.
pub async fn list_data(
    client: &CatalogClient,
    query: QueryState,
    page_size: usize,
) -> std::result::Result<ListOutput, String> {
    let mut state = CatalogState::new(query, page_size);
    let mut pending = Some(Event::Mount);

    while let Some(event) = pending.take() {
        let (next, effect) = update(state, event);
        state = next;
        if let Some(effect) = effect {
            pending = Some(client.execute(effect).await);
        }
    }

    match &state.phase {
        Phase::Error(message) => Err(message.clone()),
        _ => Ok(build_list_output(&state)),
    }
}

/// Convert list output to JSON string
fn format_list_json(output: &ListOutput) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn output_json(output: &ListOutput) -> Result<()> {
    let json = format_list_json(output)?;
    println!("{}", json);
    Ok(())
}

fn output_formatted(output: &ListOutput) {
    print!("{}", format_list_text(output, Navigation::Commands));
}
