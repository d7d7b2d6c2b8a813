use colored::Colorize;
use foodfacts_core::output::{build_list_output, ListOutput};
use foodfacts_core::state::{CatalogState, Phase};

const RULE_WIDTH: usize = 80;
const INGREDIENTS_MAX_CHARS: usize = 300;

/// How the navigation section tells the user to move between pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Print the `foodfacts list` commands for the neighbouring pages
    Commands,
    /// Print the interactive browse commands
    Keys,
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

pub fn format_loading() -> String {
    format!("\n{}\n", "Loading products...".bright_cyan())
}

pub fn format_error(message: &str, navigation: Navigation) -> String {
    let mut result = format!("\n{}\n", message.red().bold());
    if navigation == Navigation::Keys {
        result.push_str(&format!(
            "\n{} {} {}\n",
            "Type".bright_white(),
            "refresh".cyan(),
            "to try again.".bright_white()
        ));
    }
    result
}

/// Render the whole screen for the current state
pub fn format_state(state: &CatalogState, navigation: Navigation) -> String {
    match &state.phase {
        Phase::Idle => String::new(),
        Phase::Loading => format_loading(),
        Phase::Error(message) => format_error(message, navigation),
        Phase::Ready => format_list_text(&build_list_output(state), navigation),
    }
}

/// Convert list output to formatted text with colors
pub fn format_list_text(output: &ListOutput, navigation: Navigation) -> String {
    let mut result = String::new();
    let pagination = &output.pagination;

    // Header
    result.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("PRODUCT LIST (Page {})", pagination.current_page)
            .bright_cyan()
            .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH).bright_cyan()));

    let filter = if output.query.filter.is_empty() {
        "(none)".to_string()
    } else {
        format!("\"{}\"", output.query.filter)
    };
    result.push_str(&format!(
        "{}: {} | {}: {}\n",
        "Filter".green(),
        filter.bright_white(),
        "Sort Order".green(),
        output.query.sort.label().bright_white()
    ));

    if output.items.is_empty() {
        result.push_str(&format!("\n{}\n", "No products on this page.".yellow()));
    } else {
        let first = (pagination.current_page - 1) * pagination.page_size;
        for (idx, item) in output.items.iter().enumerate() {
            result.push_str(&format!(
                "\n{} {}\n",
                format!("[{}]", first + idx + 1).yellow().bold(),
                item.name
                    .as_deref()
                    .unwrap_or("(No name)")
                    .white()
                    .bold()
            ));

            if let Some(ingredients) = &item.ingredients {
                result.push_str(&format!(
                    "    {}: {}\n",
                    "Ingredients".green(),
                    truncate_text(ingredients, INGREDIENTS_MAX_CHARS)
                ));
            }

            if let Some(image_url) = &item.image_url {
                result.push_str(&format!(
                    "    {}: {}\n",
                    "Image".green(),
                    image_url.cyan().underline()
                ));
            }

            if let Some(id) = &item.id {
                result.push_str(&format!("    {}: {}\n", "ID".green(), id.bright_black()));
            }
        }
    }

    // Navigation section
    result.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH).bright_yellow()));
    result.push_str(&format!("{}\n", "NAVIGATION".bright_yellow().bold()));
    result.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH).bright_yellow()));

    result.push_str(&format!(
        "\n{} {} {} ({} {} {} {})\n",
        "Showing".bright_white(),
        output.items.len().to_string().bright_cyan().bold(),
        "products".bright_white(),
        pagination.filtered_total.to_string().bright_cyan().bold(),
        "match of".bright_white(),
        pagination.fetched_total.to_string().bright_cyan().bold(),
        "fetched".bright_white()
    ));

    match navigation {
        Navigation::Commands => {
            if let Some(command) = &pagination.prev_page_command {
                result.push_str(&format!(
                    "  {}: {}\n",
                    "Previous page".green(),
                    command.cyan()
                ));
            }
            if let Some(command) = &pagination.next_page_command {
                result.push_str(&format!("  {}: {}\n", "Next page".green(), command.cyan()));
            }
        }
        Navigation::Keys => {
            result.push_str(&format!(
                "  {} | {}\n",
                control_label("prev", "Previous Page", pagination.has_previous),
                control_label("next", "Next Page", pagination.has_next)
            ));
        }
    }

    if !pagination.has_next {
        result.push_str(&format!(
            "\n{}\n",
            "No more products available.".bright_black()
        ));
    }

    result.push('\n');
    result
}

fn control_label(key: &str, label: &str, enabled: bool) -> String {
    if enabled {
        format!("{} {}", format!("[{key}]").cyan().bold(), label.bright_white())
    } else {
        format!("{} {}", format!("[{key}]").bright_black(), label.bright_black())
    }
}
