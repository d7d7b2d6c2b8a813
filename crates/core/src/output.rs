//! Structured list output
//!
//! Serializable page of products with pagination metadata and the commands
//! that navigate to the neighbouring pages.

use serde::Serialize;

use crate::catalog::{Product, SortOption};
use crate::state::{CatalogState, QueryState};

/// Individual product in list output
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ProductItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.key().map(str::to_string),
            name: product.product_name.clone(),
            ingredients: product.ingredients_text.clone(),
            image_url: product.image_front_url.clone(),
        }
    }
}

/// Pagination metadata for list output
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ListPaginationInfo {
    pub current_page: usize,
    pub page_size: usize,
    pub filtered_total: usize,
    pub fetched_total: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub next_page_command: Option<String>,
    pub prev_page_command: Option<String>,
}

/// Complete list output with items and pagination
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ListOutput {
    pub query: QueryState,
    pub items: Vec<ProductItem>,
    pub pagination: ListPaginationInfo,
}

/// Command line that lists `page` with the same sort and filter
pub fn list_command(query: &QueryState, page: usize) -> String {
    let mut command = format!("foodfacts list --page {page}");
    if query.sort != SortOption::None {
        command.push_str(&format!(" --sort {}", query.sort.key()));
    }
    if !query.filter.is_empty() {
        let quoted = shlex::try_quote(&query.filter)
            .map(|q| q.into_owned())
            .unwrap_or_else(|_| format!("{:?}", query.filter));
        command.push_str(&format!(" --filter {quoted}"));
    }
    command
}

/// Build the list output for the current state
///
/// Navigation commands follow the enabled state of the pagination controls.
pub fn build_list_output(state: &CatalogState) -> ListOutput {
    let view = state.view();
    let controls = state.controls();
    let page = state.query.page;

    let next_page_command = controls
        .next_enabled
        .then(|| list_command(&state.query, page + 1));
    let prev_page_command = controls
        .previous_enabled
        .then(|| list_command(&state.query, page - 1));

    ListOutput {
        query: state.query.clone(),
        items: view.items.iter().map(ProductItem::from).collect(),
        pagination: ListPaginationInfo {
            current_page: page,
            page_size: view.page_size,
            filtered_total: view.filtered_total,
            fetched_total: view.fetched_total,
            has_previous: controls.previous_enabled,
            has_next: controls.next_enabled,
            next_page_command,
            prev_page_command,
        },
    }
}
