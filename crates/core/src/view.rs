//! Filter and paginate view-model
//!
//! Derives the displayed page from the last fetched product list. Everything
//! here is a pure function of (products, filter term, page, page size).

use serde::Serialize;

use crate::catalog::Product;

/// Derived page ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub items: Vec<Product>,
    pub page: usize,
    pub page_size: usize,
    /// Products left after filtering, across all local pages
    pub filtered_total: usize,
    /// Products in the last fetch, before filtering
    pub fetched_total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Whether a product's name or ingredients contain `term`, ignoring case
///
/// Missing and empty fields never match.
pub fn matches_filter(product: &Product, term: &str) -> bool {
    let needle = term.to_lowercase();
    [&product.product_name, &product.ingredients_text]
        .into_iter()
        .flatten()
        .filter(|field| !field.is_empty())
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| matches_filter(product, term))
        .collect()
}

/// Slice bounds for a 1-indexed page
///
/// Unlike strict pagination, an out-of-range page is not an error: the
/// bounds collapse to an empty range at the end of the list.
pub fn page_bounds(total_items: usize, page: usize, page_size: usize) -> (usize, usize) {
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    (start, end)
}

pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let (start, end) = page_bounds(items.len(), page, page_size);
    items[start..end].to_vec()
}

/// Whether the filtered list extends past the current page
pub fn has_next_page(filtered_total: usize, page: usize, page_size: usize) -> bool {
    filtered_total > page.saturating_mul(page_size)
}

pub fn derive_view(products: &[Product], filter: &str, page: usize, page_size: usize) -> ViewModel {
    let filtered = filter_products(products, filter);
    let items = paginate(&filtered, page, page_size)
        .into_iter()
        .cloned()
        .collect();

    ViewModel {
        items,
        page,
        page_size,
        filtered_total: filtered.len(),
        fetched_total: products.len(),
        has_previous: page > 1,
        has_next: has_next_page(filtered.len(), page, page_size),
    }
}
