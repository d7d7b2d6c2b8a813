//! Open Food Facts search data model
//!
//! Pure types and functions for talking to the product-search endpoint:
//! product records, the enumerated sort keys, request URL construction and
//! response envelope parsing. No HTTP happens here; the shell owns the client.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FetchError;

/// Product record as returned by the search API
///
/// Every field is optional upstream. Unknown fields are ignored.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Product {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing)]
    pub code: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub ingredients_text: Option<String>,
    #[serde(default)]
    pub image_front_url: Option<String>,
}

impl Product {
    /// Identifier used to key rendered rows, falling back to the barcode
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.code.as_deref())
    }
}

/// Search response envelope
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
}

/// Upstream sort keys accepted by `sort_by`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    None,
    #[serde(rename = "unique_scans_n")]
    UniqueScans,
    #[serde(rename = "popularity_key")]
    Popularity,
    #[serde(rename = "nutriscore_score")]
    Nutriscore,
    #[serde(rename = "ecoscore_score")]
    Ecoscore,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        SortOption::None,
        SortOption::UniqueScans,
        SortOption::Popularity,
        SortOption::Nutriscore,
        SortOption::Ecoscore,
    ];

    /// Value sent as `sort_by`, or `None` when no sort is requested
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            SortOption::None => None,
            SortOption::UniqueScans => Some("unique_scans_n"),
            SortOption::Popularity => Some("popularity_key"),
            SortOption::Nutriscore => Some("nutriscore_score"),
            SortOption::Ecoscore => Some("ecoscore_score"),
        }
    }

    /// Key accepted on the command line
    pub fn key(self) -> &'static str {
        self.query_value().unwrap_or("none")
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOption::None => "Nothing",
            SortOption::UniqueScans => "Unique Scans",
            SortOption::Popularity => "Popularity",
            SortOption::Nutriscore => "Nutriscore Score",
            SortOption::Ecoscore => "Ecoscore Score",
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(SortOption::None);
        }

        SortOption::ALL
            .into_iter()
            .find(|option| option.query_value() == Some(trimmed))
            .ok_or_else(|| {
                let valid: Vec<&str> = SortOption::ALL.iter().map(|o| o.key()).collect();
                format!(
                    "Invalid sort option: {}. Valid options: {}",
                    trimmed,
                    valid.join(", ")
                )
            })
    }
}

/// Build the search URL for a page and sort key
///
/// `search_terms` is always sent empty: filtering happens locally and is
/// never forwarded upstream.
pub fn search_url(endpoint: &str, page: usize, sort: SortOption) -> String {
    let mut url = format!("{endpoint}?search_terms=&page={page}&json=true");
    if let Some(sort_by) = sort.query_value() {
        url.push_str(&format!("&sort_by={sort_by}"));
    }
    url
}

/// Parse a search response body into the product list
pub fn parse_search_response(body: &str) -> Result<Vec<Product>, FetchError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(response.products)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://world.openfoodfacts.org/cgi/search.pl";

    #[test]
    fn test_search_url_without_sort() {
        assert_eq!(
            search_url(ENDPOINT, 1, SortOption::None),
            "https://world.openfoodfacts.org/cgi/search.pl?search_terms=&page=1&json=true"
        );
    }

    #[test]
    fn test_search_url_with_sort() {
        assert_eq!(
            search_url(ENDPOINT, 3, SortOption::Popularity),
            "https://world.openfoodfacts.org/cgi/search.pl?search_terms=&page=3&json=true&sort_by=popularity_key"
        );
    }

    #[test]
    fn test_sort_option_from_str() {
        assert_eq!("".parse::<SortOption>().unwrap(), SortOption::None);
        assert_eq!("none".parse::<SortOption>().unwrap(), SortOption::None);
        assert_eq!(
            "unique_scans_n".parse::<SortOption>().unwrap(),
            SortOption::UniqueScans
        );
        assert_eq!(
            "ecoscore_score".parse::<SortOption>().unwrap(),
            SortOption::Ecoscore
        );
    }

    #[test]
    fn test_sort_option_from_str_invalid() {
        let err = "price".parse::<SortOption>().unwrap_err();
        assert!(err.contains("Invalid sort option: price"));
        assert!(err.contains("nutriscore_score"));
    }

    #[test]
    fn test_sort_option_labels() {
        let labels: Vec<&str> = SortOption::ALL.iter().map(|o| o.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Nothing",
                "Unique Scans",
                "Popularity",
                "Nutriscore Score",
                "Ecoscore Score"
            ]
        );
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "count": 2,
            "page": 1,
            "products": [
                {
                    "id": "3017620422003",
                    "product_name": "Nutella",
                    "ingredients_text": "Sugar, palm oil, hazelnuts",
                    "image_front_url": "https://images.openfoodfacts.org/nutella.jpg",
                    "nutriscore_grade": "e"
                },
                { "code": 737628064502, "product_name": null }
            ]
        }"#;

        let products = parse_search_response(body).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].key(), Some("3017620422003"));
        assert_eq!(products[0].product_name.as_deref(), Some("Nutella"));
        assert_eq!(products[1].key(), Some("737628064502"));
        assert_eq!(products[1].product_name, None);
        assert_eq!(products[1].ingredients_text, None);
    }

    #[test]
    fn test_parse_search_response_missing_products() {
        let result = parse_search_response(r#"{"count": 0}"#);
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_parse_search_response_not_json() {
        let result = parse_search_response("<html>Service Unavailable</html>");
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_parse_search_response_empty() {
        let products = parse_search_response(r#"{"products": []}"#).unwrap();
        assert!(products.is_empty());
    }
}
