//! Error types for the catalog core

/// Message shown to the user for every failed fetch
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch products";

/// A fetch that did not produce a product list
///
/// All variants display the same fixed message; the payload only feeds logs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Failed to fetch products")]
    Status(u16),

    #[error("Failed to fetch products")]
    Transport(String),

    #[error("Failed to fetch products")]
    Decode(String),
}

impl FetchError {
    /// Cause of the failure, for logging
    pub fn detail(&self) -> String {
        match self {
            FetchError::Status(code) => format!("HTTP {code}"),
            FetchError::Transport(msg) => format!("transport error: {msg}"),
            FetchError::Decode(msg) => format!("invalid response body: {msg}"),
        }
    }
}

/// Error type for configuration loading
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    Parse(String),

    #[error("Invalid endpoint: {0}. Expected an http:// or https:// URL")]
    InvalidEndpoint(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
