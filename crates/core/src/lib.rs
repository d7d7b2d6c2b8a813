//! Core library for foodfacts
//!
//! This crate implements the **Functional Core** of the foodfacts catalog
//! browser, following the Functional Core - Imperative Shell architectural
//! pattern.
//!
//! # Architecture Overview
//!
//! - **`foodfacts_core`** (this crate): Pure transformation functions with zero I/O
//! - **`foodfacts`**: HTTP fetching, terminal rendering and the event loop (the Imperative Shell)
//!
//! The shell never decides what to fetch or what to show. It feeds user input
//! and fetch outcomes into [`state::update`], executes the returned
//! [`state::Effect`]s and renders [`state::CatalogState::view`].
//!
//! # Module Organization
//!
//! - [`catalog`]: Product records, sort keys, search URL and response parsing
//! - [`config`]: Named settings with defaults and TOML parsing
//! - [`error`]: Fetch and configuration errors
//! - [`output`]: Serializable list output with navigation commands
//! - [`state`]: Browser state machine and reducer
//! - [`view`]: Filter and paginate view-model
//!
//! # Example Usage
//!
//! ```rust
//! use foodfacts_core::state::{update, CatalogState, Effect, Event, QueryState};
//!
//! let state = CatalogState::new(QueryState::default(), 10);
//! let (state, effect) = update(state, Event::Mount);
//!
//! let Some(Effect::Fetch(request)) = effect else {
//!     panic!("mount always fetches");
//! };
//! assert_eq!(request.page, 1);
//!
//! let (state, _) = update(
//!     state,
//!     Event::FetchSucceeded {
//!         generation: request.generation,
//!         products: Vec::new(),
//!     },
//! );
//! assert!(state.view().items.is_empty());
//! assert!(!state.controls().next_enabled);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod state;
pub mod view;
