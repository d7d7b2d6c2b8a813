//! Catalog browser state and reducer
//!
//! The browser is modelled as an explicit state value and a pure
//! `update(state, event) -> (state, effect)` function. The shell executes the
//! returned [`Effect`]s and feeds the outcome back in as events.
//!
//! Every fetch is tagged with a generation number. Only the result of the most
//! recently issued fetch is applied; anything older is dropped unchanged.

use serde::Serialize;

use crate::catalog::{Product, SortOption};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::FetchError;
use crate::view::{derive_view, ViewModel};

/// User-controlled query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub page: usize,
    pub sort: SortOption,
    pub filter: String,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: 1,
            sort: SortOption::None,
            filter: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// A fetch the shell should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub page: usize,
    pub sort: SortOption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Mount,
    NextPage,
    PreviousPage,
    SortChanged(SortOption),
    FilterChanged(String),
    Refresh,
    FetchSucceeded {
        generation: u64,
        products: Vec<Product>,
    },
    FetchFailed {
        generation: u64,
        error: FetchError,
    },
}

impl Event {
    /// Generation carried by a fetch outcome
    pub fn fetch_generation(&self) -> Option<u64> {
        match self {
            Event::FetchSucceeded { generation, .. } | Event::FetchFailed { generation, .. } => {
                Some(*generation)
            }
            _ => None,
        }
    }
}

/// Enabled state of the pagination buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    pub query: QueryState,
    pub products: Vec<Product>,
    pub phase: Phase,
    pub page_size: usize,
    generation: u64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(QueryState::default(), DEFAULT_PAGE_SIZE)
    }
}

impl CatalogState {
    pub fn new(query: QueryState, page_size: usize) -> Self {
        Self {
            query,
            products: Vec::new(),
            phase: Phase::Idle,
            page_size,
            generation: 0,
        }
    }

    /// Generation of the latest issued fetch (0 before the first)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> ViewModel {
        derive_view(
            &self.products,
            &self.query.filter,
            self.query.page,
            self.page_size,
        )
    }

    pub fn controls(&self) -> Controls {
        Controls {
            previous_enabled: self.query.page > 1,
            next_enabled: self.phase == Phase::Ready && self.view().has_next,
        }
    }

    /// Whether a fetch outcome belongs to a superseded request
    pub fn is_stale(&self, event: &Event) -> bool {
        event
            .fetch_generation()
            .is_some_and(|generation| generation != self.generation)
    }

    fn start_fetch(mut self) -> (Self, Option<Effect>) {
        self.generation += 1;
        self.phase = Phase::Loading;
        let request = FetchRequest {
            generation: self.generation,
            page: self.query.page,
            sort: self.query.sort,
        };
        (self, Some(Effect::Fetch(request)))
    }
}

/// Apply one event to the state
pub fn update(state: CatalogState, event: Event) -> (CatalogState, Option<Effect>) {
    if state.is_stale(&event) {
        return (state, None);
    }

    match event {
        Event::Mount => {
            if state.phase == Phase::Idle {
                state.start_fetch()
            } else {
                (state, None)
            }
        }
        Event::NextPage => {
            if !state.controls().next_enabled {
                return (state, None);
            }
            let mut state = state;
            state.query.page += 1;
            state.start_fetch()
        }
        Event::PreviousPage => {
            if !state.controls().previous_enabled {
                return (state, None);
            }
            let mut state = state;
            state.query.page -= 1;
            state.start_fetch()
        }
        Event::SortChanged(sort) => {
            if sort == state.query.sort {
                return (state, None);
            }
            let mut state = state;
            state.query.sort = sort;
            state.start_fetch()
        }
        Event::FilterChanged(filter) => {
            let mut state = state;
            state.query.filter = filter;
            (state, None)
        }
        Event::Refresh => {
            if state.phase == Phase::Idle {
                return (state, None);
            }
            state.start_fetch()
        }
        Event::FetchSucceeded { products, .. } => {
            let mut state = state;
            state.products = products;
            state.phase = Phase::Ready;
            (state, None)
        }
        Event::FetchFailed { error, .. } => {
            let mut state = state;
            state.phase = Phase::Error(error.to_string());
            (state, None)
        }
    }
}
