//! Paginated feed state shared by every feed screen.
//!
//! All triggers go through `&mut Pagination`, so only one writer ever
//! touches the state. Methods that need I/O hand back a [`PageRequest`]; the
//! caller runs it and reports the outcome through [`Pagination::complete`].
//!
//! Every request carries the generation it was issued under. Refreshing or
//! changing the filter bumps the generation, so a response that was already
//! in flight is recognised as stale and dropped.

use super::{FilterState, NewsItem};
use crate::api::ApiError;

/// Items requested per page. A shorter page means the feed is exhausted.
pub const PAGE_SIZE: usize = 20;

/// Fraction of a viewport from the end of the list at which the next page
/// is requested.
pub const END_REACHED_THRESHOLD: f64 = 0.5;

/// One page fetch to perform on behalf of a [`Pagination`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub page: u32,
    pub filter: FilterState,
    pub refresh: bool,
}

/// Coarse state of a feed screen, derived from the pagination flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    LoadingFirstPage,
    LoadingNextPage,
    Refreshing,
    Exhausted,
}

/// What [`Pagination::complete`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Page 1 replaced the items.
    Replaced { count: usize, exhausted: bool },
    /// A later page was appended.
    Appended {
        page: u32,
        count: usize,
        exhausted: bool,
    },
    /// The request failed; items and end-of-data are untouched.
    Failed { message: String },
    /// The response belonged to a superseded request and was ignored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Pagination {
    page: u32,
    items: Vec<NewsItem>,
    all_data_loaded: bool,
    refreshing: bool,
    /// Set until page 1 of the current filter has been loaded.
    reset_pending: bool,
    in_flight: Option<PageRequest>,
    generation: u64,
    filter: FilterState,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl Pagination {
    pub fn new(filter: FilterState) -> Self {
        Self {
            page: 1,
            items: Vec::new(),
            all_data_loaded: false,
            refreshing: false,
            reset_pending: true,
            in_flight: None,
            generation: 0,
            filter,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn all_data_loaded(&self) -> bool {
        self.all_data_loaded
    }

    pub fn refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> Option<&PageRequest> {
        self.in_flight.as_ref()
    }

    pub fn phase(&self) -> FeedPhase {
        match &self.in_flight {
            Some(_) if self.refreshing => FeedPhase::Refreshing,
            Some(request) if request.page == 1 => FeedPhase::LoadingFirstPage,
            Some(_) => FeedPhase::LoadingNextPage,
            None if self.all_data_loaded => FeedPhase::Exhausted,
            None => FeedPhase::Idle,
        }
    }

    /// Empty-state condition: nothing to show and nothing on the way.
    pub fn is_empty_idle(&self) -> bool {
        self.items.is_empty() && !self.is_fetching() && !self.refreshing
    }

    /// Start fetching `page`.
    ///
    /// Returns `None` without touching state when a fetch is already in
    /// flight, or when the feed is exhausted and this is not a refresh.
    pub fn load_page(&mut self, page: u32, is_refresh: bool) -> Option<PageRequest> {
        if (self.all_data_loaded && !is_refresh) || self.is_fetching() {
            tracing::trace!(
                page,
                is_refresh,
                fetching = self.is_fetching(),
                exhausted = self.all_data_loaded,
                "Skipping page load"
            );
            return None;
        }

        let request = PageRequest {
            generation: self.generation,
            page,
            filter: self.filter.clone(),
            refresh: is_refresh,
        };
        tracing::debug!(page, is_refresh, generation = self.generation, "Issuing page load");
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Initial load when a screen is first shown.
    pub fn mount(&mut self) -> Option<PageRequest> {
        self.load_page(1, false)
    }

    /// Request the page after the last one loaded.
    ///
    /// `page` only advances once that page arrives, so a failed load-more
    /// asks for the same page next time. If page 1 of the current filter
    /// never arrived, page 1 is requested instead.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if self.is_fetching() || self.all_data_loaded {
            return None;
        }
        if self.reset_pending {
            return self.load_page(1, false);
        }
        self.load_page(self.page.saturating_add(1), false)
    }

    /// Pull-to-refresh: back to page 1, clearing end-of-data.
    ///
    /// Any request already in flight is superseded.
    pub fn refresh(&mut self) -> Option<PageRequest> {
        self.supersede();
        self.refreshing = true;
        self.reset_to_first_page();
        self.load_page(1, true)
    }

    pub fn set_category(&mut self, category: Option<String>) -> Option<PageRequest> {
        self.filter.set_category(category);
        self.filter_changed()
    }

    pub fn set_tag(&mut self, tag: Option<String>) -> Option<PageRequest> {
        self.filter.set_tag(tag);
        self.filter_changed()
    }

    pub fn clear_filters(&mut self) -> Option<PageRequest> {
        self.filter.clear_all();
        self.filter_changed()
    }

    /// Apply the outcome of a request issued under `generation`.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<Vec<NewsItem>, ApiError>,
    ) -> Completion {
        let request = match self.in_flight.take() {
            Some(request) if request.generation == generation => request,
            other => {
                self.in_flight = other;
                tracing::debug!(
                    generation,
                    current = self.generation,
                    "Discarding stale page response"
                );
                return Completion::Stale;
            }
        };

        if request.refresh {
            self.refreshing = false;
        }

        match result {
            Ok(items) => {
                let count = items.len();
                if request.page == 1 {
                    self.items = items;
                    self.reset_pending = false;
                } else {
                    self.items.extend(items);
                }
                self.page = request.page;
                if count < PAGE_SIZE {
                    self.all_data_loaded = true;
                }
                tracing::debug!(
                    page = request.page,
                    count,
                    total = self.items.len(),
                    exhausted = self.all_data_loaded,
                    "Page loaded"
                );
                if request.page == 1 {
                    Completion::Replaced {
                        count,
                        exhausted: self.all_data_loaded,
                    }
                } else {
                    Completion::Appended {
                        page: request.page,
                        count,
                        exhausted: self.all_data_loaded,
                    }
                }
            }
            Err(e) => {
                tracing::warn!(page = request.page, error = %e, "Failed to load page");
                Completion::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Filter changed: reset to page 1 and fetch it.
    fn filter_changed(&mut self) -> Option<PageRequest> {
        tracing::info!(
            category = ?self.filter.category(),
            tag = ?self.filter.tag(),
            "Filter changed, reloading from page 1"
        );
        self.supersede();
        self.reset_to_first_page();
        self.load_page(1, true)
    }

    fn reset_to_first_page(&mut self) {
        self.all_data_loaded = false;
        self.page = 1;
        self.reset_pending = true;
    }

    /// Invalidate whatever is in flight.
    fn supersede(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(old) = self.in_flight.take() {
            tracing::debug!(
                page = old.page,
                old_generation = old.generation,
                "Superseding in-flight page load"
            );
        }
    }
}

/// True when the selection is close enough to the end of the list that the
/// next page should be requested.
///
/// `viewport` is the number of items visible at once (1 for full-screen
/// cards).
pub fn end_reached(selected: usize, len: usize, viewport: usize) -> bool {
    if len == 0 {
        return false;
    }
    let remaining = len.saturating_sub(selected.saturating_add(1));
    (remaining as f64) <= (viewport.max(1) as f64) * END_REACHED_THRESHOLD
}
