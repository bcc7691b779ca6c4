//! Feed model: news items, filter selection and the pagination controller.
//!
//! - [`item`] - `NewsItem` as delivered by the API, plus display helpers
//! - [`filter`] - optional category/tag selection
//! - [`pagination`] - page sequencing, end-of-data and stale-response handling
//!
//! Nothing here performs I/O. `Pagination` returns [`PageRequest`] values and
//! the UI layer runs them against [`crate::api::NewsClient`].

mod filter;
mod item;
mod pagination;

pub use filter::FilterState;
pub use item::NewsItem;
pub use pagination::{
    end_reached, Completion, FeedPhase, PageRequest, Pagination, END_REACHED_THRESHOLD, PAGE_SIZE,
};
