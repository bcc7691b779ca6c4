//! Remote news API access.
//!
//! - [`NewsClient`] - paginated feed and filter vocabulary requests
//! - [`ApiError`] - every way a request can fail; callers treat all of them
//!   as "no state change"

mod client;

pub use client::{ApiError, NewsClient, Vocabulary, DEFAULT_TIMEOUT};
