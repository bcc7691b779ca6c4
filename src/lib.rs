//! Terminal news reader with a full-screen story feed and a filterable list
//! feed, both paging through a remote news API.

pub mod api;
pub mod app;
pub mod config;
pub mod feed;
pub mod theme;
pub mod ui;
pub mod util;
