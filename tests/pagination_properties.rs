//! Property tests for the pagination reducer.
//!
//! Random sequences of triggers and responses are applied to a `Pagination`
//! and the observable state is checked against a simple model after each step.

use newsdeck::api::ApiError;
use newsdeck::feed::{Completion, NewsItem, Pagination, PAGE_SIZE};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Mount,
    LoadMore,
    Refresh,
    SetCategory(Option<u8>),
    /// Answer the request in flight with this many items.
    Respond(usize),
    Fail,
    /// Deliver a response under an old generation.
    Late(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => Just(Step::Mount),
        3 => Just(Step::LoadMore),
        1 => Just(Step::Refresh),
        1 => proptest::option::of(0u8..3).prop_map(Step::SetCategory),
        4 => (0usize..=PAGE_SIZE).prop_map(Step::Respond),
        1 => Just(Step::Fail),
        1 => (0usize..=PAGE_SIZE).prop_map(Step::Late),
    ]
}

fn items(n: usize) -> Vec<NewsItem> {
    (0..n)
        .map(|i| NewsItem {
            title: format!("item {}", i),
            ..Default::default()
        })
        .collect()
}

proptest! {
    #[test]
    fn state_follows_responses(steps in proptest::collection::vec(step(), 1..60)) {
        let mut p = Pagination::default();

        for step in steps {
            let before_items = p.items().len();
            let before_page = p.page();
            let before_exhausted = p.all_data_loaded();

            match step {
                Step::Mount => {
                    let was_fetching = p.is_fetching();
                    let issued = p.mount().is_some();
                    prop_assert_eq!(issued, !was_fetching && !before_exhausted);
                }
                Step::LoadMore => {
                    let was_fetching = p.is_fetching();
                    let issued = p.load_more().is_some();
                    if was_fetching || before_exhausted {
                        prop_assert!(!issued);
                    }
                }
                Step::Refresh => {
                    let request = p.refresh();
                    prop_assert!(request.is_some());
                    prop_assert_eq!(p.page(), 1);
                    prop_assert!(!p.all_data_loaded());
                    prop_assert!(p.refreshing());
                }
                Step::SetCategory(c) => {
                    let request = p.set_category(c.map(|c| format!("cat{}", c)));
                    prop_assert_eq!(request.map(|r| r.page), Some(1));
                    prop_assert_eq!(p.page(), 1);
                }
                Step::Respond(n) => {
                    let Some(request) = p.in_flight().cloned() else { continue };
                    let completion = p.complete(request.generation, Ok(items(n)));
                    prop_assert!(!p.is_fetching());
                    prop_assert_eq!(p.page(), request.page);
                    prop_assert_eq!(p.all_data_loaded(), n < PAGE_SIZE || before_exhausted);
                    if request.page == 1 {
                        prop_assert_eq!(p.items().len(), n);
                        let is_replaced = matches!(completion, Completion::Replaced { .. });
                        prop_assert!(is_replaced);
                    } else {
                        prop_assert_eq!(p.items().len(), before_items + n);
                        let is_appended = matches!(completion, Completion::Appended { .. });
                        prop_assert!(is_appended);
                    }
                }
                Step::Fail => {
                    let Some(request) = p.in_flight().cloned() else { continue };
                    let completion = p.complete(request.generation, Err(ApiError::HttpStatus(500)));
                    let is_failed = matches!(completion, Completion::Failed { .. });
                    prop_assert!(is_failed);
                    prop_assert!(!p.is_fetching());
                    prop_assert!(!p.refreshing());
                    prop_assert_eq!(p.items().len(), before_items);
                    prop_assert_eq!(p.page(), before_page);
                    prop_assert_eq!(p.all_data_loaded(), before_exhausted);
                }
                Step::Late(n) => {
                    let Some(stale) = p.generation().checked_sub(1) else { continue };
                    let was_fetching = p.is_fetching();
                    prop_assert_eq!(p.complete(stale, Ok(items(n))), Completion::Stale);
                    prop_assert_eq!(p.is_fetching(), was_fetching);
                    prop_assert_eq!(p.items().len(), before_items);
                    prop_assert_eq!(p.page(), before_page);
                }
            }

            // Page numbers start at 1 and never run ahead of the loaded items.
            prop_assert!(p.page() >= 1);
            if p.page() > 1 {
                prop_assert!(p.items().len() >= (p.page() as usize - 1) * PAGE_SIZE);
            }
        }
    }
}
