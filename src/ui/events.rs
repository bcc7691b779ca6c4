//! Application event handling.
//!
//! Applies the results of background page and vocabulary requests. All of
//! them arrive on the event loop, so state is only ever written from there.

use crate::app::{App, AppEvent};
use crate::feed::Completion;

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PageLoaded {
            screen,
            generation,
            result,
        } => match app.apply_page(screen, generation, result) {
            Completion::Replaced { count, exhausted } => {
                tracing::debug!(screen = screen.title(), count, exhausted, "First page applied");
            }
            Completion::Appended {
                page,
                count,
                exhausted,
            } => {
                tracing::debug!(screen = screen.title(), page, count, exhausted, "Page appended");
                if exhausted && app.active == screen {
                    app.set_status("You're all caught up");
                }
            }
            Completion::Failed { .. } | Completion::Stale => {}
        },
        AppEvent::VocabularyLoaded { kind, result } => {
            app.apply_vocabulary(kind, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, NewsClient, Vocabulary};
    use crate::app::{ScreenId, VocabularyState};
    use crate::feed::{FilterState, NewsItem, PAGE_SIZE};
    use crate::theme::ThemeVariant;
    use secrecy::SecretString;

    fn test_app() -> App {
        let client = NewsClient::new(
            reqwest::Client::new(),
            "https://news.example.com",
            SecretString::from("t"),
            None,
        )
        .unwrap();
        App::new(client, ThemeVariant::Dark, ScreenId::Story, FilterState::default())
    }

    fn items(n: usize) -> Vec<NewsItem> {
        vec![NewsItem::default(); n]
    }

    #[test]
    fn test_page_loaded_appends_and_reports_end() {
        let mut app = test_app();
        let first = app.story.mount().unwrap();
        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                screen: ScreenId::Story,
                generation: first.generation,
                result: Ok(items(PAGE_SIZE)),
            },
        );
        assert!(app.status_message.is_none());

        let second = app.story.pagination.load_more().unwrap();
        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                screen: ScreenId::Story,
                generation: second.generation,
                result: Ok(items(5)),
            },
        );
        assert_eq!(app.story.items().len(), PAGE_SIZE + 5);
        assert!(app.story.pagination.all_data_loaded());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_page_loaded_failure_keeps_items() {
        let mut app = test_app();
        let first = app.story.mount().unwrap();
        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                screen: ScreenId::Story,
                generation: first.generation,
                result: Ok(items(PAGE_SIZE)),
            },
        );
        let second = app.story.pagination.load_more().unwrap();
        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                screen: ScreenId::Story,
                generation: second.generation,
                result: Err(ApiError::Interrupted("boom".into())),
            },
        );
        assert_eq!(app.story.items().len(), PAGE_SIZE);
        assert_eq!(app.story.pagination.page(), 1);
        assert!(!app.story.pagination.is_fetching());
    }

    #[test]
    fn test_vocabulary_loaded_is_cached() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::VocabularyLoaded {
                kind: Vocabulary::Categories,
                result: Ok(vec!["tech".into()]),
            },
        );
        assert_eq!(app.categories, VocabularyState::Loaded(vec!["tech".into()]));
    }

    #[test]
    fn test_task_panicked_sets_status() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "page_load",
                error: "boom".into(),
            },
        );
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("page_load"));
    }
}
