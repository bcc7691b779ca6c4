//! Helper functions for UI operations.
//!
//! Spawning of background requests and handing story links to the system
//! browser.

use crate::api::{ApiError, Vocabulary};
use crate::app::{App, AppEvent, ScreenId};
use crate::feed::PageRequest;
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Panics inside a spawned task would otherwise vanish into the runtime and
/// leave the pagination state waiting forever.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Run `request` for `screen` in the background, if there is one.
///
/// Any task still running for that screen is aborted first; the request that
/// replaced it has already bumped the generation, so its result would be
/// discarded anyway.
pub(super) fn dispatch_page(
    app: &mut App,
    screen: ScreenId,
    request: Option<PageRequest>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let Some(request) = request else {
        return;
    };

    let slot = app.screen_mut(screen);
    if let Some(handle) = slot.load_handle.take() {
        handle.abort();
        tracing::debug!(screen = screen.title(), "Aborted previous page load task");
    }

    let client = app.client.clone();
    let tx = event_tx.clone();
    let generation = request.generation;

    tracing::debug!(
        screen = screen.title(),
        page = request.page,
        generation,
        refresh = request.refresh,
        "Spawning page load"
    );

    app.screen_mut(screen).load_handle = Some(tokio::spawn(async move {
        let result = match catch_task_panic(client.fetch_page(request.page, &request.filter)).await
        {
            Ok(result) => result,
            Err(panic_msg) => {
                tracing::error!(task = "page_load", error = %panic_msg, "Background task panicked");
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "page_load",
                        error: panic_msg.clone(),
                    })
                    .await;
                Err(ApiError::Interrupted(panic_msg))
            }
        };

        if let Err(e) = tx
            .send(AppEvent::PageLoaded {
                screen,
                generation,
                result,
            })
            .await
        {
            tracing::warn!(error = %e, event = "PageLoaded", "Channel send failed (receiver dropped)");
        }
    }));
}

/// Fetch a category or tag list in the background.
pub(super) fn spawn_vocabulary_load(
    app: &App,
    kind: Vocabulary,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let client = app.client.clone();
    let tx = event_tx.clone();

    tracing::debug!(kind = ?kind, "Spawning vocabulary load");

    tokio::spawn(async move {
        let result = match catch_task_panic(client.fetch_vocabulary(kind)).await {
            Ok(result) => result,
            Err(panic_msg) => {
                tracing::error!(task = "vocabulary_load", error = %panic_msg, "Background task panicked");
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "vocabulary_load",
                        error: panic_msg.clone(),
                    })
                    .await;
                Err(ApiError::Interrupted(panic_msg))
            }
        };

        if let Err(e) = tx.send(AppEvent::VocabularyLoaded { kind, result }).await {
            tracing::warn!(error = %e, event = "VocabularyLoaded", "Channel send failed (receiver dropped)");
        }
    });
}

/// Open the selected story's source link in the system browser.
pub(super) fn open_selected_story(app: &mut App) {
    let Some(item) = app.active_screen().selected_item() else {
        return;
    };
    let link = item.source_url.clone();

    // Validate before open::that(), which hands the string to a platform command
    match validate_url_for_open(&link) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                tracing::warn!(error = %e, "Failed to launch browser");
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                let host = url.host_str().unwrap_or("link").to_string();
                app.set_status(format!("Opening {}...", host));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NewsClient;
    use crate::feed::FilterState;
    use crate::theme::ThemeVariant;
    use secrecy::SecretString;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer) -> App {
        let client = NewsClient::new(
            reqwest::Client::new(),
            &server.uri(),
            SecretString::from("t"),
            Some(Duration::from_secs(10)),
        )
        .unwrap();
        App::new(client, ThemeVariant::Dark, ScreenId::List, FilterState::default())
    }

    #[tokio::test]
    async fn test_catch_task_panic_returns_message() {
        let result: Result<(), String> = catch_task_panic(async { panic!("x") }).await;
        assert_eq!(result, Err("x".to_string()));

        let formatted: Result<(), String> =
            catch_task_panic(async { panic!("page {} failed", 3) }).await;
        assert_eq!(formatted, Err("page 3 failed".to_string()));
    }

    #[tokio::test]
    async fn test_catch_task_panic_passes_result_through() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_dispatch_without_request_spawns_nothing() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        let (tx, _rx) = mpsc::channel(4);
        dispatch_page(&mut app, ScreenId::List, None, &tx);
        assert!(app.list.load_handle.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_delivers_page_loaded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/news"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"title": "a"}])),
            )
            .mount(&server)
            .await;
        let mut app = app_for(&server);
        let (tx, mut rx) = mpsc::channel(4);

        let request = app.list.mount();
        let expected_generation = request.as_ref().map(|r| r.generation);
        dispatch_page(&mut app, ScreenId::List, request, &tx);
        assert!(app.list.load_handle.is_some());

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event should arrive")
            .expect("channel open");
        match event {
            AppEvent::PageLoaded {
                screen,
                generation,
                result,
            } => {
                assert_eq!(screen, ScreenId::List);
                assert_eq!(Some(generation), expected_generation);
                assert_eq!(result.unwrap()[0].title, "a");
            }
            _ => panic!("expected PageLoaded"),
        }
    }

    #[tokio::test]
    async fn test_new_dispatch_aborts_previous_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/news"))
            .and(query_param("category", "tech"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"title": "tech"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/news"))
            .and(query_param_is_missing("category"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"title": "slow"}]))
                    .set_delay(Duration::from_secs(1)),
            )
            .mount(&server)
            .await;
        let mut app = app_for(&server);
        let (tx, mut rx) = mpsc::channel(4);

        let first = app.list.mount();
        dispatch_page(&mut app, ScreenId::List, first, &tx);
        let first_task = app
            .list
            .load_handle
            .as_ref()
            .map(|handle| handle.abort_handle())
            .unwrap();

        let second = app.list.pagination.set_category(Some("tech".into()));
        let second_generation = second.as_ref().map(|r| r.generation).unwrap();
        dispatch_page(&mut app, ScreenId::List, second, &tx);

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event should arrive")
            .expect("channel open");
        match event {
            AppEvent::PageLoaded {
                generation, result, ..
            } => {
                assert_eq!(generation, second_generation);
                assert_eq!(result.unwrap()[0].title, "tech");
            }
            _ => panic!("expected PageLoaded"),
        }

        // The slow response would have landed by now had the task survived.
        let late = tokio::time::timeout(Duration::from_millis(1500), rx.recv()).await;
        assert!(late.is_err(), "aborted task must not report");
        assert!(first_task.is_finished());
    }
}
