//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler: help overlay, filter picker, or the active feed screen.

use crate::api::Vocabulary;
use crate::app::{App, AppEvent, ScreenId};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{dispatch_page, open_selected_story, spawn_vocabulary_load};
use super::Action;

/// Main input dispatch function.
///
/// Overlays capture all keys while visible; otherwise keys go to the active
/// screen.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    if app.picker.is_some() {
        handle_picker_input(app, code, event_tx);
        return Action::Continue;
    }

    handle_feed_input(app, code, event_tx)
}

/// Handle input while the filter picker is open.
fn handle_picker_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_picker(),
        KeyCode::Char('j') | KeyCode::Down => app.picker_down(),
        KeyCode::Char('k') | KeyCode::Up => app.picker_up(),
        KeyCode::Enter => {
            let request = app.picker_confirm();
            if request.is_some() {
                announce_filter(app);
            }
            dispatch_page(app, ScreenId::List, request, event_tx);
        }
        _ => {}
    }
}

/// Handle input on the active feed screen.
fn handle_feed_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    let screen = app.active;

    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => app.show_help = true,

        // Tabs
        KeyCode::Tab | KeyCode::BackTab => {
            let request = app.switch_to(screen.next());
            dispatch_page(app, app.active, request, event_tx);
        }
        KeyCode::Char('1') => {
            let request = app.switch_to(ScreenId::Story);
            dispatch_page(app, ScreenId::Story, request, event_tx);
        }
        KeyCode::Char('2') => {
            let request = app.switch_to(ScreenId::List);
            dispatch_page(app, ScreenId::List, request, event_tx);
        }

        // Navigation
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Char(' ') => {
            let request = app.active_screen_mut().nav_down(1);
            dispatch_page(app, screen, request, event_tx);
        }
        KeyCode::Char('k') | KeyCode::Up => app.active_screen_mut().nav_up(1),
        KeyCode::PageDown => {
            let step = app.active_screen().viewport;
            let request = app.active_screen_mut().nav_down(step);
            dispatch_page(app, screen, request, event_tx);
        }
        KeyCode::PageUp => {
            let step = app.active_screen().viewport;
            app.active_screen_mut().nav_up(step);
        }
        KeyCode::Char('g') | KeyCode::Home => app.active_screen_mut().scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => {
            let request = app.active_screen_mut().scroll_to_bottom();
            dispatch_page(app, screen, request, event_tx);
        }

        // Feed actions
        KeyCode::Char('r') => {
            let request = app.active_screen_mut().refresh();
            dispatch_page(app, screen, request, event_tx);
        }
        KeyCode::Char('o') | KeyCode::Enter => open_selected_story(app),

        // Filters
        KeyCode::Char('c') => open_picker(app, Vocabulary::Categories, event_tx),
        KeyCode::Char('t') => open_picker(app, Vocabulary::Tags, event_tx),
        KeyCode::Char('x') => {
            if screen == ScreenId::List {
                let request = app.clear_filters();
                app.set_status("Filters cleared");
                dispatch_page(app, ScreenId::List, request, event_tx);
            }
        }

        KeyCode::Char('T') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        _ => {}
    }

    Action::Continue
}

fn open_picker(app: &mut App, kind: Vocabulary, event_tx: &mpsc::Sender<AppEvent>) {
    if app.open_picker(kind) {
        spawn_vocabulary_load(app, kind, event_tx);
    }
}

fn announce_filter(app: &mut App) {
    let msg = match app.list.pagination.filter().summary() {
        Some(summary) => format!("Filter: {}", summary),
        None => "Showing all news".to_string(),
    };
    app.set_status(msg);
}
