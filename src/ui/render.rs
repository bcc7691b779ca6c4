//! Render functions for the TUI.
//!
//! This module handles the frame layout (tab bar, active screen, status bar)
//! and the overlays drawn on top of it.

use crate::app::{App, FeedScreen, ScreenId};
use crate::feed::FeedPhase;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use super::{help, list, picker, status, story};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 12;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Number of frames in the loading spinner animation.
pub(super) const SPINNER_FRAMES: usize = SPINNER.len();

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(f, app, chunks[0]);
    match app.active {
        ScreenId::Story => story::render(f, app, chunks[1]),
        ScreenId::List => list::render(f, app, chunks[1]),
    }
    status::render(f, app, chunks[2]);

    if app.picker.is_some() {
        picker::render(f, app);
    }

    if app.show_help {
        help::render(f, app);
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles = ScreenId::ALL
        .iter()
        .map(|id| format!(" {} {} ", id.index() + 1, id.title()));

    let tabs = Tabs::new(titles)
        .select(app.active.index())
        .style(app.style("tab_inactive"))
        .highlight_style(app.style("tab_active"))
        .divider("│");

    f.render_widget(tabs, area);
}

pub(super) fn spinner(app: &App) -> &'static str {
    SPINNER[app.spinner_frame % SPINNER_FRAMES]
}

/// Footer line describing in-progress or finished loading, if any.
pub(super) fn feed_footer(app: &App, screen: &FeedScreen) -> Option<Line<'static>> {
    let text = match screen.pagination.phase() {
        FeedPhase::Refreshing => format!("{} Refreshing...", spinner(app)),
        FeedPhase::LoadingFirstPage => format!("{} Loading...", spinner(app)),
        FeedPhase::LoadingNextPage => format!("{} Loading more...", spinner(app)),
        FeedPhase::Exhausted if !screen.items().is_empty() => "End of feed".to_string(),
        FeedPhase::Exhausted | FeedPhase::Idle => return None,
    };
    let style = if screen.pagination.phase() == FeedPhase::Exhausted {
        app.style("feed_empty")
    } else {
        app.style("feed_loading")
    };
    Some(Line::from(Span::styled(text, style)))
}

/// Placeholder shown instead of the feed when there are no items.
///
/// Returns `None` when there are items to draw.
pub(super) fn feed_placeholder(app: &App, screen: &FeedScreen) -> Option<Paragraph<'static>> {
    if !screen.items().is_empty() {
        return None;
    }

    let mut lines = vec![Line::from("")];
    if screen.pagination.is_empty_idle() {
        lines.push(Line::from(Span::styled(
            "No news to show",
            app.style("feed_empty"),
        )));
        lines.push(Line::from(""));
        if screen.pagination.filter().is_active() {
            lines.push(Line::from(Span::styled(
                "[x] clear filters",
                app.style("filter_badge"),
            )));
        }
        lines.push(Line::from(Span::styled(
            "[r] refresh",
            app.style("feed_empty"),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("{} Loading news...", spinner(app)),
            app.style("feed_loading"),
        )));
    }

    Some(Paragraph::new(lines).alignment(Alignment::Center))
}
