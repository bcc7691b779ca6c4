use crate::app::App;
use crate::util::{strip_control_chars, truncate_to_width, wrap_clamped};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::render::{feed_footer, feed_placeholder};

/// Lines of story body shown on a card.
const CONTENT_LINES: usize = 6;
/// Lines of headline shown on a card.
const TITLE_LINES: usize = 3;

/// Render the full-screen story card for the selected item.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    app.story.viewport = 1;
    let screen = &app.story;

    let title = if screen.items().is_empty() {
        " Home ".to_string()
    } else {
        format!(" {}/{} ", screen.selected + 1, screen.items().len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 4 || inner.height < 2 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    if let Some(footer) = feed_footer(app, screen) {
        f.render_widget(Paragraph::new(footer), chunks[1]);
    }

    if let Some(placeholder) = feed_placeholder(app, screen) {
        f.render_widget(placeholder, chunks[0]);
        return;
    }

    let Some(item) = screen.selected_item() else {
        return;
    };

    let card = chunks[0];
    let width = card.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();

    for line in wrap_clamped(&strip_control_chars(&item.title), width, TITLE_LINES) {
        lines.push(Line::from(Span::styled(line, app.style("story_title"))));
    }

    let date = item.display_date();
    if !date.is_empty() {
        lines.push(Line::from(Span::styled(
            strip_control_chars(&date).into_owned(),
            app.style("story_date"),
        )));
    }

    if let Some(host) = item.image_host() {
        let label = format!("[image: {}]", host);
        lines.push(Line::from(Span::styled(
            truncate_to_width(&label, width).into_owned(),
            app.style("story_image"),
        )));
    }

    lines.push(Line::from(""));
    for line in wrap_clamped(&strip_control_chars(&item.content), width, CONTENT_LINES) {
        lines.push(Line::from(Span::styled(line, app.style("story_body"))));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Read More ›", app.style("story_link")),
        Span::styled("  [o]", app.style("story_date")),
    ]));

    let padded = Rect {
        x: card.x + 1,
        width: card.width.saturating_sub(2),
        ..card
    };
    f.render_widget(Paragraph::new(lines), padded);
}
