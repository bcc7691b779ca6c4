//! Filter picker overlay for categories and tags.

use crate::app::{App, VocabularyState};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::render::spinner;

/// Render the picker centered over the list screen.
pub fn render(f: &mut Frame, app: &App) {
    let Some(picker) = &app.picker else {
        return;
    };
    let area = f.area();

    let width = 40u16.min(area.width.saturating_sub(4));
    let rows = match app.vocabulary(picker.kind) {
        VocabularyState::Loaded(values) => u16::try_from(values.len())
            .unwrap_or(u16::MAX)
            .saturating_add(1),
        _ => 1,
    };
    // +2 borders, +1 hint line
    let height = rows
        .saturating_add(3)
        .min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 12 || overlay.height < 4 {
        return;
    }

    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(format!(" {} ", picker.kind.label()));
    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let list_area = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let hint_area = Rect {
        y: inner.y + inner.height.saturating_sub(1),
        height: 1,
        ..inner
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "(Enter) Select  (Esc) Cancel",
            app.style("feed_empty"),
        )))
        .alignment(Alignment::Center),
        hint_area,
    );

    let values = match app.vocabulary(picker.kind) {
        VocabularyState::Loaded(values) => values,
        _ => {
            let loading = Paragraph::new(format!("{} Loading…", spinner(app)))
                .style(app.style("feed_loading"))
                .alignment(Alignment::Center);
            f.render_widget(loading, list_area);
            return;
        }
    };

    let width = list_area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = std::iter::once("Any".to_string())
        .chain(
            values
                .iter()
                .map(|v| truncate_to_width(&strip_control_chars(v), width).into_owned()),
        )
        .map(ListItem::new)
        .collect();

    let list = List::new(items)
        .highlight_style(app.style("picker_selected"))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(picker.selected));
    f.render_stateful_widget(list, list_area, &mut state);
}
