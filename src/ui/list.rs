use crate::app::App;
use crate::feed::NewsItem;
use crate::util::{strip_control_chars, truncate_to_width, wrap_clamped};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::render::{feed_footer, feed_placeholder};

/// Lines of body text shown per row.
const CONTENT_LINES: usize = 2;
/// Tallest possible row: title, full body, date and a blank separator.
const ROW_HEIGHT: usize = 1 + CONTENT_LINES + 1 + 1;

fn row<'a>(item: &NewsItem, width: usize, styles: [Style; 3]) -> ListItem<'a> {
    let [title_style, body_style, date_style] = styles;
    let mut lines = vec![Line::from(Span::styled(
        truncate_to_width(&strip_control_chars(&item.title), width).into_owned(),
        title_style,
    ))];
    for line in wrap_clamped(&strip_control_chars(&item.content), width, CONTENT_LINES) {
        lines.push(Line::from(Span::styled(line, body_style)));
    }
    lines.push(Line::from(Span::styled(
        strip_control_chars(&item.display_date()).into_owned(),
        date_style,
    )));
    lines.push(Line::from(""));
    ListItem::new(lines)
}

/// Render the compact news list with its filter header.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let mut title = vec![Span::raw(" News Feed ")];
    if let Some(summary) = app.list.pagination.filter().summary() {
        title.push(Span::styled(
            format!("[{}] ", summary),
            app.style("filter_badge"),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(Line::from(title));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 4 || inner.height < 2 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let list_height = chunks[0].height as usize;

    if let Some(footer) = feed_footer(app, &app.list) {
        f.render_widget(Paragraph::new(footer), chunks[1]);
    }

    if let Some(placeholder) = feed_placeholder(app, &app.list) {
        f.render_widget(placeholder, chunks[0]);
        app.list.viewport = visible_rows(&[], 0, list_height);
        return;
    }

    let width = chunks[0].width as usize;
    let styles = [
        app.style("row_title"),
        app.style("row_body"),
        app.style("row_date"),
    ];
    let rows: Vec<ListItem> = app
        .list
        .items()
        .iter()
        .map(|item| row(item, width, styles))
        .collect();
    let heights: Vec<usize> = rows.iter().map(ListItem::height).collect();

    let list = List::new(rows).highlight_style(app.style("row_selected"));
    let mut state = ListState::default()
        .with_offset(app.list.offset)
        .with_selected(Some(app.list.selected));
    f.render_stateful_widget(list, chunks[0], &mut state);
    app.list.offset = state.offset();
    app.list.viewport = visible_rows(&heights, app.list.offset, list_height);
}

/// How many rows fit in `height` lines when the list starts at `offset`.
///
/// Space left below the last loaded row is counted in full-height rows, so a
/// short list still reports the viewport a full one would have.
fn visible_rows(heights: &[usize], offset: usize, height: usize) -> usize {
    let mut used = 0;
    let mut count = 0;
    for &row_height in heights.iter().skip(offset) {
        if used + row_height > height {
            return count.max(1);
        }
        used += row_height;
        count += 1;
    }
    (count + (height - used) / ROW_HEIGHT).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_clamps_body_to_two_lines() {
        let item = NewsItem {
            title: "Title".into(),
            content: "one two three four five six seven eight nine ten".into(),
            created_at: "2024-01-02".into(),
            ..Default::default()
        };
        let row = row(&item, 10, [Style::default(); 3]);
        // title + 2 body + date + separator
        assert_eq!(row.height(), ROW_HEIGHT);
    }

    #[test]
    fn test_visible_rows_uses_actual_heights() {
        // 19 lines of three-line rows fit six, not 19 / ROW_HEIGHT.
        assert_eq!(visible_rows(&[3; 20], 0, 19), 6);
        assert_eq!(visible_rows(&[5, 3, 4, 5, 3], 1, 12), 3);
    }

    #[test]
    fn test_visible_rows_counts_space_past_last_row() {
        assert_eq!(visible_rows(&[3, 3], 0, 16), 4);
        assert_eq!(visible_rows(&[], 0, 19), 3);
        assert_eq!(visible_rows(&[], 0, 2), 1);
    }

    #[test]
    fn test_visible_rows_taller_than_area() {
        assert_eq!(visible_rows(&[5, 5], 0, 4), 1);
    }

    #[test]
    fn test_row_with_empty_body() {
        let item = NewsItem {
            title: "Only a title".into(),
            ..Default::default()
        };
        let row = row(&item, 40, [Style::default(); 3]);
        assert_eq!(row.height(), 3);
    }
}
