use crate::app::{App, ScreenId};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style): (Cow<'_, str>, _) = if let Some((msg, _)) = &app.status_message {
        let style = if msg.starts_with("Failed") || msg.starts_with("Internal error") {
            app.style("status_error")
        } else {
            app.style("status_bar")
        };
        (Cow::Borrowed(&**msg), style)
    } else {
        // Static keybinding hints - zero allocation
        let hints = if app.picker.is_some() {
            "[j/k]move [Enter]select [Esc]cancel"
        } else {
            match app.active {
                ScreenId::Story => "[j/k]next/prev [o]pen [r]efresh [g]top [Tab]switch [?]help [q]uit",
                ScreenId::List => {
                    "[j/k]move [o]pen [c]ategory [t]ag [x]clear [r]efresh [Tab]switch [?]help [q]uit"
                }
            }
        };
        (Cow::Borrowed(hints), app.style("status_bar"))
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}
