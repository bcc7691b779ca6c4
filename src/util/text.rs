use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` columns, appending "..." when cut.
///
/// Widths of three columns or fewer have no room for the ellipsis, so the
/// string is simply cut.
///
/// ```
/// use newsdeck::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(take_columns(s, max_width).to_string());
    }
    let head = take_columns(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", head.trim_end(), ELLIPSIS))
}

/// Longest prefix of `s` that fits in `width` columns.
fn take_columns(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Word-wrap `s` to `width` columns and keep at most `max_lines` lines.
///
/// When text is dropped the last kept line ends with "...", like a CSS line
/// clamp. Words wider than the line are hard-broken.
pub fn wrap_clamped(s: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in s.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let word_width = display_width(rest);
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(rest);
                current_width += sep + word_width;
                break;
            }

            if current.is_empty() {
                let mut head = take_columns(rest, width);
                if head.is_empty() {
                    // Double-width char on a one-column line.
                    head = rest.chars().next().map_or(rest, |c| &rest[..c.len_utf8()]);
                }
                lines.push(head.to_string());
                rest = &rest[head.len()..];
            } else {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let kept = take_columns(last, width.saturating_sub(ELLIPSIS_WIDTH));
            *last = format!("{}{}", kept.trim_end(), ELLIPSIS);
        }
    }

    lines
}

/// Remove terminal control characters and escape sequences from API text.
///
/// Tabs and newlines survive; ESC-introduced sequences (CSI `ESC [ ... final`
/// and OSC `ESC ] ... BEL|ST`) are dropped whole.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_unsafe = |c: char| c == '\u{7f}' || (c.is_control() && c != '\t' && c != '\n');
    if !s.chars().any(is_unsafe) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            if !is_unsafe(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\u{07}' {
                        break;
                    }
                    if c == '\u{1b}' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("12345", 5), "12345");
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate_to_width("日本語ニュース", 7), "日本...");
        assert_eq!(truncate_to_width("日本", 1), "");
    }

    #[test]
    fn test_truncate_borrows_when_fitting() {
        assert!(matches!(truncate_to_width("fits", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_wrap_fits_in_one_line() {
        assert_eq!(wrap_clamped("short text", 20, 2), vec!["short text"]);
    }

    #[test]
    fn test_wrap_multiple_lines() {
        assert_eq!(
            wrap_clamped("the quick brown fox jumps", 10, 5),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_clamps_with_ellipsis() {
        let lines = wrap_clamped("one two three four five six seven", 9, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one two");
        assert!(lines[1].ends_with("..."));
        assert!(display_width(&lines[1]) <= 9);
    }

    #[test]
    fn test_wrap_exact_fit_has_no_ellipsis() {
        assert_eq!(wrap_clamped("aaaa bbbb", 4, 2), vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn test_wrap_hard_breaks_long_word() {
        assert_eq!(wrap_clamped("abcdefghij", 4, 5), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_degenerate_sizes() {
        assert!(wrap_clamped("text", 0, 3).is_empty());
        assert!(wrap_clamped("text", 10, 0).is_empty());
        assert!(wrap_clamped("   ", 10, 3).is_empty());
    }

    #[test]
    fn test_strip_clean_text_borrowed() {
        let input = "plain\ttext\nline";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_ansi_and_controls() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("a\x00b\x07c\x7fd"), "abcd");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("x\x1by"), "xy");
    }
}
