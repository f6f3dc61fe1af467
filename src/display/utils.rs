//! String width helpers for terminal layout

/// Fallback terminal width when it cannot be detected
pub const DEFAULT_WIDTH: usize = 80;

/// Calculate visual width of a string, handling ANSI color codes
pub fn visual_width(s: &str) -> usize {
    strip_ansi_codes(s).chars().map(char_width).sum()
}

/// Simple character width calculation without external dependencies
pub fn char_width(ch: char) -> usize {
    match ch {
        // Control characters and combining marks
        '\u{0000}'..='\u{001F}' | '\u{007F}' | '\u{0300}'..='\u{036F}' => 0,
        // Wide CJK and fullwidth forms
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{303E}'
        | '\u{3041}'..='\u{33FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{FFE0}'..='\u{FFE6}' => 2,
        _ => 1,
    }
}

/// Remove ANSI escape sequences
pub fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Current stdout width in columns
pub fn terminal_width() -> usize {
    term_size::dimensions_stdout()
        .map(|(w, _)| w)
        .unwrap_or(DEFAULT_WIDTH)
}

/// `───── title ─────` spanning `width` columns
///
/// `title` may carry ANSI styling. A title wider than `width` is returned
/// with a single rule segment on each side.
pub fn centered_rule(title: &str, width: usize) -> String {
    let title_width = visual_width(title) + 2;
    let fill = width.saturating_sub(title_width).max(2);
    let left = fill / 2;
    let right = fill - left;
    format!("{} {} {}", "─".repeat(left), title, "─".repeat(right))
}
