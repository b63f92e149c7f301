//! Text scanning helpers shared by the checkers.
//!
//! Everything here works on *character* indices (the checkers scan documents
//! as `Vec<char>`), so offsets reported in notices line up with what a human
//! counts, not with UTF-8 byte positions.

/// Default total width, in characters, of an extract window.
pub const DEFAULT_EXTRACT_LENGTH: usize = 10;

/// Visible stand-in for a space inside an extract window.
pub const SPACE_MARK: char = '␣';

/// Opening punctuation tracked by the nesting checker.
///
/// Index-paired with [`PAIRED_PUNCTUATION_CLOSERS`].
pub const PAIRED_PUNCTUATION_OPENERS: [char; 7] = ['(', '[', '{', '“', '‘', '«', '‹'];

/// Closing punctuation tracked by the nesting checker.
pub const PAIRED_PUNCTUATION_CLOSERS: [char; 7] = [')', ']', '}', '”', '’', '»', '›'];

/// Pairs that are safe to count across a whole document.
///
/// Curly single quotes are deliberately absent: they double as apostrophes,
/// so their counts never balance in ordinary prose.
pub const MATCHED_PUNCTUATION_PAIRS: [(char, char); 6] = [
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('“', '”'),
    ('«', '»'),
    ('‹', '›'),
];

/// Returns `true` if `text` is non-empty and consists only of whitespace.
pub fn is_whitespace(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_whitespace)
}

/// Count occurrences of `wanted` in `text`.
pub fn count_char(text: &str, wanted: char) -> usize {
    text.chars().filter(|c| *c == wanted).count()
}

/// Resolve a requested extract length to an effective one.
///
/// Returns the validated length plus a flag telling whether the default was
/// substituted (absent, zero, or negative requests all fall back). The flag
/// exists so tests can assert on the fallback path instead of inferring it.
pub fn extract_length_or_default(requested: Option<i64>) -> (usize, bool) {
    match requested {
        Some(n) if n >= 1 => (n as usize, false),
        _ => (DEFAULT_EXTRACT_LENGTH, true),
    }
}

/// Build an extract window of roughly `extract_length` characters around
/// `index`, ellipsis-marked at whichever ends fall short of the text.
pub fn extract_window(chars: &[char], index: usize, extract_length: usize) -> String {
    window(chars, index, extract_length, false)
}

/// Like [`extract_window`], but with interior spaces rendered as
/// [`SPACE_MARK`] so trailing/doubled spaces stay visible in reports.
pub fn extract_window_marked(chars: &[char], index: usize, extract_length: usize) -> String {
    window(chars, index, extract_length, true)
}

fn window(chars: &[char], index: usize, extract_length: usize, mark_spaces: bool) -> String {
    let half = extract_length / 2;
    let half_plus = extract_length.div_ceil(2);
    let start = index.saturating_sub(half);
    let end = (index + half_plus).min(chars.len());

    let mut out = String::new();
    if index > half {
        out.push('…');
    }
    for &c in &chars[start.min(chars.len())..end] {
        out.push(if mark_spaces && c == ' ' { SPACE_MARK } else { c });
    }
    if index + half_plus < chars.len() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn whitespace_detection() {
        assert!(is_whitespace("   \t\n"));
        assert!(!is_whitespace(""));
        assert!(!is_whitespace("  x  "));
    }

    #[test]
    fn counts_multibyte_chars() {
        assert_eq!(count_char("a“b“c", '“'), 2);
        assert_eq!(count_char("abc", '“'), 0);
    }

    #[test]
    fn extract_length_falls_back_to_default() {
        assert_eq!(extract_length_or_default(None), (DEFAULT_EXTRACT_LENGTH, true));
        assert_eq!(extract_length_or_default(Some(0)), (DEFAULT_EXTRACT_LENGTH, true));
        assert_eq!(extract_length_or_default(Some(-3)), (DEFAULT_EXTRACT_LENGTH, true));
        assert_eq!(extract_length_or_default(Some(14)), (14, false));
    }

    #[test]
    fn window_in_the_middle_is_marked_both_ends() {
        let text = chars("abcdefghijklmnopqrstuvwxyz");
        let got = extract_window(&text, 12, 10);
        assert_eq!(got, "…hijklmnopq…");
    }

    #[test]
    fn window_at_text_start_has_no_leading_ellipsis() {
        let text = chars("abcdefghijklmnop");
        let got = extract_window(&text, 2, 10);
        assert_eq!(got, "abcdefg…");
    }

    #[test]
    fn window_at_text_end_has_no_trailing_ellipsis() {
        let text = chars("abcdefghij");
        let got = extract_window(&text, 9, 10);
        assert_eq!(got, "…efghij");
    }

    #[test]
    fn marked_window_renders_spaces_visibly() {
        let text = chars("one two three");
        let got = extract_window_marked(&text, 6, 10);
        assert_eq!(got, "…ne␣two␣thr…");
    }

    #[test]
    fn window_on_short_text_is_the_whole_text() {
        let text = chars("ab)");
        assert_eq!(extract_window(&text, 2, 10), "ab)");
    }
}
