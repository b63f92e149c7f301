//! Whole-document plain-text checking.
//!
//! Optimised for checking an entire document at once: individual lines are
//! handed to the caller's [`FieldChecker`], while this module owns the
//! checks that only make sense across lines — nested punctuation balance,
//! unresolved merge-conflict markers, and document-wide pair counts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::delegates::FieldChecker;
use crate::notice::{CheckResult, Notice};
use crate::options::CheckOptions;
use crate::text::{
    self, MATCHED_PUNCTUATION_PAIRS, PAIRED_PUNCTUATION_CLOSERS, PAIRED_PUNCTUATION_OPENERS,
};

/// What kind of text a document holds.
///
/// The structural checks are the same for every kind; the kind is passed
/// through to the field checker, which cares about line-level syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    /// Markdown source.
    Markdown,
    /// USFM scripture source.
    #[serde(rename = "USFM")]
    Usfm,
    /// YAML source.
    #[serde(rename = "YAML")]
    Yaml,
    /// Anything else; treated as plain lines.
    Raw,
}

impl TextKind {
    /// The kind as its conventional short name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Usfm => "USFM",
            Self::Yaml => "YAML",
            Self::Raw => "raw",
        }
    }
}

impl std::fmt::Display for TextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A still-open punctuation marker on the nesting stack.
struct OpenMarker {
    char: char,
    line_number: usize,
    column_index: usize,
}

/// The three git merge-conflict markers, with a notice priority each.
const CONFLICT_MARKERS: [(&str, u16); 3] = [
    ("<<<<<<<", 993),
    ("=======", 992),
    (">>>>>>>>", 991),
];

/// Check one whole plain-text document.
///
/// Every non-empty line goes to `field_checker` (links allowed — a line of
/// running text is the most permissive context); the notices it returns are
/// re-tagged with the line number. Nothing here fails: all findings come
/// back as notices in the returned [`CheckResult`].
#[tracing::instrument(skip(text, field_checker, options), fields(text_len = text.len()))]
pub fn check_plain_text(
    kind: TextKind,
    name: &str,
    text: &str,
    location: &str,
    field_checker: &dyn FieldChecker,
    options: &CheckOptions,
) -> CheckResult {
    let our_location = compose_location(name, location);
    let (extract_length, _) = options.effective_extract_length();
    let half = extract_length / 2;

    let mut result = CheckResult::default();

    if text::is_whitespace(text) {
        result.add_notice(Notice::new(638, "Only found whitespace", &our_location));
        return result;
    }

    let lines: Vec<&str> = text.split('\n').collect();

    // One stack for the whole document, so a marker opened on one line can
    // close on a later one.
    let mut open_markers: Vec<OpenMarker> = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        if line.is_empty() {
            continue;
        }

        // Leading whitespace is stripped first; reporting it (and doubled
        // spaces) is the field checker's job, not ours.
        let line_text = line.trim_start();
        if !line_text.is_empty() {
            let outcome =
                field_checker.check_field(kind, "", line_text, true, &our_location, options);
            for notice in outcome.notices {
                result.add_notice(notice.with_line_number(line_number));
            }
        }

        let line_chars: Vec<char> = line.chars().collect();
        for (column_index, &ch) in line_chars.iter().enumerate() {
            if PAIRED_PUNCTUATION_OPENERS.contains(&ch) {
                open_markers.push(OpenMarker {
                    char: ch,
                    line_number,
                    column_index,
                });
            } else if let Some(which) = PAIRED_PUNCTUATION_CLOSERS.iter().position(|&c| c == ch) {
                let expected_opener = PAIRED_PUNCTUATION_OPENERS[which];
                match open_markers.last() {
                    Some(last) if last.char == expected_opener => {
                        open_markers.pop();
                    }
                    Some(last) => {
                        // Mismatch: the frame stays so later closers are
                        // still compared against the original opener.
                        let details = format!(
                            "'{expected_opener}' opened on line {} character {}",
                            last.line_number,
                            last.column_index + 1
                        );
                        result.add_notice(
                            Notice::new(
                                777,
                                format!("Unexpected {ch} closing character doesn't match"),
                                &our_location,
                            )
                            .with_details(details)
                            .with_line_number(line_number)
                            .with_character_index(column_index)
                            .with_extract(text::extract_window_marked(
                                &line_chars,
                                column_index,
                                extract_length,
                            )),
                        );
                    }
                    None => {
                        result.add_notice(
                            Notice::new(
                                774,
                                format!("Unexpected {ch} closing character (no matching opener)"),
                                &our_location,
                            )
                            .with_line_number(line_number)
                            .with_character_index(column_index)
                            .with_extract(text::extract_window_marked(
                                &line_chars,
                                column_index,
                                extract_length,
                            )),
                        );
                    }
                }
            }
        }
    }

    let full_chars: Vec<char> = text.chars().collect();
    for (marker, priority) in CONFLICT_MARKERS {
        if let Some(byte_index) = text.find(marker) {
            let character_index = text[..byte_index].chars().count();
            // Centre the extract a little past the marker so the conflicting
            // content shows, not seven identical characters.
            let focus = character_index + half;
            result.add_notice(
                Notice::new(priority, "Unresolved GIT conflict", &our_location)
                    .with_character_index(character_index)
                    .with_extract(text::extract_window_marked(
                        &full_chars,
                        focus,
                        extract_length,
                    )),
            );
        }
    }

    for (left, right) in MATCHED_PUNCTUATION_PAIRS {
        let left_count = text::count_char(text, left);
        let right_count = text::count_char(text, right);
        if left_count != right_count {
            // Lower priority than the similar per-field checks; these counts
            // span the entire file.
            let priority = if left == '“' { 162 } else { 462 };
            result.add_notice(
                Notice::new(priority, format!("Mismatched {left}{right} characters"), &our_location)
                    .with_details(format!("(left={left_count}, right={right_count})")),
            );
        }
    }

    result.add_success(format!(
        "Checked all {} line{}{}.",
        lines.len(),
        if lines.len() == 1 { "" } else { "s" },
        our_location
    ));
    let notice_count = result.notice_list.len();
    result.add_success(format!(
        "Plain-text check finished with {} notice{}",
        if notice_count == 0 {
            "zero".to_string()
        } else {
            notice_count.to_string()
        },
        if notice_count == 1 { "" } else { "s" }
    ));
    result
}

/// Prefix the caller's location with the document name.
fn compose_location(name: &str, location: &str) -> String {
    let mut our_location = location.to_string();
    if !our_location.is_empty() && !our_location.starts_with(' ') {
        our_location.insert(0, ' ');
    }
    if !name.is_empty() {
        our_location = format!(" in {name}{our_location}");
    }
    our_location
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegates::{FieldOutcome, NoopFieldChecker};

    fn check(text: &str) -> CheckResult {
        check_plain_text(
            TextKind::Raw,
            "test.txt",
            text,
            "in unit test",
            &NoopFieldChecker,
            &CheckOptions::default(),
        )
    }

    fn priorities(result: &CheckResult) -> Vec<u16> {
        result.notice_list.iter().map(|n| n.priority).collect()
    }

    #[test]
    fn whitespace_only_short_circuits() {
        let result = check("  \n\t  \n");
        assert_eq!(priorities(&result), vec![638]);
        assert_eq!(result.notice_list[0].message, "Only found whitespace");
        // No line scan ran, so no success messages either.
        assert!(result.success_list.is_empty());
    }

    #[test]
    fn clean_text_yields_only_successes() {
        let result = check("This is fine.\nSo is (this) and [this].\n");
        assert!(result.notice_list.is_empty());
        assert_eq!(result.success_list.len(), 2);
        assert!(result.success_list[0].starts_with("Checked all 3 lines"));
        assert!(result.success_list[1].contains("zero notices"));
    }

    #[test]
    fn markers_match_across_lines() {
        let result = check("He said (quoting the letter,\nwhich was long) that all was well.");
        assert!(result.notice_list.is_empty());
    }

    #[test]
    fn unmatched_closer_is_774() {
        let result = check("No opener here) at all.");
        // The stray ')' also unbalances the whole-document pair count.
        assert_eq!(priorities(&result), vec![774, 462]);
        let notice = &result.notice_list[0];
        assert_eq!(notice.line_number, Some(1));
        assert_eq!(notice.character_index, Some(14));
        assert!(notice.message.contains("no matching opener"));
    }

    #[test]
    fn mismatched_closer_is_777_with_opener_position() {
        let result = check("start (here] and on.");
        // One 777 for the mismatch, then a 462 each for the unbalanced ()
        // and [] document counts.
        assert_eq!(priorities(&result), vec![777, 462, 462]);
        let notice = &result.notice_list[0];
        assert_eq!(notice.priority, 777);
        assert_eq!(
            notice.details.as_deref(),
            Some("'[' opened on line 1 character 7")
        );
        assert_eq!(notice.line_number, Some(1));
        assert_eq!(notice.character_index, Some(11));
    }

    #[test]
    fn mismatch_keeps_the_frame_for_the_real_closer() {
        // '(' ... ']' mismatch (777), then ')' still matches the kept frame.
        let result = check("a (b] c) d");
        assert_eq!(priorities(&result), vec![777, 462]);
    }

    #[test]
    fn begin_conflict_marker_reports_once() {
        let result = check("text\n<<<<<<< HEAD\nours\nmore\n<<<<<<< again");
        let conflicts: Vec<&Notice> = result
            .notice_list
            .iter()
            .filter(|n| n.priority == 993)
            .collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].character_index, Some(5));
        assert_eq!(conflicts[0].message, "Unresolved GIT conflict");
    }

    #[test]
    fn each_conflict_marker_type_reports_independently() {
        let result = check("<<<<<<< a\n======= b\n>>>>>>>> c\n");
        let found: Vec<u16> = priorities(&result)
            .into_iter()
            .filter(|p| *p >= 991 && *p <= 993)
            .collect();
        assert_eq!(found, vec![993, 992, 991]);
    }

    #[test]
    fn conflict_extract_focuses_past_the_marker() {
        let result = check("<<<<<<< HEAD of branch");
        let notice = result
            .notice_list
            .iter()
            .find(|n| n.priority == 993)
            .unwrap();
        // Focus sits halfLength past the marker start, so the extract shows
        // the content after it.
        assert_eq!(notice.extract.as_deref(), Some("<<<<<<<␣HE…"));
    }

    #[test]
    fn unbalanced_pair_counts_are_462() {
        let result = check("one ( two ( three )");
        assert_eq!(priorities(&result), vec![462]);
        let notice = &result.notice_list[0];
        assert_eq!(notice.message, "Mismatched () characters");
        assert_eq!(notice.details.as_deref(), Some("(left=2, right=1)"));
    }

    #[test]
    fn double_quote_pair_uses_priority_162() {
        let result = check("he said “unfinished");
        assert_eq!(priorities(&result), vec![162]);
        assert_eq!(result.notice_list[0].message, "Mismatched “” characters");
    }

    #[test]
    fn single_curly_quotes_are_not_counted() {
        // An apostrophe is a lone '’'; it must not trip pair counting.
        let result = check("it’s Mary’s scroll");
        // The nesting stack does see them though: each '’' is an unmatched
        // closer, but no 462/162 count notice appears.
        assert_eq!(priorities(&result), vec![774, 774]);
    }

    /// Field checker that flags every line it sees.
    struct FlagEveryLine;

    impl FieldChecker for FlagEveryLine {
        fn check_field(
            &self,
            _kind: TextKind,
            _name: &str,
            text: &str,
            _allow_links: bool,
            location: &str,
            _options: &CheckOptions,
        ) -> FieldOutcome {
            FieldOutcome {
                notices: vec![
                    Notice::new(95, "Unexpected trailing space(s)", location)
                        .with_extract(text.chars().take(5).collect::<String>()),
                ],
            }
        }
    }

    #[test]
    fn delegate_notices_are_retagged_with_line_numbers() {
        let result = check_plain_text(
            TextKind::Markdown,
            "intro.md",
            "first\n\n  third",
            "in repo",
            &FlagEveryLine,
            &CheckOptions::default(),
        );
        // Blank line 2 is skipped; lines 1 and 3 are delegated.
        let lines: Vec<Option<usize>> = result
            .notice_list
            .iter()
            .filter(|n| n.priority == 95)
            .map(|n| n.line_number)
            .collect();
        assert_eq!(lines, vec![Some(1), Some(3)]);
        // Leading whitespace was stripped before delegation.
        assert_eq!(
            result.notice_list[1].extract.as_deref(),
            Some("third")
        );
    }

    #[test]
    fn location_names_the_document() {
        let result = check("lonely)");
        assert_eq!(result.notice_list[0].location, " in test.txt in unit test");
    }
}
