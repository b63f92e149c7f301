//! The notice data model.
//!
//! A [`Notice`] is the atomic diagnostic record every checker emits: a
//! priority, a stable classification message, and a human-readable location,
//! plus whatever context the emitting layer can attach. Checkers return a
//! [`CheckResult`] — success messages and notices together — rather than a
//! pass/fail verdict, so downstream consumers can rank, group, and filter.
//!
//! The serialized field names (`characterIndex`, `bookID`, `C`, `V`, …) are
//! the interchange format existing aggregation tooling parses; they must not
//! change.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One structured diagnostic record.
///
/// `priority`, `message`, and `location` are required on every notice —
/// [`Notice::new`] enforces the contract by construction. Context fields are
/// attached by whichever layer knows them (`with_*` methods) as the notice
/// propagates upward; they are only ever added, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notice {
    /// Rule severity/rank, 1–999; lower numbers are more severe.
    ///
    /// Hand-assigned per rule site and stable across releases — suppression
    /// tables and downstream triage key on it.
    pub priority: u16,
    /// Short classification string, stable across occurrences of a rule.
    pub message: String,
    /// Optional longer elaboration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Human-readable description of where the issue was found.
    pub location: String,
    /// 0-based character offset into the line or field.
    #[serde(
        rename = "characterIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub character_index: Option<usize>,
    /// Short text window around the issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,
    /// 1-based line number within the checked document.
    #[serde(rename = "lineNumber", default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    /// Book identifier the notice belongs to.
    #[serde(rename = "bookID", default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    /// Chapter token (kept verbatim — may be `front` or a number).
    #[serde(rename = "C", default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    /// Verse token (kept verbatim — may be `intro` or a number).
    #[serde(rename = "V", default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<String>,
    /// Row identifier from tabular data.
    #[serde(rename = "rowID", default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    /// Name of the field the notice refers to.
    #[serde(rename = "fieldName", default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    /// Filename the notice was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Repository name, attached by repo-level callers.
    #[serde(rename = "repoName", default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    /// Repository owner, attached by repo-level callers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Marks a notice that came from a nested check of *another* document.
    ///
    /// Enclosing layers must pass such notices through untouched instead of
    /// re-tagging them with their own line/field context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl Notice {
    /// Create a notice with the three required fields set.
    pub fn new(priority: u16, message: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            priority,
            message: message.into(),
            details: None,
            location: location.into(),
            character_index: None,
            extract: None,
            line_number: None,
            book_id: None,
            chapter: None,
            verse: None,
            row_id: None,
            field_name: None,
            filename: None,
            repo_name: None,
            username: None,
            extra: None,
        }
    }

    /// Attach an elaboration.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach a 0-based character offset.
    pub const fn with_character_index(mut self, index: usize) -> Self {
        self.character_index = Some(index);
        self
    }

    /// Attach an extract window.
    pub fn with_extract(mut self, extract: impl Into<String>) -> Self {
        self.extract = Some(extract.into());
        self
    }

    /// Attach (or overwrite) a 1-based line number.
    pub const fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Attach a book identifier.
    pub fn with_book_id(mut self, book_id: impl Into<String>) -> Self {
        self.book_id = Some(book_id.into());
        self
    }

    /// Attach chapter and verse tokens.
    pub fn with_chapter_verse(mut self, chapter: impl Into<String>, verse: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self.verse = Some(verse.into());
        self
    }

    /// Attach a row identifier.
    pub fn with_row_id(mut self, row_id: impl Into<String>) -> Self {
        self.row_id = Some(row_id.into());
        self
    }

    /// Attach a field name.
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Attach a filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Returns `true` if this notice originated from a nested check of
    /// another document.
    pub const fn is_nested(&self) -> bool {
        self.extra.is_some()
    }
}

/// The return shape of a whole-document checker.
///
/// `success_list` records what *was* checked, so "no notices" and "not
/// checked" stay distinguishable. Aggregate counters accumulate upward from
/// nested checks performed during link resolution; callers merge rather than
/// overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    /// Ordered success messages.
    #[serde(rename = "successList", default)]
    pub success_list: Vec<String>,
    /// Ordered notices.
    #[serde(rename = "noticeList", default)]
    pub notice_list: Vec<Notice>,
    /// Number of files examined by nested checks.
    #[serde(
        rename = "checkedFileCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub checked_file_count: Option<u32>,
    /// Total size in characters of files examined by nested checks.
    #[serde(
        rename = "checkedFilesizes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub checked_filesizes: Option<u64>,
    /// Repositories touched by nested checks, in order of first appearance.
    #[serde(
        rename = "checkedRepoNames",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub checked_repo_names: Option<Vec<String>>,
    /// Filename extensions examined by nested checks, in order of first
    /// appearance.
    #[serde(
        rename = "checkedFilenameExtensions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub checked_filename_extensions: Option<Vec<String>>,
}

impl CheckResult {
    /// Append a success message.
    pub fn add_success(&mut self, message: impl Into<String>) {
        self.success_list.push(message.into());
    }

    /// Append a notice.
    pub fn add_notice(&mut self, notice: Notice) {
        self.notice_list.push(notice);
    }

    /// Add to the checked-file counter, initialising it on first use.
    pub fn add_checked_file_count(&mut self, count: u32) {
        if count > 0 {
            *self.checked_file_count.get_or_insert(0) += count;
        }
    }

    /// Add to the checked-filesize counter, initialising it on first use.
    pub fn add_checked_filesizes(&mut self, size: u64) {
        if size > 0 {
            *self.checked_filesizes.get_or_insert(0) += size;
        }
    }

    /// Record a repository touched by a nested check, keeping first-seen
    /// order and dropping duplicates.
    pub fn note_checked_repo_name(&mut self, name: &str) {
        let names = self.checked_repo_names.get_or_insert_with(Vec::new);
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    /// Record a filename extension examined by a nested check, keeping
    /// first-seen order and dropping duplicates.
    pub fn note_checked_filename_extension(&mut self, extension: &str) {
        let extensions = self.checked_filename_extensions.get_or_insert_with(Vec::new);
        if !extensions.iter().any(|e| e == extension) {
            extensions.push(extension.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_attaches_context() {
        let notice = Notice::new(777, "closing character doesn't match", " in test")
            .with_details("'(' opened on line 2 character 5")
            .with_line_number(3)
            .with_character_index(7)
            .with_extract("…abc)def…");
        assert_eq!(notice.priority, 777);
        assert_eq!(notice.line_number, Some(3));
        assert_eq!(notice.character_index, Some(7));
        assert!(!notice.is_nested());
    }

    #[test]
    fn retagging_overwrites_line_number() {
        let notice = Notice::new(95, "Unexpected trailing space(s)", " in x").with_line_number(1);
        let retagged = notice.with_line_number(9);
        assert_eq!(retagged.line_number, Some(9));
    }

    #[test]
    fn wire_format_field_names_are_stable() {
        let notice = Notice::new(729, "Duplicate 'abc4' ID", " in en_tn_66-REV.tsv")
            .with_book_id("REV")
            .with_chapter_verse("3", "11")
            .with_row_id("abc4")
            .with_field_name("ID")
            .with_line_number(17);
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["bookID"], "REV");
        assert_eq!(json["C"], "3");
        assert_eq!(json["V"], "11");
        assert_eq!(json["rowID"], "abc4");
        assert_eq!(json["fieldName"], "ID");
        assert_eq!(json["lineNumber"], 17);
        // Absent optionals stay off the wire entirely.
        assert!(json.get("extract").is_none());
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn aggregate_merge_sums_and_unions() {
        let mut result = CheckResult::default();
        assert_eq!(result.checked_file_count, None);

        result.add_checked_file_count(2);
        result.add_checked_file_count(1);
        result.add_checked_filesizes(100);
        result.note_checked_repo_name("en_ta");
        result.note_checked_repo_name("en_tw");
        result.note_checked_repo_name("en_ta");
        result.note_checked_filename_extension("md");

        assert_eq!(result.checked_file_count, Some(3));
        assert_eq!(result.checked_filesizes, Some(100));
        assert_eq!(
            result.checked_repo_names,
            Some(vec!["en_ta".to_string(), "en_tw".to_string()])
        );
        assert_eq!(
            result.checked_filename_extensions,
            Some(vec!["md".to_string()])
        );
    }

    #[test]
    fn zero_aggregates_leave_fields_unset() {
        let mut result = CheckResult::default();
        result.add_checked_file_count(0);
        result.add_checked_filesizes(0);
        assert_eq!(result.checked_file_count, None);
        assert_eq!(result.checked_filesizes, None);
    }
}
