//! Interfaces to the per-field and per-row checkers.
//!
//! The whole-document validators in this crate own the *cross*-line and
//! *cross*-row invariants; the finer-grained single-field and single-row
//! checks live elsewhere and are consumed through these traits. Handing in
//! [`NoopFieldChecker`] / [`NoopRowChecker`] runs the structural checks
//! alone, which is also how most tests here drive the validators.

use async_trait::async_trait;

use crate::notice::Notice;
use crate::options::CheckOptions;
use crate::plain_text::TextKind;

/// What a field check returns.
#[derive(Debug, Default)]
pub struct FieldOutcome {
    /// Notices found within the field.
    pub notices: Vec<Notice>,
}

/// Checks one text field (one line, one cell) for local problems such as
/// leading/trailing whitespace or malformed link syntax.
pub trait FieldChecker: Send + Sync {
    /// Check `text` and return any notices.
    ///
    /// `allow_links` permits link syntax in the field; `location` is the
    /// caller's context string to carry into notices.
    fn check_field(
        &self,
        kind: TextKind,
        name: &str,
        text: &str,
        allow_links: bool,
        location: &str,
        options: &CheckOptions,
    ) -> FieldOutcome;
}

/// What a row check returns.
///
/// The aggregate fields report nested cross-document checks the row check
/// performed (e.g. link-target verification); the tabular validator merges
/// them upward.
#[derive(Debug, Default)]
pub struct RowOutcome {
    /// Notices found within the row.
    pub notices: Vec<Notice>,
    /// Number of other files examined while checking this row.
    pub checked_file_count: Option<u32>,
    /// Total size in characters of those files.
    pub checked_filesizes: Option<u64>,
    /// Repositories those files came from.
    pub checked_repo_names: Vec<String>,
    /// Filename extensions of those files.
    pub checked_filename_extensions: Vec<String>,
}

/// Checks one tabular data row field-by-field.
///
/// Async because the row check may verify embedded resource links against a
/// remote [`FileSource`](crate::source::FileSource).
#[async_trait]
pub trait RowChecker: Send + Sync {
    /// Check one raw (still tab-separated) `row`.
    #[allow(clippy::too_many_arguments)]
    async fn check_row(
        &self,
        language_code: &str,
        row: &str,
        book_id: &str,
        chapter: &str,
        verse: &str,
        location: &str,
        options: &CheckOptions,
    ) -> RowOutcome;
}

/// A field checker that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFieldChecker;

impl FieldChecker for NoopFieldChecker {
    fn check_field(
        &self,
        _kind: TextKind,
        _name: &str,
        _text: &str,
        _allow_links: bool,
        _location: &str,
        _options: &CheckOptions,
    ) -> FieldOutcome {
        FieldOutcome::default()
    }
}

/// A row checker that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRowChecker;

#[async_trait]
impl RowChecker for NoopRowChecker {
    async fn check_row(
        &self,
        _language_code: &str,
        _row: &str,
        _book_id: &str,
        _chapter: &str,
        _verse: &str,
        _location: &str,
        _options: &CheckOptions,
    ) -> RowOutcome {
        RowOutcome::default()
    }
}
