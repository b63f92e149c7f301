//! Whole-table annotation checking.
//!
//! Optimised for checking an entire tab-separated annotation file at once,
//! which is what lets it compare each row with the previous one: chapter and
//! verse ordering, duplicate row IDs within a verse, and column-count
//! integrity are all cross-row properties no single-row check can see.
//! Individual rows still go to the caller's [`RowChecker`].
//!
//! Rows are processed strictly in input order with no lookahead beyond the
//! previous row, so the whole pass streams with O(1) state per row.

use crate::canon;
use crate::delegates::RowChecker;
use crate::notice::{CheckResult, Notice};
use crate::options::CheckOptions;
use crate::suppression::SuppressionList;

/// Expected number of tab-separated fields per row.
const EXPECTED_COLUMN_COUNT: usize = 9;

/// The exact header row every annotation table must start with.
const EXPECTED_HEADING: &str =
    "Book\tChapter\tVerse\tID\tSupportReference\tOrigQuote\tOccurrence\tGLQuote\tOccurrenceNote";

/// Parse a chapter/verse token: digits only, no signs or whitespace.
fn parse_number(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Check one whole annotation table.
///
/// `book_id` is a three-character uppercase book identifier (or `OBS`);
/// every notice comes back tagged with it and with `filename`. Nothing here
/// fails: malformed rows, out-of-order references, and duplicate IDs all
/// come back as notices in the returned [`CheckResult`], and row checking
/// continues past every one of them.
#[tracing::instrument(
    skip(table_text, row_checker, options),
    fields(text_len = table_text.len())
)]
pub async fn check_annotation_table(
    language_code: &str,
    book_id: &str,
    filename: &str,
    table_text: &str,
    location: &str,
    row_checker: &dyn RowChecker,
    options: &CheckOptions,
) -> CheckResult {
    let mut our_location = location.to_string();
    if !our_location.is_empty() && !our_location.starts_with(' ') {
        our_location.insert(0, ' ');
    }

    let mut result = CheckResult::default();
    let tag = |notice: Notice| notice.with_book_id(book_id).with_filename(filename);

    let lowercase_book_id = book_id.to_ascii_lowercase();
    // Unknown books degrade to zero chapters rather than aborting; every
    // numeric chapter then reports as too large, which is the best signal
    // available without metadata.
    let num_chapters = canon::chapters_in_book(&lowercase_book_id)
        .map_or(0, |verses| verses.len() as u32);
    if num_chapters == 0 && !canon::is_valid_book_id(book_id) {
        result.add_notice(tag(
            Notice::new(
                747,
                "Bad function call: should be given a valid book abbreviation",
                format!(" (not '{book_id}'){our_location}"),
            )
            .with_extract(book_id),
        ));
    }

    let lines: Vec<&str> = table_text.split('\n').collect();

    let mut last_book = "";
    let mut last_chapter = "";
    let mut last_verse = "";
    let mut row_id_list: Vec<String> = Vec::new();
    let mut unique_row_list: Vec<String> = Vec::new();
    let mut num_verses_this_chapter: Option<u32> = None;

    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        if index == 0 {
            if *line == EXPECTED_HEADING {
                result.add_success(format!("Checked TSV header{our_location}"));
            } else {
                result.add_notice(tag(
                    Notice::new(746, "Bad TSV header", format!("{our_location}: '{line}'"))
                        .with_line_number(line_number),
                ));
            }
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != EXPECTED_COLUMN_COUNT {
            // A final line terminator leaves one empty trailing line; that
            // is normal, not a malformed row.
            let is_trailing_terminator = index == lines.len() - 1 && line.is_empty();
            if !is_trailing_terminator {
                let chapter = fields.get(1).copied().unwrap_or("?");
                let verse = fields.get(2).copied().unwrap_or("?");
                let row_id = fields.get(3).copied().unwrap_or("????");
                result.add_notice(tag(
                    Notice::new(
                        988,
                        format!("Wrong number of tabbed fields (expected {EXPECTED_COLUMN_COUNT})"),
                        &our_location,
                    )
                    .with_extract(format!(
                        "Found {} field{}",
                        fields.len(),
                        if fields.len() == 1 { "" } else { "s" }
                    ))
                    .with_chapter_verse(chapter, verse)
                    .with_row_id(row_id)
                    .with_line_number(line_number),
                ));
            }
            continue;
        }

        let book = fields[0];
        let chapter = fields[1];
        let verse = fields[2];
        let row_id = fields[3];
        let support_reference = fields[4];
        let orig_quote = fields[5];
        let occurrence = fields[6];

        // The row check does the per-field work (and possibly nested link
        // verification against other repositories).
        let row_outcome = row_checker
            .check_row(
                language_code,
                line,
                book_id,
                chapter,
                verse,
                &our_location,
                options,
            )
            .await;
        for notice in row_outcome.notices {
            if notice.is_nested() {
                // An indirect check of some other document; its tags are
                // already right, so pass it through untouched.
                result.add_notice(notice);
            } else {
                result.add_notice(tag(notice.with_line_number(line_number)));
            }
        }
        result.add_checked_file_count(row_outcome.checked_file_count.unwrap_or(0));
        result.add_checked_filesizes(row_outcome.checked_filesizes.unwrap_or(0));
        for repo_name in &row_outcome.checked_repo_names {
            result.note_checked_repo_name(repo_name);
        }
        for extension in &row_outcome.checked_filename_extensions {
            result.note_checked_filename_extension(extension);
        }

        // IDs only need to be unique within a verse; so do whole-row keys.
        if book != last_book || chapter != last_chapter || verse != last_verse {
            row_id_list.clear();
            unique_row_list.clear();
        }

        // Duplicate whole annotations (same reference, quote, occurrence)
        // are tracked but not yet reported: the consuming app cannot render
        // the duplicates, so the notice site is reserved until it can.
        let unique_id = format!("{chapter}{verse}{support_reference}{orig_quote}{occurrence}");
        unique_row_list.push(unique_id);

        if book.is_empty() {
            result.add_notice(tag(
                Notice::new(744, "Missing book identifier", &our_location)
                    .with_chapter_verse(chapter, verse)
                    .with_row_id(row_id)
                    .with_line_number(line_number),
            ));
        } else if book != book_id {
            result.add_notice(tag(
                Notice::new(
                    745,
                    format!("Wrong '{book}' book identifier (expected '{book_id}')"),
                    &our_location,
                )
                .with_chapter_verse(chapter, verse)
                .with_row_id(row_id)
                .with_line_number(line_number),
            ));
        }

        if chapter.is_empty() {
            result.add_notice(tag(
                Notice::new(
                    739,
                    "Missing chapter number",
                    format!(" after {last_chapter}:{verse}{our_location}"),
                )
                .with_chapter_verse(chapter, verse)
                .with_row_id(row_id)
                .with_line_number(line_number),
            ));
        } else if chapter != "front" {
            if let Some(chapter_int) = parse_number(chapter) {
                if chapter != last_chapter {
                    num_verses_this_chapter =
                        canon::verses_in_chapter(&lowercase_book_id, chapter_int).map(u32::from);
                }
                if chapter_int == 0 {
                    result.add_notice(tag(
                        Notice::new(551, "Invalid zero chapter number", &our_location)
                            .with_chapter_verse(chapter, verse)
                            .with_row_id(row_id)
                            .with_extract(chapter)
                            .with_line_number(line_number),
                    ));
                }
                if chapter_int > num_chapters {
                    result.add_notice(tag(
                        Notice::new(737, "Invalid large chapter number", &our_location)
                            .with_chapter_verse(chapter, verse)
                            .with_row_id(row_id)
                            .with_extract(chapter)
                            .with_line_number(line_number),
                    ));
                }
                if let Some(last_chapter_int) = parse_number(last_chapter) {
                    if chapter_int < last_chapter_int {
                        result.add_notice(tag(
                            Notice::new(736, "Receding chapter number", &our_location)
                                .with_details(format!("'{chapter}' after '{last_chapter}'"))
                                .with_chapter_verse(chapter, verse)
                                .with_row_id(row_id)
                                .with_line_number(line_number),
                        ));
                    } else if chapter_int > last_chapter_int + 1 {
                        result.add_notice(tag(
                            Notice::new(735, "Advancing chapter number", &our_location)
                                .with_details(format!("'{chapter}' after '{last_chapter}'"))
                                .with_chapter_verse(chapter, verse)
                                .with_row_id(row_id)
                                .with_line_number(line_number),
                        ));
                    }
                }
            } else {
                result.add_notice(tag(
                    Notice::new(734, "Bad chapter number", &our_location)
                        .with_chapter_verse(chapter, verse)
                        .with_row_id(row_id)
                        .with_line_number(line_number),
                ));
            }
        }

        if verse.is_empty() {
            result.add_notice(tag(
                Notice::new(
                    790,
                    "Missing verse number",
                    format!(" after {chapter}:{last_verse}{our_location}"),
                )
                .with_chapter_verse(chapter, verse)
                .with_row_id(row_id)
                .with_line_number(line_number),
            ));
        } else if verse != "intro" {
            if let Some(verse_int) = parse_number(verse) {
                if verse_int == 0 {
                    result.add_notice(tag(
                        Notice::new(552, "Invalid zero verse number", &our_location)
                            .with_details(format!("for chapter {chapter}"))
                            .with_chapter_verse(chapter, verse)
                            .with_row_id(row_id)
                            .with_extract(verse)
                            .with_line_number(line_number),
                    ));
                }
                if num_verses_this_chapter.is_some_and(|limit| verse_int > limit) {
                    // Shares priority 734 with bad chapter numbers; the code
                    // is load-bearing for downstream triage tables, so it
                    // stays until a coordinated renumber.
                    result.add_notice(tag(
                        Notice::new(734, "Invalid large verse number", &our_location)
                            .with_details(format!("for chapter {chapter}"))
                            .with_chapter_verse(chapter, verse)
                            .with_row_id(row_id)
                            .with_extract(verse)
                            .with_line_number(line_number),
                    ));
                }
                if let Some(last_verse_int) = parse_number(last_verse)
                    && chapter == last_chapter
                    && verse_int < last_verse_int
                {
                    result.add_notice(tag(
                        Notice::new(733, "Receding verse number", &our_location)
                            .with_details(format!(
                                "'{verse}' after '{last_verse}' for chapter {chapter}"
                            ))
                            .with_chapter_verse(chapter, verse)
                            .with_row_id(row_id)
                            .with_extract(verse)
                            .with_line_number(line_number),
                    ));
                }
            } else {
                result.add_notice(tag(
                    Notice::new(738, "Bad verse number", &our_location)
                        .with_chapter_verse(chapter, verse)
                        .with_row_id(row_id)
                        .with_line_number(line_number),
                ));
            }
        }

        if row_id.is_empty() {
            result.add_notice(tag(
                Notice::new(730, "Missing ID", &our_location)
                    .with_chapter_verse(chapter, verse)
                    .with_field_name("ID")
                    .with_line_number(line_number),
            ));
        } else {
            if row_id_list.iter().any(|known| known == row_id) {
                result.add_notice(tag(
                    Notice::new(729, format!("Duplicate '{row_id}' ID"), &our_location)
                        .with_chapter_verse(chapter, verse)
                        .with_field_name("ID")
                        .with_row_id(row_id)
                        .with_line_number(line_number),
                ));
            }
            row_id_list.push(row_id.to_string());
        }

        last_book = book;
        last_chapter = chapter;
        last_verse = verse;
    }

    if !options.suppress_notice_disabling {
        result.notice_list = SuppressionList::standard().filter(&result.notice_list);
    }

    if options.cutoff_priority_level.is_none_or(|cutoff| cutoff < 20)
        && options.disable_all_link_fetching
    {
        result.add_notice(tag(Notice::new(
            20,
            "Note that 'disable_all_link_fetching' was set so link targets were not checked",
            &our_location,
        )));
    }

    let data_lines = lines.len() - 1;
    result.add_success(format!(
        "Checked all {} data line{}{}.",
        data_lines,
        if data_lines == 1 { "" } else { "s" },
        our_location
    ));
    let notice_count = result.notice_list.len();
    result.add_success(format!(
        "Annotation table check finished with {} notice{}",
        if notice_count == 0 {
            "zero".to_string()
        } else {
            notice_count.to_string()
        },
        if notice_count == 1 { "" } else { "s" }
    ));
    result
}
