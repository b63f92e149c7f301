//! Resource-link verification.
//!
//! Annotation note fields embed three kinds of cross-document references:
//!
//! - manual articles, `[[rc://en/ta/man/translate/figs-metaphor]]`
//! - term articles, `[[rc://en/tw/dict/bible/other/death]]`
//! - scripture cross-references, `[Revelation 3:11](../03/11.md)`
//!
//! This module extracts every occurrence of each kind and proves the targets
//! exist: article links are fetched through the caller's
//! [`FileSource`](crate::source::FileSource), scripture references are
//! range-checked against the canon. Fetches are awaited one at a time, in
//! the order the matches appear — consumers snapshot notice order for
//! deduplication, so no concurrency is introduced here.
//!
//! A fetch failure is a finding about the document, not a failure of the
//! check: it is logged, converted into a notice, and never propagated.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::canon;
use crate::notice::Notice;
use crate::options::CheckOptions;
use crate::source::{FileSource, FileSpec};
use crate::text;

/// Which note field the links were found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LinkFieldKind {
    /// The `OccurrenceNote` column of a translation-notes table.
    OccurrenceNote,
    /// The free-form annotation field of newer table layouts.
    Annotation,
}

impl LinkFieldKind {
    /// The field name as it appears in notices.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OccurrenceNote => "OccurrenceNote",
            Self::Annotation => "Annotation",
        }
    }
}

impl std::fmt::Display for LinkFieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static TA_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[rc://([^ /]+?)/ta/man/([^ /]+?)/([^ \]]+?)\]\]").expect("valid regex")
});

static TW_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[rc://([^ /]+?)/tw/dict/bible/([^ /]+?)/([^ \]]+?)\]\]").expect("valid regex")
});

static BIBLE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\w+?) (\d{1,3}):(\d{1,3})\]\((.{2,3})/(\d{1,3})/(\d{1,3})\.md\)")
        .expect("valid regex")
});

/// Articles shorter than this are reported as effectively empty.
const MINIMUM_ARTICLE_LENGTH: usize = 10;

/// Verify every resource link embedded in one note field.
///
/// Returns notices only (no success list): this is a sub-check invoked from
/// within a row or field check, not a top-level entry point. Every notice
/// carries `bookID` and `fieldName` already attached.
#[tracing::instrument(skip(field_text, source, options), fields(text_len = field_text.len()))]
pub async fn check_embedded_links(
    book_id: &str,
    field_kind: LinkFieldKind,
    field_text: &str,
    location: &str,
    source: &dyn FileSource,
    options: &CheckOptions,
) -> Vec<Notice> {
    let mut our_location = location.to_string();
    if !our_location.is_empty() && !our_location.starts_with(' ') {
        our_location.insert(0, ' ');
    }

    let (extract_length, _) = options.effective_extract_length();
    let field_chars: Vec<char> = field_text.chars().collect();
    let default_language = options.effective_language_code();

    let mut notices: Vec<Notice> = Vec::new();

    // Manual article links, e.g. [[rc://en/ta/man/translate/figs-metaphor]].
    for caps in TA_LINK.captures_iter(field_text) {
        let whole = caps.get(0).expect("match");
        let mut language_code = caps.get(1).expect("group").as_str();
        if language_code != "*" {
            // Seven characters past the match start lands on the language code.
            let character_index = char_index(field_text, whole.start()) + 7;
            notices.push(tag(
                Notice::new(
                    450,
                    "Resource container link should have '*' language code",
                    &our_location,
                )
                .with_details(format!("(not '{language_code}')"))
                .with_character_index(character_index)
                .with_extract(text::extract_window(
                    &field_chars,
                    character_index,
                    extract_length,
                )),
                book_id,
                field_kind,
            ));
            // fall through: still verify the target under the named language
        } else {
            language_code = default_language;
        }
        let repository = format!("{language_code}_ta");
        let filepath = format!("{}/{}/01.md", &caps[2], &caps[3]);
        let spec = FileSpec::new(
            options.effective_ta_username(),
            &repository,
            &filepath,
            options.effective_ta_branch(),
        );
        match source.get_file(&spec).await {
            Ok(content) if content.is_empty() => notices.push(tag(
                Notice::new(
                    886,
                    format!("Unable to find {field_kind} TA link"),
                    format!("{our_location} {filepath}"),
                )
                .with_extract(whole.as_str()),
                book_id,
                field_kind,
            )),
            Ok(content) if content.chars().count() < MINIMUM_ARTICLE_LENGTH => notices.push(tag(
                Notice::new(
                    884,
                    format!("Linked {field_kind} TA article seems empty"),
                    format!("{our_location} {filepath}"),
                )
                .with_extract(whole.as_str()),
                book_id,
                field_kind,
            )),
            Ok(_) => {}
            Err(error) => {
                tracing::error!(%spec, %error, "failed to load TA link target");
                notices.push(tag(
                    Notice::new(
                        885,
                        format!("Error loading {field_kind} TA link"),
                        format!("{our_location} {filepath}: {error}"),
                    )
                    .with_extract(whole.as_str()),
                    book_id,
                    field_kind,
                ));
            }
        }
    }

    // Term article links, e.g. [[rc://en/tw/dict/bible/other/death]].
    for caps in TW_LINK.captures_iter(field_text) {
        let whole = caps.get(0).expect("match");
        let mut language_code = caps.get(1).expect("group").as_str();
        if language_code == "*" {
            language_code = default_language;
        }
        let repository = format!("{language_code}_tw");
        let filepath = format!("bible/{}/{}.md", &caps[2], &caps[3]);
        let spec = FileSpec::new(
            options.effective_tw_username(),
            &repository,
            &filepath,
            options.effective_tw_branch(),
        );
        match source.get_file(&spec).await {
            Ok(content) if content.is_empty() => notices.push(tag(
                Notice::new(
                    883,
                    format!("Unable to find {field_kind} TW link"),
                    format!("{our_location} {filepath}"),
                )
                .with_extract(whole.as_str()),
                book_id,
                field_kind,
            )),
            Ok(content) if content.chars().count() < MINIMUM_ARTICLE_LENGTH => notices.push(tag(
                Notice::new(
                    881,
                    format!("Linked {field_kind} TW article seems empty"),
                    format!("{our_location} {filepath}"),
                )
                .with_extract(whole.as_str()),
                book_id,
                field_kind,
            )),
            Ok(_) => {}
            Err(error) => {
                tracing::error!(%spec, %error, "failed to load TW link target");
                notices.push(tag(
                    Notice::new(
                        882,
                        format!("Error loading {field_kind} TW link"),
                        format!("{our_location} {filepath}: {error}"),
                    )
                    .with_extract(whole.as_str()),
                    book_id,
                    field_kind,
                ));
            }
        }
    }

    // Scripture cross-references, e.g. [Revelation 3:11](../03/11.md).
    for caps in BIBLE_LINK.captures_iter(field_text) {
        let total_link = caps.get(0).expect("match").as_str();
        let display_name = &caps[1];
        let link_book_code = if &caps[4] == ".." { book_id } else { caps.get(4).expect("group").as_str() };

        if default_language == "en" {
            // Only the English book-name table is bundled.
            if canon::is_good_english_book_name(display_name) != Some(true) {
                notices.push(tag(
                    Notice::new(143, "Unknown Bible book name in link", &our_location)
                        .with_extract(display_name),
                    book_id,
                    field_kind,
                ));
            }
        }

        let chapter_int: Option<u32> = caps[5].parse().ok();
        let verse_int: Option<u32> = caps[6].parse().ok();

        if let (Ok(display_chapter), Some(target_chapter)) =
            (caps[2].parse::<u32>(), chapter_int)
            && display_chapter != target_chapter
        {
            notices.push(tag(
                Notice::new(
                    743,
                    "Chapter numbers of markdown Bible link don't match",
                    &our_location,
                )
                .with_extract(total_link),
                book_id,
                field_kind,
            ));
        }
        if let (Ok(display_verse), Some(target_verse)) = (caps[3].parse::<u32>(), verse_int)
            && display_verse != target_verse
        {
            notices.push(tag(
                Notice::new(
                    742,
                    "Verse numbers of markdown Bible link don't match",
                    &our_location,
                )
                .with_extract(total_link),
                book_id,
                field_kind,
            ));
        }

        let lowercase_book = link_book_code.to_ascii_lowercase();
        let num_chapters = canon::chapters_in_book(&lowercase_book).map(|v| v.len() as u32);
        let num_verses = chapter_int
            .and_then(|c| canon::verses_in_chapter(&lowercase_book, c))
            .map(u32::from);

        let chapter_in_range = match chapter_int {
            None | Some(0) => false,
            Some(c) => num_chapters.is_none_or(|n| c <= n),
        };
        if !chapter_in_range {
            notices.push(tag(
                Notice::new(655, "Bad chapter number in markdown Bible link", &our_location)
                    .with_extract(total_link),
                book_id,
                field_kind,
            ));
        } else {
            let verse_in_range = match verse_int {
                None | Some(0) => false,
                Some(v) => num_verses.is_none_or(|n| v <= n),
            };
            if !verse_in_range {
                notices.push(tag(
                    Notice::new(653, "Bad verse number in markdown Bible link", &our_location)
                        .with_extract(total_link),
                    book_id,
                    field_kind,
                ));
            }
        }
    }

    notices
}

/// Attach the tags every resolver notice carries.
fn tag(notice: Notice, book_id: &str, field_kind: LinkFieldKind) -> Notice {
    notice
        .with_book_id(book_id)
        .with_field_name(field_kind.as_str())
}

/// Convert a byte offset from the regex engine into a character index.
fn char_index(full_text: &str, byte_index: usize) -> usize {
    full_text[..byte_index].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, FetchResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory file source keyed by path, recording the order of requests.
    #[derive(Default)]
    struct StubSource {
        files: HashMap<String, String>,
        failing: Vec<String>,
        requests: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.to_string(), content.to_string());
            self
        }

        fn with_failure(mut self, path: &str) -> Self {
            self.failing.push(path.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FileSource for StubSource {
        async fn get_file(&self, spec: &FileSpec) -> FetchResult<String> {
            self.requests.lock().unwrap().push(spec.path.clone());
            if self.failing.contains(&spec.path) {
                return Err(FetchError::Transport(format!("simulated error for {spec}")));
            }
            self.files
                .get(&spec.path)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(spec.to_string()))
        }
    }

    async fn check(text: &str, source: &StubSource) -> Vec<Notice> {
        check_embedded_links(
            "REV",
            LinkFieldKind::OccurrenceNote,
            text,
            "in unit test",
            source,
            &CheckOptions::default(),
        )
        .await
    }

    fn priorities(notices: &[Notice]) -> Vec<u16> {
        notices.iter().map(|n| n.priority).collect()
    }

    #[tokio::test]
    async fn wildcard_ta_link_with_healthy_target_is_clean() {
        let source = StubSource::default().with_file(
            "translate/figs-metaphor/01.md",
            "A metaphor is a figure of speech in which one thing stands for another.",
        );
        let notices = check("See [[rc://*/ta/man/translate/figs-metaphor]]", &source).await;
        assert!(notices.is_empty());
        assert_eq!(source.requests(), vec!["translate/figs-metaphor/01.md"]);
    }

    #[tokio::test]
    async fn explicit_language_code_gets_450_but_still_verifies() {
        let source = StubSource::default().with_file(
            "translate/figs-metaphor/01.md",
            "A metaphor is a figure of speech in which one thing stands for another.",
        );
        let notices = check("See [[rc://en/ta/man/translate/figs-metaphor]]", &source).await;
        assert_eq!(priorities(&notices), vec![450]);
        let notice = &notices[0];
        assert_eq!(notice.details.as_deref(), Some("(not 'en')"));
        assert_eq!(notice.character_index, Some(11));
        // The target still got fetched and passed, so no 884/885/886.
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn ta_fetch_failure_is_exactly_one_885() {
        let source = StubSource::default().with_failure("translate/figs-metaphor/01.md");
        let notices = check("See [[rc://*/ta/man/translate/figs-metaphor]]", &source).await;
        assert_eq!(priorities(&notices), vec![885]);
        let notice = &notices[0];
        assert!(notice.location.contains("translate/figs-metaphor/01.md"));
        assert!(notice.location.contains("simulated error"));
        assert_eq!(
            notice.extract.as_deref(),
            Some("[[rc://*/ta/man/translate/figs-metaphor]]")
        );
    }

    #[tokio::test]
    async fn empty_and_stub_articles_are_distinguished() {
        let source = StubSource::default()
            .with_file("translate/figs-metaphor/01.md", "")
            .with_file("translate/figs-simile/01.md", "Short.");
        let notices = check(
            "[[rc://*/ta/man/translate/figs-metaphor]] and [[rc://*/ta/man/translate/figs-simile]]",
            &source,
        )
        .await;
        assert_eq!(priorities(&notices), vec![886, 884]);
    }

    #[tokio::test]
    async fn tw_outcomes_use_their_own_priorities() {
        let source = StubSource::default()
            .with_file("bible/other/death.md", "")
            .with_file("bible/kt/grace.md", "Grace.")
            .with_failure("bible/names/paul.md");
        let notices = check(
            "[[rc://*/tw/dict/bible/other/death]] [[rc://*/tw/dict/bible/kt/grace]] [[rc://*/tw/dict/bible/names/paul]]",
            &source,
        )
        .await;
        // One notice per link: not found, too short, fetch error.
        assert_eq!(priorities(&notices), vec![883, 881, 882]);
    }

    #[tokio::test]
    async fn tw_target_repository_follows_the_link_language() {
        let source = StubSource::default().with_file(
            "bible/other/death.md",
            "Death is the end of physical life.",
        );
        let notices = check_embedded_links(
            "REV",
            LinkFieldKind::Annotation,
            "[[rc://hi/tw/dict/bible/other/death]]",
            "in unit test",
            &source,
            &CheckOptions::default(),
        )
        .await;
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn fetches_happen_in_source_order_one_at_a_time() {
        let source = StubSource::default()
            .with_failure("translate/figs-metaphor/01.md")
            .with_failure("bible/other/death.md");
        let notices = check(
            "[[rc://*/ta/man/translate/figs-metaphor]] then [[rc://*/tw/dict/bible/other/death]]",
            &source,
        )
        .await;
        assert_eq!(priorities(&notices), vec![885, 882]);
        assert_eq!(
            source.requests(),
            vec!["translate/figs-metaphor/01.md", "bible/other/death.md"]
        );
    }

    #[tokio::test]
    async fn valid_bible_cross_reference_is_clean() {
        let source = StubSource::default();
        let notices = check("as you translated in [Revelation 3:11](../03/11.md).", &source).await;
        assert!(notices.is_empty());
        // No fetching for scripture references.
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_verse_is_653() {
        let source = StubSource::default();
        let notices = check("see [Revelation 3:999](../03/999.md)", &source).await;
        assert_eq!(priorities(&notices), vec![653]);
        assert_eq!(
            notices[0].extract.as_deref(),
            Some("[Revelation 3:999](../03/999.md)")
        );
    }

    #[tokio::test]
    async fn out_of_range_chapter_is_655_and_masks_verse_check() {
        let source = StubSource::default();
        let notices = check("see [Revelation 99:1](../99/1.md)", &source).await;
        assert_eq!(priorities(&notices), vec![655]);
    }

    #[tokio::test]
    async fn mismatched_halves_are_743_and_742() {
        let source = StubSource::default();
        let notices = check("see [Revelation 3:11](../04/11.md)", &source).await;
        assert_eq!(priorities(&notices), vec![743]);
        let notices = check("see [Revelation 3:11](../03/12.md)", &source).await;
        assert_eq!(priorities(&notices), vec![742]);
    }

    #[tokio::test]
    async fn unknown_english_book_name_is_143() {
        let source = StubSource::default();
        let notices = check("see [Revelatio 3:11](../03/11.md)", &source).await;
        assert_eq!(priorities(&notices), vec![143]);
        assert_eq!(notices[0].extract.as_deref(), Some("Revelatio"));
    }

    #[tokio::test]
    async fn explicit_book_code_resolves_against_that_book() {
        let source = StubSource::default();
        let notices = check("see [Titus 1:5](tit/01/05.md)", &source).await;
        assert!(notices.is_empty());
        // Titus has no chapter 9.
        let notices = check("see [Titus 9:5](tit/09/05.md)", &source).await;
        assert_eq!(priorities(&notices), vec![655]);
    }

    #[tokio::test]
    async fn every_notice_is_tagged_with_book_and_field() {
        let source = StubSource::default().with_failure("translate/figs-metaphor/01.md");
        let notices = check("[[rc://en/ta/man/translate/figs-metaphor]]", &source).await;
        assert_eq!(priorities(&notices), vec![450, 885]);
        for notice in &notices {
            assert_eq!(notice.book_id.as_deref(), Some("REV"));
            assert_eq!(notice.field_name.as_deref(), Some("OccurrenceNote"));
        }
    }
}
