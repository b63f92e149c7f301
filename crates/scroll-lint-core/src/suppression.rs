//! Notice suppression.
//!
//! Some rule sites fire on content that human triage has already judged
//! acceptable — upstream tooling quirks, stylistic choices in stable
//! resources, checks the consuming app cannot act on yet. Rather than
//! disabling the rule for everyone, a [`SuppressionList`] drops the already
//! triaged notices on their way out.
//!
//! Matching is conjunctive and partial: a [`DisabledNotice`] names any subset
//! of notice fields, and a notice is suppressed when *every* named field is
//! present and exactly equal. A rule carrying only `{priority}` therefore
//! suppresses every notice with that priority, wherever it came from — keep
//! entries as specific as the false positive requires and no more.
//!
//! Suppressing by filename or line number is only sensible for resources
//! that rarely move, e.g. completed book packages.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::notice::Notice;

/// A partial notice pattern; any subset of fields may be given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisabledNotice {
    /// Required priority, if constrained.
    pub priority: Option<u16>,
    /// Required message, if constrained.
    pub message: Option<String>,
    /// Required details, if constrained.
    pub details: Option<String>,
    /// Required location, if constrained.
    pub location: Option<String>,
    /// Required character index, if constrained.
    pub character_index: Option<usize>,
    /// Required extract, if constrained.
    pub extract: Option<String>,
    /// Required line number, if constrained.
    pub line_number: Option<usize>,
    /// Required book identifier, if constrained.
    pub book_id: Option<String>,
    /// Required chapter token, if constrained.
    pub chapter: Option<String>,
    /// Required verse token, if constrained.
    pub verse: Option<String>,
    /// Required row identifier, if constrained.
    pub row_id: Option<String>,
    /// Required field name, if constrained.
    pub field_name: Option<String>,
    /// Required filename, if constrained.
    pub filename: Option<String>,
    /// Required repository name, if constrained.
    pub repo_name: Option<String>,
    /// Required repository owner, if constrained.
    pub username: Option<String>,
}

impl DisabledNotice {
    /// Returns `true` if every field this rule names is present on `notice`
    /// with an exactly equal value.
    fn matches(&self, notice: &Notice) -> bool {
        fn opt<T: PartialEq>(rule: Option<&T>, value: Option<&T>) -> bool {
            rule.is_none_or(|r| value == Some(r))
        }

        self.priority.is_none_or(|p| p == notice.priority)
            && self.message.as_ref().is_none_or(|m| *m == notice.message)
            && self.location.as_ref().is_none_or(|l| *l == notice.location)
            && opt(self.details.as_ref(), notice.details.as_ref())
            && opt(self.character_index.as_ref(), notice.character_index.as_ref())
            && opt(self.extract.as_ref(), notice.extract.as_ref())
            && opt(self.line_number.as_ref(), notice.line_number.as_ref())
            && opt(self.book_id.as_ref(), notice.book_id.as_ref())
            && opt(self.chapter.as_ref(), notice.chapter.as_ref())
            && opt(self.verse.as_ref(), notice.verse.as_ref())
            && opt(self.row_id.as_ref(), notice.row_id.as_ref())
            && opt(self.field_name.as_ref(), notice.field_name.as_ref())
            && opt(self.filename.as_ref(), notice.filename.as_ref())
            && opt(self.repo_name.as_ref(), notice.repo_name.as_ref())
            && opt(self.username.as_ref(), notice.username.as_ref())
    }
}

/// An immutable, ordered set of suppression rules.
#[derive(Debug, Clone, Default)]
pub struct SuppressionList {
    rules: Vec<DisabledNotice>,
}

impl SuppressionList {
    /// Build a list from rules. The list never changes afterwards; adding or
    /// removing an entry is a data change at the call site, not a mutation.
    pub fn new(rules: Vec<DisabledNotice>) -> Self {
        Self { rules }
    }

    /// The hand-curated process-wide table.
    ///
    /// Loaded once, shared read-only. Every entry carries a justification —
    /// keep it that way when adding more.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Returns `true` if any rule matches; the first match short-circuits.
    pub fn is_suppressed(&self, notice: &Notice) -> bool {
        self.rules.iter().any(|rule| rule.matches(notice))
    }

    /// Return the notices that survive suppression, in their original order.
    ///
    /// A pure projection: running it twice gives the same list as once.
    pub fn filter(&self, notices: &[Notice]) -> Vec<Notice> {
        notices
            .iter()
            .filter(|n| !self.is_suppressed(n))
            .cloned()
            .collect()
    }
}

static STANDARD: LazyLock<SuppressionList> = LazyLock::new(|| {
    SuppressionList::new(vec![
        // Valid short-form note links like [](../02/20/zu5f) are still
        // counted as broken by the link-ratio check.
        DisabledNotice {
            repo_name: Some("en_tn".to_string()),
            priority: Some(648),
            ..Default::default()
        },
        // The consuming app cannot handle '*' language codes in resource
        // container links yet, so 'en' stays in published notes for now.
        DisabledNotice {
            repo_name: Some("en_tn".to_string()),
            priority: Some(450),
            ..Default::default()
        },
        // Nehemiah's direct speech nests { } inside quotations in ways the
        // stack checker cannot follow.
        DisabledNotice {
            repo_name: Some("en_ust".to_string()),
            message: Some("Unexpected } closing character doesn't match".to_string()),
            book_id: Some("NEH".to_string()),
            ..Default::default()
        },
        DisabledNotice {
            repo_name: Some("en_ust".to_string()),
            message: Some("Unexpected ” closing character doesn't match".to_string()),
            book_id: Some("NEH".to_string()),
            ..Default::default()
        },
        // The alignment editor writes '\p' markers followed by trailing
        // spaces, so those fields legitimately hold only whitespace.
        DisabledNotice {
            repo_name: Some("en_ult".to_string()),
            priority: Some(638),
            field_name: Some("\\p".to_string()),
            ..Default::default()
        },
        DisabledNotice {
            repo_name: Some("en_ust".to_string()),
            priority: Some(638),
            field_name: Some("\\p".to_string()),
            ..Default::default()
        },
        // Same editor leaves trailing spaces all over aligned text.
        DisabledNotice {
            repo_name: Some("en_ult".to_string()),
            priority: Some(95),
            ..Default::default()
        },
        DisabledNotice {
            repo_name: Some("en_ust".to_string()),
            priority: Some(95),
            ..Default::default()
        },
        // The manual uses trailing breaks for (1) (2) (3) numbered lists.
        DisabledNotice {
            repo_name: Some("en_ta".to_string()),
            priority: Some(104),
            ..Default::default()
        },
        // The manual's article pages skip header levels on purpose.
        DisabledNotice {
            repo_name: Some("en_ta".to_string()),
            priority: Some(172),
            ..Default::default()
        },
        // This article is a space-separated sample sheet of quotation
        // symbols, so its pair counts never balance.
        DisabledNotice {
            repo_name: Some("en_ta".to_string()),
            filename: Some("translate/figs-quotemarks/01.md".to_string()),
            priority: Some(162),
            ..Default::default()
        },
        DisabledNotice {
            repo_name: Some("en_ta".to_string()),
            filename: Some("translate/figs-quotemarks/01.md".to_string()),
            priority: Some(462),
            ..Default::default()
        },
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(priority: u16) -> Notice {
        Notice::new(priority, "test message", " in test")
    }

    #[test]
    fn empty_list_suppresses_nothing() {
        let list = SuppressionList::new(Vec::new());
        assert!(!list.is_suppressed(&notice(95)));
    }

    #[test]
    fn priority_only_rule_matches_regardless_of_other_fields() {
        let list = SuppressionList::new(vec![DisabledNotice {
            priority: Some(95),
            ..Default::default()
        }]);
        assert!(list.is_suppressed(&notice(95)));
        assert!(list.is_suppressed(&notice(95).with_book_id("GEN").with_line_number(3)));
        assert!(!list.is_suppressed(&notice(96)));
    }

    #[test]
    fn conjunctive_rule_requires_every_named_field() {
        let list = SuppressionList::new(vec![DisabledNotice {
            priority: Some(95),
            book_id: Some("GEN".to_string()),
            ..Default::default()
        }]);
        assert!(list.is_suppressed(&notice(95).with_book_id("GEN")));
        // Right priority, wrong book.
        assert!(!list.is_suppressed(&notice(95).with_book_id("EXO")));
        // Right priority, book field absent entirely.
        assert!(!list.is_suppressed(&notice(95)));
    }

    #[test]
    fn filter_preserves_order_and_input() {
        let list = SuppressionList::new(vec![DisabledNotice {
            priority: Some(450),
            ..Default::default()
        }]);
        let input = vec![notice(993), notice(450), notice(95), notice(450)];
        let filtered = list.filter(&input);
        assert_eq!(
            filtered.iter().map(|n| n.priority).collect::<Vec<_>>(),
            vec![993, 95]
        );
        // Untouched input.
        assert_eq!(input.len(), 4);
    }

    #[test]
    fn filtering_is_idempotent() {
        let list = SuppressionList::new(vec![DisabledNotice {
            message: Some("test message".to_string()),
            ..Default::default()
        }]);
        let input = vec![notice(1), notice(2)];
        let once = list.filter(&input);
        let twice = list.filter(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn standard_table_matches_on_repo_name() {
        let tagged = {
            let mut n = notice(95);
            n.repo_name = Some("en_ult".to_string());
            n
        };
        assert!(SuppressionList::standard().is_suppressed(&tagged));
        // Same priority without the repo tag survives.
        assert!(!SuppressionList::standard().is_suppressed(&notice(95)));
    }
}
