//! Core library for scroll-lint.
//!
//! This crate is the notice-generating validation engine behind scroll-lint:
//! it checks the document formats used in scripture translation resource
//! pipelines (plain text, USFM and markdown sources, tab-separated
//! annotation tables) and returns structured diagnostic [`Notice`] records
//! instead of pass/fail booleans.
//!
//! # Modules
//!
//! - [`plain_text`] - Whole-document structural checking
//! - [`table`] - Whole-table annotation checking
//! - [`links`] - Embedded resource-link verification
//! - [`suppression`] - Filtering of already-triaged notices
//! - [`notice`] - The shared `Notice` / `CheckResult` data model
//! - [`canon`] - Scripture book metadata
//! - [`source`] - Remote content access for link verification
//! - [`delegates`] - Interfaces to the per-field / per-row checkers
//! - [`options`] - Checking options and their file/env loader
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use scroll_lint_core::delegates::NoopFieldChecker;
//! use scroll_lint_core::{CheckOptions, TextKind, check_plain_text};
//!
//! let result = check_plain_text(
//!     TextKind::Markdown,
//!     "intro.md",
//!     "He said (but never finished\n",
//!     "in en_obs",
//!     &NoopFieldChecker,
//!     &CheckOptions::default(),
//! );
//! for notice in &result.notice_list {
//!     println!("{} {}{}", notice.priority, notice.message, notice.location);
//! }
//! ```
#![deny(unsafe_code)]

pub mod canon;
pub mod delegates;
pub mod error;
pub mod links;
pub mod notice;
pub mod options;
pub mod plain_text;
pub mod source;
pub mod suppression;
pub mod table;
pub mod text;

pub use error::{ConfigError, ConfigResult, FetchError, FetchResult};
pub use links::{LinkFieldKind, check_embedded_links};
pub use notice::{CheckResult, Notice};
pub use options::{CheckOptions, OptionsLoader};
pub use plain_text::{TextKind, check_plain_text};
pub use source::{CachedSource, FileSource, FileSpec};
pub use suppression::{DisabledNotice, SuppressionList};
pub use table::check_annotation_table;
