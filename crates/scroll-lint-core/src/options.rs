//! Checking options: the knobs callers pass into every checker.
//!
//! [`CheckOptions`] is plain data — serde-loadable, cheap to clone, safe to
//! share — and every field is optional with a well-known default, so a bare
//! `CheckOptions::default()` always works. [`OptionsLoader`] discovers and
//! merges option files the same way across tools:
//!
//! 1. Walking up from a starting directory to find project options
//! 2. Loading user options from the XDG config directory
//! 3. Overlaying `SCROLL_LINT_`-prefixed environment variables
//!
//! # Supported formats
//!
//! TOML (`.toml`), YAML (`.yaml`, `.yml`), and JSON (`.json`), merged via
//! figment with later sources winning.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::text;

/// Repository owner consulted for link targets when none is configured.
pub const DEFAULT_USERNAME: &str = "Door43-Catalog";

/// Branch consulted for link targets when none is configured.
pub const DEFAULT_BRANCH: &str = "master";

/// Language code assumed for wildcard or missing link languages.
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Options recognised by the checkers. All optional; absent values fall back
/// to the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CheckOptions {
    /// Total width, in characters, of extract windows in notices.
    ///
    /// Zero or negative values fall back to the default (10) rather than
    /// failing — see [`text::extract_length_or_default`].
    pub extract_length: Option<i64>,
    /// Language assumed when a resource link uses the `*` wildcard or omits
    /// its language. Default `"en"`.
    pub default_language_code: Option<String>,
    /// Owner of the translation-academy repository to verify links against.
    pub ta_repo_username: Option<String>,
    /// Branch (or tag) of the translation-academy repository.
    pub ta_repo_branch: Option<String>,
    /// Owner of the translation-words repository to verify links against.
    pub tw_repo_username: Option<String>,
    /// Branch (or tag) of the translation-words repository.
    pub tw_repo_branch: Option<String>,
    /// Skip the suppression pass, returning every notice including the ones
    /// the standard table would drop.
    pub suppress_notice_disabling: bool,
    /// Link targets are not being fetched at all; the tabular validator
    /// reports this with a low-priority informational notice.
    pub disable_all_link_fetching: bool,
    /// Downstream priority cutoff, consulted only to decide whether that
    /// informational notice would be filtered out anyway.
    pub cutoff_priority_level: Option<u16>,
}

impl CheckOptions {
    /// Effective extract-window width plus a default-was-used flag.
    pub fn effective_extract_length(&self) -> (usize, bool) {
        text::extract_length_or_default(self.extract_length)
    }

    /// Effective default language code.
    pub fn effective_language_code(&self) -> &str {
        self.default_language_code
            .as_deref()
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE_CODE)
    }

    /// Effective translation-academy repository owner.
    pub fn effective_ta_username(&self) -> &str {
        self.ta_repo_username
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_USERNAME)
    }

    /// Effective translation-academy branch.
    pub fn effective_ta_branch(&self) -> &str {
        self.ta_repo_branch
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BRANCH)
    }

    /// Effective translation-words repository owner.
    pub fn effective_tw_username(&self) -> &str {
        self.tw_repo_username
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_USERNAME)
    }

    /// Effective translation-words branch.
    pub fn effective_tw_branch(&self) -> &str {
        self.tw_repo_branch
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BRANCH)
    }
}

/// Supported option file extensions (in order of preference).
const OPTION_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and option file names.
const APP_NAME: &str = "scroll-lint";

/// Builder for loading options from multiple sources.
#[derive(Debug, Default)]
pub struct OptionsLoader {
    /// Starting directory for project option search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user options from the XDG directory.
    include_user_config: bool,
    /// Explicit option files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl OptionsLoader {
    /// Create a new loader with default settings.
    pub const fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project option search.
    ///
    /// The loader walks up from this directory looking for
    /// `scroll-lint.<ext>` / `.scroll-lint.<ext>` files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user options from `~/.config/scroll-lint/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Add an explicit option file to load.
    ///
    /// Files are loaded in order, with later files taking precedence, after
    /// any discovered files.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load options, merging all discovered sources.
    ///
    /// Precedence (highest to lowest): environment variables, explicit
    /// files, project options (closest to search root), user options,
    /// defaults.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<CheckOptions> {
        tracing::debug!("loading checking options");
        let mut figment = Figment::new().merge(Serialized::defaults(CheckOptions::default()));

        if self.include_user_config
            && let Some(user_config) = Self::find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
        }

        if let Some(ref root) = self.project_search_root {
            for file in Self::find_project_files(root) {
                figment = Self::merge_file(figment, &file);
            }
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }

        // SCROLL_LINT_EXTRACT_LENGTH=20, SCROLL_LINT_DEFAULT_LANGUAGE_CODE=fr, etc.
        figment = figment.merge(Env::prefixed("SCROLL_LINT_").lowercase(true));

        figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))
    }

    /// Load options, returning an error if no option file is found anywhere.
    pub fn load_or_error(self) -> ConfigResult<CheckOptions> {
        let has_user = self.include_user_config && Self::find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !Self::find_project_files(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project option files by walking up from the given directory.
    ///
    /// Returns all matching files from the closest directory that has any,
    /// ordered low→high precedence (dotfiles before regular files).
    fn find_project_files(start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            for ext in OPTION_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    found.push(dotfile);
                }
            }
            for ext in OPTION_EXTENSIONS {
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    found.push(regular);
                }
            }

            if !found.is_empty() {
                return found;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// Find user options in the XDG config directory.
    fn find_user_config() -> Option<Utf8PathBuf> {
        let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
        let config_dir = proj_dirs.config_dir();

        for ext in OPTION_EXTENSIONS {
            let path = config_dir.join(format!("config.{ext}"));
            if path.is_file() {
                return Utf8PathBuf::from_path_buf(path).ok();
            }
        }

        None
    }

    /// Merge an option file into the figment, detecting format from the
    /// extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}
