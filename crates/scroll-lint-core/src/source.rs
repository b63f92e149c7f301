//! Remote content access.
//!
//! The link resolver needs to read files out of *other* repositories to
//! prove that link targets exist. How those bytes are obtained — HTTP, a
//! local clone, a zip snapshot, a test fixture — is the caller's business:
//! they hand the resolver any [`FileSource`]. [`CachedSource`] is the
//! optional memoising decorator for callers that check many documents
//! against the same handful of articles.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FetchResult;

/// Coordinates of one file in one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct FileSpec {
    /// Repository owner.
    pub username: String,
    /// Repository name, e.g. `en_ta`.
    pub repository: String,
    /// Path within the repository, e.g. `translate/figs-metaphor/01.md`.
    pub path: String,
    /// Branch or tag.
    pub branch: String,
}

impl FileSpec {
    /// Build a spec from its four parts.
    pub fn new(
        username: impl Into<String>,
        repository: impl Into<String>,
        path: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            repository: repository.into(),
            path: path.into(),
            branch: branch.into(),
        }
    }
}

impl std::fmt::Display for FileSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.username, self.repository, self.branch, self.path
        )
    }
}

/// A source of remote file content.
///
/// Implementations decide transport, authentication, and timeout policy.
/// The checkers treat every failure as recoverable: an `Err` becomes a
/// notice on the document being checked, never a propagated error.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Fetch the text of the file `spec` points at.
    async fn get_file(&self, spec: &FileSpec) -> FetchResult<String>;
}

/// Memoising decorator around any [`FileSource`].
///
/// Successful results (including empty files) are cached for the lifetime
/// of the decorator; failures are not, so a transient error is retried on
/// the next request. The wrapped contract is unchanged.
pub struct CachedSource<S> {
    inner: S,
    cache: Mutex<HashMap<FileSpec, String>>,
}

impl<S> CachedSource<S> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached files.
    pub fn cached_count(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl<S: FileSource> FileSource for CachedSource<S> {
    async fn get_file(&self, spec: &FileSpec) -> FetchResult<String> {
        let hit = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(spec)
            .cloned();
        if let Some(content) = hit {
            tracing::debug!(%spec, "file cache hit");
            return Ok(content);
        }

        let content = self.inner.get_file(spec).await?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(spec.clone(), content.clone());
        Ok(content)
    }
}
