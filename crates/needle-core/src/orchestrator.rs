//! Request orchestration
//!
//! [`NeedleInserter`] runs a whole [`InsertionRequest`] against one file:
//! validate, then for every entry in request order look the needle up, locate
//! its marker, skip if the fragment is already present, otherwise splice it in.
//!
//! # Failure policy
//! Fail fast, no rollback. The [`FileContent`] is updated entry by entry, so
//! when a later entry fails the earlier insertions stay in it. Callers decide
//! whether to persist that partial text.

use crate::config::NeedleConfig;
use crate::content::FileContent;
use crate::error::NeedleResult;
use crate::guard;
use crate::hash::ContentHash;
use crate::inserter;
use crate::locator::Locator;
use crate::needle::Needle;
use crate::normalize::{CollapseWhitespace, Normalize};
use crate::registry::NeedleRegistry;
use crate::request::InsertionRequest;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// What happened to one request entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsertionOutcome {
    /// Fragment written; `line` is the one-based line its block starts at
    Inserted {
        /// First line of the inserted block
        line: usize,
    },
    /// Normalized fragment already in the file; nothing written
    AlreadyPresent,
}

impl InsertionOutcome {
    /// Whether the file text changed
    #[inline]
    #[must_use]
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// Outcome of one request entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    /// Request key
    pub key: String,
    /// Needle id the key resolved to
    pub needle: String,
    /// What happened
    pub outcome: InsertionOutcome,
}

/// Outcome of a whole successful request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionReport {
    /// File type whose registry was used
    pub file_type: String,
    /// Context of the file (usually its path)
    pub context: String,
    /// Per-entry outcomes, in request order
    pub entries: Vec<EntryReport>,
    /// Fingerprint of the text before the call
    pub before: ContentHash,
    /// Fingerprint of the text after the call
    pub after: ContentHash,
}

impl InsertionReport {
    /// Whether any entry changed the file
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.before != self.after
    }

    /// Number of fragments written
    #[must_use]
    pub fn inserted_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_inserted()).count()
    }

    /// Number of entries skipped as already present
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.entries.len() - self.inserted_count()
    }
}

/// Applies insertion requests to file content
#[derive(Clone)]
pub struct NeedleInserter {
    locator: Locator,
    normalizer: Arc<dyn Normalize>,
    auto_indent: bool,
}

impl NeedleInserter {
    /// First-match locator, whitespace-collapsing guard, auto-indent on
    #[must_use]
    pub fn new() -> Self {
        Self {
            locator: Locator::default(),
            normalizer: Arc::new(CollapseWhitespace),
            auto_indent: true,
        }
    }

    /// Inserter configured from `config`
    #[must_use]
    pub fn from_config(config: &NeedleConfig) -> Self {
        Self {
            locator: Locator::new(config.duplicate_markers),
            normalizer: config.normalization.normalizer(),
            auto_indent: config.auto_indent,
        }
    }

    /// With a custom normalizer (e.g. a real formatter)
    #[inline]
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: impl Normalize + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    /// With a locator
    #[inline]
    #[must_use]
    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    /// With auto-indentation on or off
    #[inline]
    #[must_use]
    pub fn with_auto_indent(mut self, auto_indent: bool) -> Self {
        self.auto_indent = auto_indent;
        self
    }

    /// Locator in use
    #[inline]
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Whether `fragment` is already in `text` under this inserter's normalizer
    #[inline]
    #[must_use]
    pub fn already_present(&self, text: &str, fragment: &str) -> bool {
        guard::already_present(self.normalizer.as_ref(), text, fragment)
    }

    /// Apply one fragment for one needle
    ///
    /// The marker must exist even when the fragment is already present.
    ///
    /// # Errors
    /// `MissingNeedle` or `AmbiguousNeedle` from the locator
    pub fn insert_entry(
        &self,
        content: &mut FileContent,
        needle: &Needle,
        fragment: &str,
    ) -> NeedleResult<InsertionOutcome> {
        let position = self.locator.find(content.text(), needle, content.context())?;

        if self.already_present(content.text(), fragment) {
            tracing::debug!(
                needle = needle.id(),
                context = content.context(),
                "fragment already present, skipping"
            );
            return Ok(InsertionOutcome::AlreadyPresent);
        }

        let updated = inserter::insert_before(content.text(), &position, fragment, self.auto_indent);
        content.replace(updated);

        tracing::info!(
            needle = needle.id(),
            context = content.context(),
            line = position.line_number(),
            "inserted fragment"
        );
        Ok(InsertionOutcome::Inserted {
            line: position.line_number(),
        })
    }

    /// Apply a whole request against `registry`
    ///
    /// # Errors
    /// - `EmptyRequest` before anything is touched
    /// - `UnknownNeedle`, `MissingNeedle` or `AmbiguousNeedle` for the first
    ///   failing entry; earlier entries stay applied to `content`
    pub fn insert_content(
        &self,
        content: &mut FileContent,
        registry: &NeedleRegistry,
        request: &InsertionRequest,
    ) -> NeedleResult<InsertionReport> {
        request.validate()?;

        let before = content.hash();
        let mut entries = Vec::with_capacity(request.len());

        for (key, fragment) in request.iter() {
            let needle = registry
                .lookup(key)
                .map_err(|err| err.with_context(content.context()))?;
            let outcome = self.insert_entry(content, needle, fragment)?;
            entries.push(EntryReport {
                key: key.to_string(),
                needle: needle.id().to_string(),
                outcome,
            });
        }

        Ok(InsertionReport {
            file_type: registry.file_type().to_string(),
            context: content.context().to_string(),
            entries,
            before,
            after: content.hash(),
        })
    }
}

impl Default for NeedleInserter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NeedleInserter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeedleInserter")
            .field("locator", &self.locator)
            .field("auto_indent", &self.auto_indent)
            .finish_non_exhaustive()
    }
}

/// Apply `request` to `text` with default settings and return the new text
///
/// # Errors
/// See [`NeedleInserter::insert_content`]
pub fn insert_content(
    text: &str,
    registry: &NeedleRegistry,
    request: &InsertionRequest,
) -> NeedleResult<String> {
    let mut content = FileContent::detached(text);
    NeedleInserter::new().insert_content(&mut content, registry, request)?;
    Ok(content.into_text())
}
