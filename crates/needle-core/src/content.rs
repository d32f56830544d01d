//! Materialized text of one target file

use crate::hash::ContentHash;

/// Context used when content has no backing path
pub const DETACHED_CONTEXT: &str = "<memory>";

/// Current text of one target file plus the context errors should name
///
/// Owned exclusively by the caller for the duration of an insertion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    context: String,
    text: String,
}

impl FileContent {
    /// Content read from `context` (usually a path)
    #[inline]
    #[must_use]
    pub fn new(context: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            text: text.into(),
        }
    }

    /// Content with no backing file
    #[inline]
    #[must_use]
    pub fn detached(text: impl Into<String>) -> Self {
        Self::new(DETACHED_CONTEXT, text)
    }

    /// Where this content came from
    #[inline]
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Current text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Take the text
    #[inline]
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Fingerprint of the current text
    #[inline]
    #[must_use]
    pub fn hash(&self) -> ContentHash {
        ContentHash::of_text(&self.text)
    }

    pub(crate) fn replace(&mut self, text: String) {
        self.text = text;
    }
}
