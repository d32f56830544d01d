//! Normalization seam for the idempotency guard
//!
//! Normalized text is only ever compared, never written back to a file.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pure text normalization used for "already present" comparisons
///
/// Implementations must be deterministic. Any `Fn(&str) -> String` closure
/// that is `Send + Sync` qualifies, so callers can plug in a formatter.
pub trait Normalize: Send + Sync {
    /// Produce the comparison form of `text`
    fn normalize(&self, text: &str) -> String;
}

impl<F> Normalize for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, text: &str) -> String {
        self(text)
    }
}

/// Collapse every whitespace run (spaces, tabs, newlines) to one space and trim
///
/// `"  private   Foo\n\n  foo;"` and `"private Foo foo;"` compare equal, but
/// `"privateFoo"` and `"private Foo"` do not.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseWhitespace;

impl Normalize for CollapseWhitespace {
    fn normalize(&self, text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Remove all whitespace
///
/// More tolerant than [`CollapseWhitespace`]: `foo(a,b)` matches `foo(a, b)`.
/// Also more prone to false positives across token boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripWhitespace;

impl Normalize for StripWhitespace {
    fn normalize(&self, text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// Built-in normalization modes, selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// [`CollapseWhitespace`]
    #[default]
    Collapse,
    /// [`StripWhitespace`]
    Strip,
}

impl NormalizationMode {
    /// Shared normalizer for this mode
    #[must_use]
    pub fn normalizer(self) -> Arc<dyn Normalize> {
        match self {
            Self::Collapse => Arc::new(CollapseWhitespace),
            Self::Strip => Arc::new(StripWhitespace),
        }
    }
}
