//! Marker lookup over the ordered lines of a file
//!
//! The file is scanned line by line; positions are byte offsets of line starts
//! so the inserter can splice without re-splitting the text.

use crate::error::{NeedleError, NeedleResult};
use crate::needle::Needle;
use serde::{Deserialize, Serialize};

/// Where a marker line sits in the file text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerPosition {
    /// Zero-based line index
    pub line: usize,
    /// Byte offset of the start of the marker line
    pub offset: usize,
    /// Leading whitespace of the marker line
    pub indent: String,
    /// Terminator of the marker line (`"\n"` or `"\r\n"`; `"\n"` when the marker is the last line)
    pub line_ending: &'static str,
}

impl MarkerPosition {
    /// One-based line number, for messages
    #[inline]
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line + 1
    }
}

/// What to do when a marker matches more than one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Use the first matching line (logged as a warning)
    #[default]
    First,
    /// Fail with [`NeedleError::AmbiguousNeedle`]
    Reject,
}

/// Finds needle markers in file text
#[derive(Debug, Clone, Copy, Default)]
pub struct Locator {
    policy: DuplicatePolicy,
}

impl Locator {
    /// Locator with the given duplicate policy
    #[inline]
    #[must_use]
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    /// Duplicate policy in effect
    #[inline]
    #[must_use]
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Every line carrying `needle`'s marker, in file order
    #[must_use]
    pub fn occurrences(&self, text: &str, needle: &Needle) -> Vec<MarkerPosition> {
        let mut found = Vec::new();
        let mut offset = 0;
        let mut previous_ending = "\n";

        for (index, raw) in text.split_inclusive('\n').enumerate() {
            let line = raw.trim_end_matches(|c: char| c == '\n' || c == '\r');
            // An unterminated last line takes the file's convention from the line above.
            let line_ending = if raw.ends_with("\r\n") {
                "\r\n"
            } else if raw.ends_with('\n') {
                "\n"
            } else {
                previous_ending
            };
            if needle.matches_line(line) {
                let indent_len = line.len() - line.trim_start().len();
                found.push(MarkerPosition {
                    line: index,
                    offset,
                    indent: line[..indent_len].to_string(),
                    line_ending,
                });
            }
            previous_ending = line_ending;
            offset += raw.len();
        }

        found
    }

    /// Locate the marker line `needle` points at
    ///
    /// `context` names the file (usually its path) in error messages.
    ///
    /// # Errors
    /// - [`NeedleError::MissingNeedle`] if no line carries the marker
    /// - [`NeedleError::AmbiguousNeedle`] if several do and the policy is
    ///   [`DuplicatePolicy::Reject`]
    pub fn find(&self, text: &str, needle: &Needle, context: &str) -> NeedleResult<MarkerPosition> {
        let mut found = self.occurrences(text, needle);

        match (found.len(), self.policy) {
            (0, _) => Err(NeedleError::missing(needle.id(), needle.prefix(), context)),
            (1, _) => Ok(found.swap_remove(0)),
            (count, DuplicatePolicy::Reject) => Err(NeedleError::AmbiguousNeedle {
                needle: needle.id().to_string(),
                count,
                context: context.to_string(),
            }),
            (count, DuplicatePolicy::First) => {
                tracing::warn!(
                    needle = needle.id(),
                    count,
                    context,
                    "multiple markers found, using the first"
                );
                Ok(found.swap_remove(0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "class A {\n    // jhipster-needle-application-properties-property\n    // jhipster-needle-application-properties-property-getter\n}\n";

    fn needle(key: &str) -> Needle {
        Needle::new("application-properties", key, "jhipster-needle").unwrap()
    }

    #[test]
    fn finds_marker_line_and_indent() {
        let pos = Locator::default()
            .find(FILE, &needle("propertyGetter"), "A.java")
            .unwrap();
        assert_eq!(pos.line, 2);
        assert_eq!(pos.line_number(), 3);
        assert_eq!(pos.indent, "    ");
        assert_eq!(pos.line_ending, "\n");
        assert!(FILE[pos.offset..].starts_with("    // jhipster-needle-application-properties-property-getter"));
    }

    #[test]
    fn missing_marker_names_needle_and_context() {
        let err = Locator::default()
            .find(FILE, &needle("foo"), "config/A.java")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required jhipster-needle application-properties-foo not found at config/A.java"
        );
    }

    #[test]
    fn duplicate_markers_resolve_to_first_line() {
        let text = "// jhipster-needle-application-properties-property\nx\n  // jhipster-needle-application-properties-property\n";
        let pos = Locator::new(DuplicatePolicy::First)
            .find(text, &needle("property"), "f")
            .unwrap();
        assert_eq!(pos.line, 0);
        assert_eq!(pos.offset, 0);
    }

    #[test]
    fn duplicate_markers_rejected_when_strict() {
        let text = "// jhipster-needle-application-properties-property\n// jhipster-needle-application-properties-property\n";
        let err = Locator::new(DuplicatePolicy::Reject)
            .find(text, &needle("property"), "f")
            .unwrap_err();
        assert!(matches!(err, NeedleError::AmbiguousNeedle { count: 2, .. }));
    }

    #[test]
    fn crlf_line_endings_are_reported() {
        let text = "a\r\n\t// jhipster-needle-application-properties-property\r\nb\r\n";
        let pos = Locator::default()
            .find(text, &needle("property"), "f")
            .unwrap();
        assert_eq!(pos.offset, 3);
        assert_eq!(pos.indent, "\t");
        assert_eq!(pos.line_ending, "\r\n");
    }

    #[test]
    fn marker_on_last_line_without_newline() {
        let text = "a\n// jhipster-needle-application-properties-property";
        let pos = Locator::default()
            .find(text, &needle("property"), "f")
            .unwrap();
        assert_eq!(pos.line, 1);
        assert_eq!(pos.line_ending, "\n");
    }

    #[test]
    fn unterminated_last_marker_inherits_crlf() {
        let text = "a\r\n// jhipster-needle-application-properties-property";
        let pos = Locator::default()
            .find(text, &needle("property"), "f")
            .unwrap();
        assert_eq!(pos.line_ending, "\r\n");
    }
}
