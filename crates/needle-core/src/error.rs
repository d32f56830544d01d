//! Error types for needle insertion
//!
//! Every failure here is surfaced to the caller as-is. A needle that cannot be
//! found means the generated template drifted from what the caller expects, and
//! skipping silently would hide that.

/// Errors raised while validating or applying an insertion request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NeedleError {
    /// The request named no needles at all
    #[error("At least 1 needle is required")]
    EmptyRequest,

    /// The request key is not registered for the target file type
    #[error("Missing required {prefix} {needle} not found at {context}: not registered for {file_type}")]
    UnknownNeedle {
        /// Key as written in the request (e.g. `propertyGetter`)
        key: String,
        /// Needle id derived from the key (e.g. `application-properties-property-getter`)
        needle: String,
        /// Marker prefix in effect
        prefix: String,
        /// File type whose registry was consulted
        file_type: String,
        /// File the request was applied to
        context: String,
    },

    /// The needle is registered but its marker line is absent from the file
    #[error("Missing required {prefix} {needle} not found at {context}")]
    MissingNeedle {
        /// Needle id
        needle: String,
        /// Marker prefix in effect
        prefix: String,
        /// Where the marker was expected, usually the file path
        context: String,
    },

    /// More than one marker line matched and the duplicate policy forbids picking one
    #[error("Ambiguous {needle}: {count} markers found at {context}")]
    AmbiguousNeedle {
        /// Needle id
        needle: String,
        /// Number of matching marker lines
        count: usize,
        /// Where the markers were found
        context: String,
    },

    /// A registry was declared with a key that cannot name a needle
    #[error("invalid needle key '{key}' for {file_type}: {reason}")]
    InvalidNeedleKey {
        /// Offending key
        key: String,
        /// File type being declared
        file_type: String,
        /// Why it was rejected
        reason: String,
    },

    /// No registry exists for the requested file type
    #[error("no needle registry for file type '{0}'")]
    UnknownFileType(String),
}

impl NeedleError {
    /// Marker absent from the file at `context`
    pub fn missing(
        needle: impl Into<String>,
        prefix: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::MissingNeedle {
            needle: needle.into(),
            prefix: prefix.into(),
            context: context.into(),
        }
    }

    /// Attach the file `context` to an error raised before a file was known
    #[must_use]
    pub fn with_context(mut self, file: &str) -> Self {
        if let Self::UnknownNeedle { context, .. } = &mut self {
            *context = file.to_string();
        }
        self
    }

    /// Needle id this error is about, if any
    #[must_use]
    pub fn needle(&self) -> Option<&str> {
        match self {
            Self::UnknownNeedle { needle, .. }
            | Self::MissingNeedle { needle, .. }
            | Self::AmbiguousNeedle { needle, .. } => Some(needle),
            Self::EmptyRequest | Self::InvalidNeedleKey { .. } | Self::UnknownFileType(_) => {
                None
            }
        }
    }
}

/// Result alias for needle operations
pub type NeedleResult<T> = Result<T, NeedleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_display() {
        assert_eq!(
            NeedleError::EmptyRequest.to_string(),
            "At least 1 needle is required"
        );
    }

    #[test]
    fn missing_needle_names_needle_and_path() {
        let err = NeedleError::missing(
            "application-properties-foo",
            "jhipster-needle",
            "src/main/java/com/mycompany/myapp/config/ApplicationProperties.java",
        );
        assert_eq!(
            err.to_string(),
            "Missing required jhipster-needle application-properties-foo not found at \
             src/main/java/com/mycompany/myapp/config/ApplicationProperties.java"
        );
        assert_eq!(err.needle(), Some("application-properties-foo"));
    }

    #[test]
    fn unknown_needle_display() {
        let err = NeedleError::UnknownNeedle {
            key: "foo".to_string(),
            needle: "application-properties-foo".to_string(),
            prefix: "jhipster-needle".to_string(),
            file_type: "application-properties".to_string(),
            context: crate::content::DETACHED_CONTEXT.to_string(),
        }
        .with_context("src/main/java/com/mycompany/myapp/config/ApplicationProperties.java");
        assert_eq!(
            err.to_string(),
            "Missing required jhipster-needle application-properties-foo not found at \
             src/main/java/com/mycompany/myapp/config/ApplicationProperties.java: \
             not registered for application-properties"
        );
    }

    #[test]
    fn with_context_leaves_other_errors_alone() {
        let err = NeedleError::missing("application-properties-foo", "jhipster-needle", "A.java");
        assert_eq!(err.clone().with_context("B.java"), err);
    }

    #[test]
    fn empty_request_has_no_needle() {
        assert_eq!(NeedleError::EmptyRequest.needle(), None);
    }
}
