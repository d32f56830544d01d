//! Needle definitions and marker matching
//!
//! A [`Needle`] ties a request key (`propertyGetter`) to the marker token that
//! generated templates emit as a comment line
//! (`// jhipster-needle-application-properties-property-getter`).

use crate::error::{NeedleError, NeedleResult};
use regex::Regex;

/// One named insertion point of a file type
///
/// Immutable once built; registries hand out shared references.
///
/// # Marker grammar
/// A line carries the marker when a comment opener (`//`, `<!--`, `/*`, `{/*`
/// or `#`) is followed by optional whitespace and the token, and the token is
/// followed by whitespace or the end of the line. The trailing boundary keeps
/// `...-property` from matching a `...-property-getter` line.
#[derive(Debug, Clone)]
pub struct Needle {
    key: String,
    id: String,
    prefix: String,
    token: String,
    pattern: Regex,
}

impl Needle {
    /// Build the needle `key` for `file_type` under marker `prefix`
    ///
    /// # Errors
    /// Returns [`NeedleError::InvalidNeedleKey`] if the key is empty or holds
    /// characters other than ASCII letters, digits, `-` and `_`.
    pub fn new(file_type: &str, key: &str, prefix: &str) -> NeedleResult<Self> {
        validate_key(file_type, key)?;

        let id = needle_id(file_type, key);
        let token = format!("{prefix}-{id}");
        let pattern = Regex::new(&format!(
            r"(?://|<!--|\{{?/\*|#)\s*{}(?:\s|$)",
            regex::escape(&token)
        ))
        .map_err(|e| NeedleError::InvalidNeedleKey {
            key: key.to_string(),
            file_type: file_type.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            key: key.to_string(),
            id,
            prefix: prefix.to_string(),
            token,
            pattern,
        })
    }

    /// Request key (`propertyGetter`)
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Needle id (`application-properties-property-getter`)
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Marker prefix (`jhipster-needle`)
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full marker token as it appears in templates
    #[inline]
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether a single line (without its terminator) is this needle's marker
    #[inline]
    #[must_use]
    pub fn matches_line(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

impl PartialEq for Needle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.token == other.token
    }
}

impl Eq for Needle {}

/// Needle id for a request key: `<file-type>-<kebab-key>`
#[must_use]
pub fn needle_id(file_type: &str, key: &str) -> String {
    format!("{file_type}-{}", kebab_case(key))
}

/// `propertyGetter` → `property-getter`, `property_class` → `property-class`
#[must_use]
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

fn validate_key(file_type: &str, key: &str) -> NeedleResult<()> {
    let reject = |reason: &str| NeedleError::InvalidNeedleKey {
        key: key.to_string(),
        file_type: file_type.to_string(),
        reason: reason.to_string(),
    };

    if key.is_empty() {
        return Err(reject("key is empty"));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(reject("only ASCII letters, digits, '-' and '_' are allowed"));
    }
    Ok(())
}
