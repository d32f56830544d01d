//! Idempotency guard (textual idempotency check)
//!
//! A fragment counts as already present when its normalized form is a
//! substring of the normalized file text. This is containment, not structure:
//! a fragment that happens to occur inside unrelated content is also treated
//! as present, and an empty or whitespace-only fragment always is.

use crate::normalize::Normalize;

/// Whether `fragment` already occurs in `file_text` modulo normalization
///
/// Both sides are normalized on every call; nothing is cached.
#[must_use]
pub fn already_present(normalizer: &dyn Normalize, file_text: &str, fragment: &str) -> bool {
    let fragment = normalizer.normalize(fragment);
    if fragment.is_empty() {
        return true;
    }
    normalizer.normalize(file_text).contains(&fragment)
}
