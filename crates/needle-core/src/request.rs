//! Insertion requests and their validation

use crate::error::{NeedleError, NeedleResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Needle key → fragment, applied in the order entries were added
///
/// Keys are unique; inserting an existing key replaces its fragment but keeps
/// its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsertionRequest {
    entries: IndexMap<String, String>,
}

impl InsertionRequest {
    /// Empty request (fails validation until an entry is added)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert)
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.insert(key, fragment);
        self
    }

    /// Add or replace the fragment for `key`
    pub fn insert(&mut self, key: impl Into<String>, fragment: impl Into<String>) {
        self.entries.insert(key.into(), fragment.into());
    }

    /// Fragment for `key`, if requested
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the request names no needles
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(key, fragment)` pairs in request order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Reject a request with no entries
    ///
    /// # Errors
    /// Returns [`NeedleError::EmptyRequest`] if the request is empty
    #[inline]
    pub fn validate(&self) -> NeedleResult<()> {
        if self.is_empty() {
            return Err(NeedleError::EmptyRequest);
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for InsertionRequest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = Self::new();
        for (key, fragment) in iter {
            request.insert(key, fragment);
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_fails_validation() {
        assert_eq!(
            InsertionRequest::new().validate(),
            Err(NeedleError::EmptyRequest)
        );
    }

    #[test]
    fn keeps_caller_order() {
        let request = InsertionRequest::new()
            .with("propertyClass", "c")
            .with("property", "a")
            .with("propertyGetter", "b");
        let keys: Vec<_> = request.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["propertyClass", "property", "propertyGetter"]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn duplicate_key_replaces_in_place() {
        let request: InsertionRequest = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(request.len(), 2);
        assert_eq!(request.get("a"), Some("3"));
        assert_eq!(request.iter().next(), Some(("a", "3")));
    }

    #[test]
    fn deserializes_from_json_object() {
        let request: InsertionRequest =
            serde_json::from_str(r#"{"property":"private Foo foo;"}"#).unwrap();
        assert_eq!(request.get("property"), Some("private Foo foo;"));
    }
}
