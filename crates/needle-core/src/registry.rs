//! Marker registries
//!
//! Provides [`NeedleRegistry`], the set of needles one file type exposes, and
//! [`NeedleCatalog`], the registries known to a generator keyed by file type.
//! Both are built once and only read afterwards.

use crate::content::DETACHED_CONTEXT;
use crate::error::{NeedleError, NeedleResult};
use crate::needle::{needle_id, Needle};
use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// File type id of the generated `ApplicationProperties.java`
pub const APPLICATION_PROPERTIES: &str = "application-properties";

/// Needle keys the `ApplicationProperties.java` template carries
pub const APPLICATION_PROPERTIES_NEEDLES: [&str; 3] = ["property", "propertyGetter", "propertyClass"];

/// Marker prefix emitted by the generator templates
pub const DEFAULT_MARKER_PREFIX: &str = "jhipster-needle";

/// Needles of one file type, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeedleRegistry {
    file_type: String,
    prefix: String,
    needles: IndexMap<String, Needle>,
}

impl NeedleRegistry {
    /// Empty registry for `file_type`
    #[inline]
    #[must_use]
    pub fn new(file_type: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
            prefix: prefix.into(),
            needles: IndexMap::new(),
        }
    }

    /// Registry for `file_type` holding `keys`
    ///
    /// # Errors
    /// Returns [`NeedleError::InvalidNeedleKey`] for the first unusable key
    pub fn with_needles<I, S>(
        file_type: impl Into<String>,
        prefix: impl Into<String>,
        keys: I,
    ) -> NeedleResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new(file_type, prefix);
        for key in keys {
            registry.register(key.as_ref())?;
        }
        Ok(registry)
    }

    /// Registry of the generated `ApplicationProperties.java`
    ///
    /// # Errors
    /// Only fails if `prefix` makes a marker pattern the regex engine rejects
    pub fn application_properties(prefix: impl Into<String>) -> NeedleResult<Self> {
        Self::with_needles(APPLICATION_PROPERTIES, prefix, APPLICATION_PROPERTIES_NEEDLES)
    }

    /// Add a needle; registering the same key twice is a no-op
    ///
    /// # Errors
    /// Returns [`NeedleError::InvalidNeedleKey`] if `key` cannot name a needle
    pub fn register(&mut self, key: &str) -> NeedleResult<&Needle> {
        if !self.needles.contains_key(key) {
            let needle = Needle::new(&self.file_type, key, &self.prefix)?;
            self.needles.insert(key.to_string(), needle);
        }
        self.lookup(key)
    }

    /// Needle registered under `key`
    ///
    /// # Errors
    /// Returns [`NeedleError::UnknownNeedle`] if this file type has no such needle
    pub fn lookup(&self, key: &str) -> NeedleResult<&Needle> {
        self.needles
            .get(key)
            .ok_or_else(|| NeedleError::UnknownNeedle {
                key: key.to_string(),
                needle: needle_id(&self.file_type, key),
                prefix: self.prefix.clone(),
                file_type: self.file_type.clone(),
                context: DETACHED_CONTEXT.to_string(),
            })
    }

    /// Whether `key` is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.needles.contains_key(key)
    }

    /// File type id
    #[inline]
    #[must_use]
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Marker prefix
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Needles in declaration order
    pub fn needles(&self) -> impl Iterator<Item = &Needle> {
        self.needles.values()
    }

    /// Number of needles
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.needles.len()
    }

    /// Whether no needles are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }
}

/// Registries by file type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeedleCatalog {
    registries: IndexMap<String, NeedleRegistry>,
}

impl NeedleCatalog {
    /// Empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in registries under `prefix`
    ///
    /// # Errors
    /// See [`NeedleRegistry::application_properties`]
    pub fn builtin(prefix: &str) -> NeedleResult<Self> {
        let mut catalog = Self::new();
        catalog.register(NeedleRegistry::application_properties(prefix)?);
        Ok(catalog)
    }

    /// Add or replace the registry for its file type
    pub fn register(&mut self, registry: NeedleRegistry) {
        self.registries
            .insert(registry.file_type().to_string(), registry);
    }

    /// Registry for `file_type`
    ///
    /// # Errors
    /// Returns [`NeedleError::UnknownFileType`] if none is registered
    pub fn get(&self, file_type: &str) -> NeedleResult<&NeedleRegistry> {
        self.registries
            .get(file_type)
            .ok_or_else(|| NeedleError::UnknownFileType(file_type.to_string()))
    }

    /// Mutable registry for `file_type`, if registered
    #[inline]
    pub fn get_mut(&mut self, file_type: &str) -> Option<&mut NeedleRegistry> {
        self.registries.get_mut(file_type)
    }

    /// Registered file types, in registration order
    pub fn file_types(&self) -> impl Iterator<Item = &str> {
        self.registries.keys().map(String::as_str)
    }

    /// All registries
    pub fn registries(&self) -> impl Iterator<Item = &NeedleRegistry> {
        self.registries.values()
    }
}

static DEFAULT_CATALOG: Lazy<NeedleResult<NeedleCatalog>> =
    Lazy::new(|| NeedleCatalog::builtin(DEFAULT_MARKER_PREFIX));

/// Process-wide built-in catalog under [`DEFAULT_MARKER_PREFIX`]
///
/// # Errors
/// Returns the error that building the built-in registries produced, if any
pub fn default_catalog() -> NeedleResult<&'static NeedleCatalog> {
    DEFAULT_CATALOG.as_ref().map_err(Clone::clone)
}
