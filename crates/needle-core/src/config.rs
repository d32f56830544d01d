//! Needle configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file)
//! yields the stock behaviour:
//!
//! ```toml
//! marker_prefix = "jhipster-needle"
//! auto_indent = true
//! normalization = "collapse"      # or "strip"
//! duplicate_markers = "first"     # or "reject"
//! max_file_size = 10485760
//!
//! [application_properties]
//! main_java_dir = "src/main/java"
//! package_folder = "com/mycompany/myapp"
//!
//! [[file_types]]
//! name = "pom"
//! needles = ["dependency", "plugin"]
//! ```

use crate::error::NeedleError;
use crate::locator::DuplicatePolicy;
use crate::normalize::NormalizationMode;
use crate::registry::{default_catalog, NeedleCatalog, NeedleRegistry, DEFAULT_MARKER_PREFIX};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Insertion behaviour and extra registries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedleConfig {
    /// Prefix of every marker token
    pub marker_prefix: String,
    /// Re-indent fragments to the marker's indentation
    pub auto_indent: bool,
    /// Comparison form used by the idempotency guard
    pub normalization: NormalizationMode,
    /// What to do when a marker matches several lines
    pub duplicate_markers: DuplicatePolicy,
    /// Largest file the file layer will read, in bytes
    pub max_file_size: usize,
    /// Where the generated `ApplicationProperties.java` lives
    pub application_properties: ApplicationPropertiesConfig,
    /// Registries declared on top of the built-in ones
    pub file_types: Vec<FileTypeConfig>,
}

impl NeedleConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With marker prefix
    #[inline]
    #[must_use]
    pub fn with_marker_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.marker_prefix = prefix.into();
        self
    }

    /// With auto-indentation on or off
    #[inline]
    #[must_use]
    pub fn with_auto_indent(mut self, auto_indent: bool) -> Self {
        self.auto_indent = auto_indent;
        self
    }

    /// With normalization mode
    #[inline]
    #[must_use]
    pub fn with_normalization(mut self, mode: NormalizationMode) -> Self {
        self.normalization = mode;
        self
    }

    /// With duplicate-marker policy
    #[inline]
    #[must_use]
    pub fn with_duplicate_markers(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_markers = policy;
        self
    }

    /// With an extra file type and its needle keys
    #[must_use]
    pub fn with_file_type<I, S>(mut self, name: impl Into<String>, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_types.push(FileTypeConfig {
            name: name.into(),
            needles: needles.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML or fails validation
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check invariants serde cannot express
    ///
    /// # Errors
    /// Returns [`ConfigError::Validation`] describing the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker_prefix.trim().is_empty() {
            return Err(ConfigError::Validation("marker_prefix must not be empty".to_string()));
        }
        if self.marker_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "marker_prefix '{}' must not contain whitespace",
                self.marker_prefix
            )));
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::Validation("max_file_size must be positive".to_string()));
        }
        for file_type in &self.file_types {
            if file_type.name.trim().is_empty() {
                return Err(ConfigError::Validation("file type name must not be empty".to_string()));
            }
            if file_type.needles.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "file type '{}' declares no needles",
                    file_type.name
                )));
            }
        }
        Ok(())
    }

    /// Built-in registries plus the declared file types
    ///
    /// A declared file type that matches a built-in one extends it.
    ///
    /// # Errors
    /// Returns [`NeedleError::InvalidNeedleKey`] for an unusable needle key
    pub fn catalog(&self) -> Result<NeedleCatalog, NeedleError> {
        let mut catalog = if self.marker_prefix == DEFAULT_MARKER_PREFIX {
            default_catalog()?.clone()
        } else {
            NeedleCatalog::builtin(&self.marker_prefix)?
        };
        for file_type in &self.file_types {
            if let Some(registry) = catalog.get_mut(&file_type.name) {
                for key in &file_type.needles {
                    registry.register(key)?;
                }
            } else {
                catalog.register(NeedleRegistry::with_needles(
                    file_type.name.as_str(),
                    self.marker_prefix.as_str(),
                    &file_type.needles,
                )?);
            }
        }
        Ok(catalog)
    }
}

impl Default for NeedleConfig {
    fn default() -> Self {
        Self {
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            auto_indent: true,
            normalization: NormalizationMode::default(),
            duplicate_markers: DuplicatePolicy::default(),
            max_file_size: 10 * 1024 * 1024,
            application_properties: ApplicationPropertiesConfig::default(),
            file_types: Vec::new(),
        }
    }
}

/// Location of the generated `ApplicationProperties.java`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationPropertiesConfig {
    /// Java source root, relative to the project root
    pub main_java_dir: String,
    /// Base package as a path (`com/mycompany/myapp`)
    pub package_folder: String,
}

impl ApplicationPropertiesConfig {
    /// `<main_java_dir>/<package_folder>/config/ApplicationProperties.java`
    #[must_use]
    pub fn path(&self) -> PathBuf {
        Path::new(&self.main_java_dir)
            .join(&self.package_folder)
            .join("config")
            .join("ApplicationProperties.java")
    }
}

impl Default for ApplicationPropertiesConfig {
    fn default() -> Self {
        Self {
            main_java_dir: "src/main/java".to_string(),
            package_folder: "com/mycompany/myapp".to_string(),
        }
    }
}

/// An extra file type declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeConfig {
    /// File type id, used as needle id prefix
    pub name: String,
    /// Needle keys
    pub needles: Vec<String>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Validation error
    #[error("configuration validation failed: {0}")]
    Validation(String),
}
