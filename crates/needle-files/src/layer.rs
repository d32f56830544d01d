//! Needle Layer - File boundary for insertion
//!
//! Reads a target file from a [`FileStore`], applies an insertion request and
//! writes the result back. Nothing else in the workspace touches files.

use crate::error::{FileError, LayerResult};
use crate::store::{store_key, FileStore};
use needle_core::{
    FileContent, InsertionReport, InsertionRequest, NeedleCatalog, NeedleConfig, NeedleInserter,
    NeedleRegistry, APPLICATION_PROPERTIES,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where a needle's marker sits in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeedleLocation {
    /// Request key
    pub key: String,
    /// Needle id
    pub needle: String,
    /// Marker token searched for
    pub token: String,
    /// 1-based lines of every matching marker
    pub lines: Vec<usize>,
}

impl NeedleLocation {
    /// No marker line matched
    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.lines.is_empty()
    }

    /// More than one marker line matched
    #[inline]
    #[must_use]
    pub fn is_duplicated(&self) -> bool {
        self.lines.len() > 1
    }
}

/// File boundary for needle insertion
///
/// Holds the catalog and inserter built from one [`NeedleConfig`].
#[derive(Debug, Clone)]
pub struct NeedleLayer {
    catalog: NeedleCatalog,
    inserter: NeedleInserter,
    application_properties: PathBuf,
    max_file_size: usize,
}

impl NeedleLayer {
    /// Layer with the default configuration
    ///
    /// # Errors
    /// Only if the built-in registries fail to build
    pub fn new() -> LayerResult<Self> {
        Self::from_config(&NeedleConfig::default())
    }

    /// Layer built from `config`
    ///
    /// # Errors
    /// `Config` if the configuration is invalid, `Needle` if a declared
    /// registry has a bad key
    pub fn from_config(config: &NeedleConfig) -> LayerResult<Self> {
        config.validate()?;
        Ok(Self {
            catalog: config.catalog()?,
            inserter: NeedleInserter::from_config(config),
            application_properties: config.application_properties.path(),
            max_file_size: config.max_file_size,
        })
    }

    /// With a custom inserter
    #[inline]
    #[must_use]
    pub fn with_inserter(mut self, inserter: NeedleInserter) -> Self {
        self.inserter = inserter;
        self
    }

    /// Registries known to this layer
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &NeedleCatalog {
        &self.catalog
    }

    /// Inserter in use
    #[inline]
    #[must_use]
    pub fn inserter(&self) -> &NeedleInserter {
        &self.inserter
    }

    /// Relative path of the generated `ApplicationProperties.java`
    #[inline]
    #[must_use]
    pub fn application_properties_path(&self) -> &Path {
        &self.application_properties
    }

    /// Registry for `file_type`
    ///
    /// # Errors
    /// `UnknownFileType`
    pub fn registry(&self, file_type: &str) -> LayerResult<&NeedleRegistry> {
        Ok(self.catalog.get(file_type)?)
    }

    /// Read `path` into a [`FileContent`] whose context is its store key, or
    /// the path itself when absolute
    ///
    /// # Errors
    /// `NotFound`, `Io` or `FileTooLarge`
    pub fn read_content<S: FileStore + ?Sized>(
        &self,
        store: &S,
        path: &Path,
    ) -> LayerResult<FileContent> {
        let text = store.read(path)?;
        if text.len() > self.max_file_size {
            return Err(FileError::FileTooLarge {
                path: path.to_path_buf(),
                size: text.len(),
                max: self.max_file_size,
            }
            .into());
        }
        let context = if path.is_absolute() {
            path.display().to_string()
        } else {
            store_key(path)
        };
        Ok(FileContent::new(context, text))
    }

    /// Apply `request` to the file at `path` and write it back if it changed
    ///
    /// A request that fails part-way leaves the entries before the failing one
    /// applied. That partial text is written and the original error returned.
    ///
    /// # Errors
    /// - `EmptyRequest` before the file is read
    /// - `UnknownFileType` for an unregistered `file_type`
    /// - file errors from reading or writing
    /// - `UnknownNeedle`, `MissingNeedle` or `AmbiguousNeedle` from insertion
    pub fn insert_content<S: FileStore + ?Sized>(
        &self,
        store: &mut S,
        path: &Path,
        file_type: &str,
        request: &InsertionRequest,
    ) -> LayerResult<InsertionReport> {
        request.validate()?;
        let registry = self.registry(file_type)?;
        let mut content = self.read_content(store, path)?;
        let before = content.hash();

        match self.inserter.insert_content(&mut content, registry, request) {
            Ok(report) => {
                if report.changed() {
                    store.write(path, content.text())?;
                }
                tracing::debug!(
                    path = content.context(),
                    inserted = report.inserted_count(),
                    skipped = report.skipped_count(),
                    "insertion request applied"
                );
                Ok(report)
            }
            Err(err) => {
                if content.hash() != before {
                    tracing::error!(
                        path = content.context(),
                        error = %err,
                        "request failed after earlier entries were inserted, writing partial result"
                    );
                    store.write(path, content.text())?;
                }
                Err(err.into())
            }
        }
    }

    /// Apply `request` to the file at `path` without writing anything
    ///
    /// # Errors
    /// Same as [`NeedleLayer::insert_content`]
    pub fn preview<S: FileStore + ?Sized>(
        &self,
        store: &S,
        path: &Path,
        file_type: &str,
        request: &InsertionRequest,
    ) -> LayerResult<(InsertionReport, FileContent)> {
        request.validate()?;
        let registry = self.registry(file_type)?;
        let mut content = self.read_content(store, path)?;
        let report = self.inserter.insert_content(&mut content, registry, request)?;
        Ok((report, content))
    }

    /// Insert into the project's `ApplicationProperties.java`
    ///
    /// Keys are `property`, `propertyGetter` and `propertyClass`.
    ///
    /// # Errors
    /// Same as [`NeedleLayer::insert_content`]
    pub fn insert_content_into_application_properties<S: FileStore + ?Sized>(
        &self,
        store: &mut S,
        request: &InsertionRequest,
    ) -> LayerResult<InsertionReport> {
        let path = self.application_properties.clone();
        self.insert_content(store, &path, APPLICATION_PROPERTIES, request)
    }

    /// Where every needle registered for `file_type` sits in `path`
    ///
    /// # Errors
    /// `UnknownFileType` or file errors; missing markers are reported, not raised
    pub fn locate_all<S: FileStore + ?Sized>(
        &self,
        store: &S,
        path: &Path,
        file_type: &str,
    ) -> LayerResult<Vec<NeedleLocation>> {
        let registry = self.registry(file_type)?;
        let content = self.read_content(store, path)?;
        let locator = self.inserter.locator();

        Ok(registry
            .needles()
            .map(|needle| NeedleLocation {
                key: needle.key().to_string(),
                needle: needle.id().to_string(),
                token: needle.token().to_string(),
                lines: locator
                    .occurrences(content.text(), needle)
                    .iter()
                    .map(|position| position.line_number())
                    .collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayerError;
    use crate::store::MemoryFileStore;
    use needle_core::{DuplicatePolicy, NeedleError, StripWhitespace};
    use pretty_assertions::assert_eq;

    const PATH: &str = "src/main/java/com/mycompany/myapp/config/ApplicationProperties.java";
    const TEMPLATE: &str = "public class ApplicationProperties {\n    // jhipster-needle-application-properties-property\n\n    // jhipster-needle-application-properties-property-getter\n\n    // jhipster-needle-application-properties-property-class\n}\n";

    fn store() -> MemoryFileStore {
        MemoryFileStore::new().with_file(PATH, TEMPLATE)
    }

    #[test]
    fn default_path_points_at_application_properties() {
        let layer = NeedleLayer::new().unwrap();
        assert_eq!(layer.application_properties_path(), Path::new(PATH));
    }

    #[test]
    fn insert_writes_back() {
        let layer = NeedleLayer::new().unwrap();
        let mut store = store();

        let report = layer
            .insert_content_into_application_properties(
                &mut store,
                &InsertionRequest::new().with("property", "private Foo foo;"),
            )
            .unwrap();

        assert!(report.changed());
        assert_eq!(report.context, PATH);
        assert!(store
            .get(PATH)
            .unwrap()
            .contains("    private Foo foo;\n    // jhipster-needle-application-properties-property\n"));
    }

    #[test]
    fn unchanged_file_is_not_rewritten() {
        struct CountingStore {
            inner: MemoryFileStore,
            writes: usize,
        }
        impl FileStore for CountingStore {
            fn read(&self, path: &Path) -> Result<String, FileError> {
                self.inner.read(path)
            }
            fn write(&mut self, path: &Path, contents: &str) -> Result<(), FileError> {
                self.writes += 1;
                self.inner.write(path, contents)
            }
            fn exists(&self, path: &Path) -> bool {
                self.inner.exists(path)
            }
            fn paths(&self) -> Result<Vec<String>, FileError> {
                self.inner.paths()
            }
        }

        let layer = NeedleLayer::new().unwrap();
        let mut store = CountingStore {
            inner: store(),
            writes: 0,
        };
        let request = InsertionRequest::new().with("property", "private Foo foo;");

        layer
            .insert_content_into_application_properties(&mut store, &request)
            .unwrap();
        layer
            .insert_content_into_application_properties(&mut store, &request)
            .unwrap();

        assert_eq!(store.writes, 1);
    }

    #[test]
    fn empty_request_fails_before_reading() {
        let layer = NeedleLayer::new().unwrap();
        let mut store = MemoryFileStore::new();

        let err = layer
            .insert_content_into_application_properties(&mut store, &InsertionRequest::new())
            .unwrap_err();

        assert_eq!(err.as_needle(), Some(&NeedleError::EmptyRequest));
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let layer = NeedleLayer::new().unwrap();
        let mut store = MemoryFileStore::new();

        let err = layer
            .insert_content_into_application_properties(
                &mut store,
                &InsertionRequest::new().with("property", "x"),
            )
            .unwrap_err();

        assert!(matches!(err, LayerError::File(FileError::NotFound(_))));
    }

    #[test]
    fn partial_failure_is_written() {
        let layer = NeedleLayer::new().unwrap();
        let mut store = store();
        let request = InsertionRequest::new()
            .with("property", "private Foo foo;")
            .with("foo", "bar");

        let err = layer
            .insert_content_into_application_properties(&mut store, &request)
            .unwrap_err();

        assert!(matches!(
            err.as_needle(),
            Some(NeedleError::UnknownNeedle { .. })
        ));
        assert!(store.get(PATH).unwrap().contains("private Foo foo;"));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let config = NeedleConfig {
            max_file_size: 16,
            ..NeedleConfig::default()
        };
        let layer = NeedleLayer::from_config(&config).unwrap();

        let err = layer
            .read_content(&store(), Path::new(PATH))
            .unwrap_err();

        assert!(matches!(
            err,
            LayerError::File(FileError::FileTooLarge { max: 16, .. })
        ));
    }

    #[test]
    fn preview_leaves_store_untouched() {
        let layer = NeedleLayer::new().unwrap();
        let store = store();

        let (report, content) = layer
            .preview(
                &store,
                Path::new(PATH),
                APPLICATION_PROPERTIES,
                &InsertionRequest::new().with("propertyClass", "public static class Foo {}"),
            )
            .unwrap();

        assert_eq!(report.inserted_count(), 1);
        assert!(content.text().contains("public static class Foo {}"));
        assert_eq!(store.get(PATH), Some(TEMPLATE));
    }

    #[test]
    fn locate_all_reports_lines_and_gaps() {
        let layer = NeedleLayer::new().unwrap();
        let store = MemoryFileStore::new().with_file(
            PATH,
            "class A {\n    // jhipster-needle-application-properties-property\n    // jhipster-needle-application-properties-property\n}\n",
        );

        let locations = layer
            .locate_all(&store, Path::new(PATH), APPLICATION_PROPERTIES)
            .unwrap();

        assert_eq!(locations.len(), 3);
        assert_eq!(locations[0].key, "property");
        assert_eq!(locations[0].lines, vec![2, 3]);
        assert!(locations[0].is_duplicated());
        assert!(locations[1].is_missing());
        assert!(locations[2].is_missing());
    }

    #[test]
    fn reject_policy_comes_from_config() {
        let config = NeedleConfig::default().with_duplicate_markers(DuplicatePolicy::Reject);
        let layer = NeedleLayer::from_config(&config).unwrap();
        let mut store = MemoryFileStore::new().with_file(
            PATH,
            "// jhipster-needle-application-properties-property\n// jhipster-needle-application-properties-property\n",
        );

        let err = layer
            .insert_content_into_application_properties(
                &mut store,
                &InsertionRequest::new().with("property", "int a;"),
            )
            .unwrap_err();

        assert!(matches!(
            err.as_needle(),
            Some(NeedleError::AmbiguousNeedle { count: 2, .. })
        ));
    }

    #[test]
    fn custom_inserter_normalizer_is_used() {
        let layer = NeedleLayer::new()
            .unwrap()
            .with_inserter(NeedleInserter::new().with_normalizer(StripWhitespace));
        let mut store = store();
        layer
            .insert_content_into_application_properties(
                &mut store,
                &InsertionRequest::new().with("property", "private Foo foo;"),
            )
            .unwrap();

        let report = layer
            .insert_content_into_application_properties(
                &mut store,
                &InsertionRequest::new().with("property", "privateFoo foo ;"),
            )
            .unwrap();

        assert!(!report.changed());
        assert!(layer.inserter().already_present(store.get(PATH).unwrap(), "privateFoofoo;"));
    }

    #[test]
    fn absolute_path_is_reported_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let absolute = dir.path().join("Drifted.java");
        std::fs::write(&absolute, "class Drifted {}\n").unwrap();
        let layer = NeedleLayer::new().unwrap();
        let mut store = crate::store::DiskFileStore::new(dir.path());

        let err = layer
            .insert_content(
                &mut store,
                &absolute,
                APPLICATION_PROPERTIES,
                &InsertionRequest::new().with("property", "int a;"),
            )
            .unwrap_err();

        assert!(err
            .to_string()
            .ends_with(&format!("not found at {}", absolute.display())));
    }

    #[test]
    fn unknown_needle_names_the_file() {
        let layer = NeedleLayer::new().unwrap();
        let err = layer
            .insert_content_into_application_properties(
                &mut store(),
                &InsertionRequest::new().with("foo", "foo"),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Missing required jhipster-needle application-properties-foo not found at {PATH}: \
                 not registered for application-properties"
            )
        );
    }

    #[test]
    fn unknown_file_type() {
        let layer = NeedleLayer::new().unwrap();
        let err = layer
            .locate_all(&store(), Path::new(PATH), "pom")
            .unwrap_err();
        assert!(matches!(
            err.as_needle(),
            Some(NeedleError::UnknownFileType(t)) if t == "pom"
        ));
    }
}
