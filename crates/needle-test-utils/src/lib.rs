//! Testing utilities for the needle workspace
//!
//! Fixtures for a freshly generated project and the fragments the
//! application-properties scenario inserts.

#![allow(missing_docs)]

use needle_core::{InsertionRequest, NeedleConfig};
use needle_files::{FileStore, MemoryFileStore, NeedleLayer, Snapshot};
use regex::Regex;

pub const APPLICATION_PROPERTIES_PATH: &str =
    "src/main/java/com/mycompany/myapp/config/ApplicationProperties.java";

pub const APPLICATION_PROPERTIES_TEMPLATE: &str = r#"package com.mycompany.myapp.config;

import org.springframework.boot.context.properties.ConfigurationProperties;

/**
 * Properties specific to Jhipster.
 * <p>
 * Properties are configured in the {@code application.yml} file.
 * See {@link tech.jhipster.config.JHipsterProperties} for a good example.
 */
@ConfigurationProperties(prefix = "application", ignoreUnknownFields = false)
public class ApplicationProperties {
    // jhipster-needle-application-properties-property

    // jhipster-needle-application-properties-property-getter

    // jhipster-needle-application-properties-property-class
}
"#;

pub const PROPERTY: &str = "private Foo foo;";

pub const PROPERTY_GETTER: &str = "
    private Foo getFoo() {
        return foo;
    };";

pub const PROPERTY_CLASS: &str = "
        public static Foo{} {
            private String bar;

            public String getBar() {
              return bar;
            }
        };";

/// Matches the generated `ApplicationProperties.java`
pub fn application_properties_filter() -> Regex {
    Regex::new(r"config/ApplicationProperties\.java").unwrap()
}

/// In-memory project containing the generated files the scenario touches
pub fn generated_project() -> MemoryFileStore {
    MemoryFileStore::new()
        .with_file(APPLICATION_PROPERTIES_PATH, APPLICATION_PROPERTIES_TEMPLATE)
        .with_file(
            "src/main/resources/config/application.yml",
            "application:\n  # jhipster-needle-application-properties\n",
        )
        .with_file(
            "src/main/java/com/mycompany/myapp/MyApp.java",
            "package com.mycompany.myapp;\n\npublic class MyApp {}\n",
        )
}

/// The three application-properties fragments in one request
pub fn application_properties_request() -> InsertionRequest {
    InsertionRequest::new()
        .with("property", PROPERTY)
        .with("propertyGetter", PROPERTY_GETTER)
        .with("propertyClass", PROPERTY_CLASS)
}

pub fn setup_test_layer() -> NeedleLayer {
    NeedleLayer::from_config(&NeedleConfig::new()).unwrap()
}

/// Snapshot of the files matching [`application_properties_filter`]
pub fn application_properties_snapshot<S: FileStore + ?Sized>(store: &S) -> Snapshot {
    Snapshot::capture(store, Some(&application_properties_filter())).unwrap()
}
