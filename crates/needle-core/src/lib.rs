//! Needle Core
//!
//! Idempotent insertion of source fragments into generated files at
//! pre-marked insertion points ("needles").
//!
//! # Core Concepts
//!
//! - [`Needle`]: a named insertion point and the marker line that carries it
//! - [`NeedleRegistry`] / [`NeedleCatalog`]: needles per file type
//! - [`Locator`]: finds a needle's marker line
//! - [`Normalize`]: comparison form for the idempotency guard
//! - [`NeedleInserter`]: validates a request and splices each fragment in
//!   before its marker unless it is already present
//!
//! # Example
//!
//! ```rust
//! use needle_core::{InsertionRequest, NeedleRegistry, DEFAULT_MARKER_PREFIX};
//!
//! let registry = NeedleRegistry::application_properties(DEFAULT_MARKER_PREFIX)?;
//! let template = "class P {\n    // jhipster-needle-application-properties-property\n}\n";
//! let request = InsertionRequest::new().with("property", "private Foo foo;");
//!
//! let once = needle_core::insert_content(template, &registry, &request)?;
//! let twice = needle_core::insert_content(&once, &registry, &request)?;
//! assert_eq!(once, twice);
//! # Ok::<(), needle_core::NeedleError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
mod content;
mod error;
pub mod guard;
mod hash;
pub mod inserter;
mod locator;
mod needle;
mod normalize;
mod orchestrator;
mod registry;
mod request;

pub use config::{ApplicationPropertiesConfig, ConfigError, FileTypeConfig, NeedleConfig};
pub use content::{FileContent, DETACHED_CONTEXT};
pub use error::{NeedleError, NeedleResult};
pub use hash::{ContentHash, HashError};
pub use locator::{DuplicatePolicy, Locator, MarkerPosition};
pub use needle::{kebab_case, needle_id, Needle};
pub use normalize::{CollapseWhitespace, NormalizationMode, Normalize, StripWhitespace};
pub use orchestrator::{
    insert_content, EntryReport, InsertionOutcome, InsertionReport, NeedleInserter,
};
pub use registry::{
    default_catalog, NeedleCatalog, NeedleRegistry, APPLICATION_PROPERTIES,
    APPLICATION_PROPERTIES_NEEDLES, DEFAULT_MARKER_PREFIX,
};
pub use request::InsertionRequest;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
