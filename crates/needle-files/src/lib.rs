//! Needle Files
//!
//! File boundary for needle insertion. A [`NeedleLayer`] reads a target file
//! from a [`FileStore`], applies an insertion request and writes the file back
//! only when its text changed.
//!
//! # Example
//!
//! ```rust
//! use needle_core::InsertionRequest;
//! use needle_files::{MemoryFileStore, NeedleLayer};
//!
//! let layer = NeedleLayer::new()?;
//! let mut store = MemoryFileStore::new().with_file(
//!     layer.application_properties_path(),
//!     "class P {\n    // jhipster-needle-application-properties-property\n}\n",
//! );
//!
//! let request = InsertionRequest::new().with("property", "private Foo foo;");
//! let report = layer.insert_content_into_application_properties(&mut store, &request)?;
//! assert_eq!(report.inserted_count(), 1);
//! # Ok::<(), needle_files::LayerError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod layer;
mod snapshot;
mod store;

pub use error::{FileError, LayerError, LayerResult};
pub use layer::{NeedleLayer, NeedleLocation};
pub use snapshot::{Snapshot, SnapshotEntry};
pub use store::{store_key, DiskFileStore, FileStore, MemoryFileStore};
