//! layerfs core: a layered resource namespace.
//!
//! Many independent data sources ("loaders") are stacked into one namespace
//! keyed by [`ResourceId`]. Loaders registered later shadow loaders
//! registered earlier, the usual "mods override the base game" pattern.
//!
//! - [`ResourceLoader`]: the capability every data source implements
//! - [`filesystem_list::FilesystemList`]: the ordered stack with override,
//!   merge and write-fallback semantics
//! - [`mapped_loader::MappedLoader`]: aliases resolved through the whole
//!   namespace
//! - [`ResourceHandler`]: the single entry point holding the root loader
//!
//! # Example
//!
//! ```rust
//! use layerfs_core::filesystem_list::FilesystemList;
//! use layerfs_core::mapped_loader::MappedLoader;
//! use layerfs_core::{ResourceHandler, ResourceId, ResourceLoader};
//! use serde_json::json;
//!
//! let handler = ResourceHandler::new();
//!
//! let mut root = FilesystemList::new();
//! root.add_loader(
//!     MappedLoader::new("", &json!({ "intro.txt": "intro_v2.txt" }), &handler)?,
//!     false,
//! );
//! handler.initialize(root)?;
//!
//! let root = handler.get()?;
//! assert!(root.exists_resource(&ResourceId::from_path("intro.txt")));
//! # Ok::<(), layerfs_core::Error>(())
//! ```

pub use bytes::Bytes;

mod error;
pub mod filesystem_list;
pub mod handler;
mod id;
pub mod mapped_loader;
mod stream;
mod traits;

pub use error::Error;
pub use handler::{ResourceHandler, WeakResourceHandler};
pub use id::{ResourceId, ResourceKind};
pub use stream::{FileStream, InputStream, MemoryStream, Stream};
pub use traits::{ResourceFilter, ResourceLoader};
